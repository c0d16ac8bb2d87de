use std::env;
use std::time::Duration;

/// Fixed session length: a session completes after this many rounds.
pub const MAX_ROUNDS: u8 = 10;

/// Response cards dealt to the player each round (fresh draw per round).
pub const HAND_SIZE: usize = 10;

const DEFAULT_MAX_ACTIVE_USERS: u64 = 100;
const DEFAULT_JUDGE_TIMEOUT_SECS: u64 = 5;

/// Tunables for the game orchestrator.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub max_rounds: u8,
    pub hand_size: usize,
    /// Admission limit on the active-user set.
    pub max_active_users: u64,
    /// Bound on oracle invocations made while holding a session lock.
    pub judge_timeout: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_rounds: MAX_ROUNDS,
            hand_size: HAND_SIZE,
            max_active_users: DEFAULT_MAX_ACTIVE_USERS,
            judge_timeout: Duration::from_secs(DEFAULT_JUDGE_TIMEOUT_SECS),
        }
    }
}

impl GameConfig {
    /// Defaults, with the operational knobs overridable from the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = env::var("MAX_ACTIVE_USERS") {
            if let Ok(limit) = raw.parse::<u64>() {
                config.max_active_users = limit;
            }
        }
        if let Ok(raw) = env::var("ORACLE_TIMEOUT_SECS") {
            if let Ok(secs) = raw.parse::<u64>() {
                config.judge_timeout = Duration::from_secs(secs);
            }
        }

        config
    }
}
