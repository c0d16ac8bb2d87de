#![allow(dead_code)]

pub mod oracle;
pub mod records;

use std::sync::Arc;

use backend::config::game::GameConfig;
use backend::services::game_flow::GameFlowService;
use backend::services::session_state::MemorySessionStore;

pub use oracle::ScriptedOracle;
pub use records::MemoryRecords;

/// Orchestrator wired to hermetic collaborators.
pub struct TestHarness {
    pub flow: GameFlowService,
    pub records: Arc<MemoryRecords>,
    pub sessions: Arc<MemorySessionStore>,
    pub oracle: Arc<ScriptedOracle>,
}

pub fn harness_with(oracle: ScriptedOracle, config: GameConfig) -> TestHarness {
    let records = Arc::new(MemoryRecords::new());
    let sessions = Arc::new(MemorySessionStore::new());
    let oracle = Arc::new(oracle);

    let flow = GameFlowService::new(
        records.clone(),
        sessions.clone(),
        oracle.clone(),
        config,
    );

    TestHarness {
        flow,
        records,
        sessions,
        oracle,
    }
}

pub fn harness(oracle: ScriptedOracle) -> TestHarness {
    harness_with(oracle, GameConfig::default())
}
