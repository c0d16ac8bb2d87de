use crate::services::game_flow::GameFlowService;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Game orchestrator with its collaborator handles
    pub flow: GameFlowService,
}

impl AppState {
    pub fn new(flow: GameFlowService) -> Self {
        Self { flow }
    }
}
