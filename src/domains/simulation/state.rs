use super::agents::AgentStore;
use super::alert::AlertMode;

/// The single authoritative simulation state: every person plus the alert flag.
/// Nothing here outlives the process.
#[derive(Debug, Clone, Default)]
pub struct SimulationState {
    pub agents: AgentStore,
    pub alert: AlertMode,
}

impl SimulationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_alert(&mut self) -> AlertMode {
        self.alert.toggle()
    }

    pub fn clear_people(&mut self) {
        self.agents.clear();
    }
}
