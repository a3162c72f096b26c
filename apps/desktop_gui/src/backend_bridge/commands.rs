//! Backend commands queued from UI to backend worker.

use shared::domain::{AgentKind, InputType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    SetInput {
        input_type: InputType,
        input_data: String,
    },
    InvokeAgent {
        kind: AgentKind,
    },
    Orchestrate,
    ClearResults,
    CheckHealth,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::SetInput { .. } => "set_input",
            BackendCommand::InvokeAgent { .. } => "invoke_agent",
            BackendCommand::Orchestrate => "orchestrate",
            BackendCommand::ClearResults => "clear_results",
            BackendCommand::CheckHealth => "check_health",
        }
    }
}
