use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Vision,
    Code,
    Evaluator,
}

impl AgentKind {
    pub const ALL: [AgentKind; 3] = [AgentKind::Vision, AgentKind::Code, AgentKind::Evaluator];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Vision => "vision",
            AgentKind::Code => "code",
            AgentKind::Evaluator => "evaluator",
        }
    }

    /// Path segment of the agent endpoint under the API prefix.
    ///
    /// The evaluator is served at `evaluate`, not at its kind name.
    pub fn route(self) -> &'static str {
        match self {
            AgentKind::Vision => "vision",
            AgentKind::Code => "code",
            AgentKind::Evaluator => "evaluate",
        }
    }

    pub fn descriptor(self) -> &'static AgentDescriptor {
        match self {
            AgentKind::Vision => &AGENTS[0],
            AgentKind::Code => &AGENTS[1],
            AgentKind::Evaluator => &AGENTS[2],
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown agent kind '{0}'")]
pub struct UnknownAgentKind(pub String);

impl FromStr for AgentKind {
    type Err = UnknownAgentKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vision" => Ok(AgentKind::Vision),
            "code" => Ok(AgentKind::Code),
            "evaluator" => Ok(AgentKind::Evaluator),
            other => Err(UnknownAgentKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    #[default]
    Voice,
    Sketch,
    Text,
}

impl InputType {
    pub const ALL: [InputType; 3] = [InputType::Voice, InputType::Sketch, InputType::Text];

    pub fn as_str(self) -> &'static str {
        match self {
            InputType::Voice => "voice",
            InputType::Sketch => "sketch",
            InputType::Text => "text",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InputType::Voice => "Voice Description",
            InputType::Sketch => "Sketch Description",
            InputType::Text => "Text Description",
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown input type '{0}' (expected voice, sketch or text)")]
pub struct UnknownInputType(pub String);

impl FromStr for InputType {
    type Err = UnknownInputType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "voice" => Ok(InputType::Voice),
            "sketch" => Ok(InputType::Sketch),
            "text" => Ok(InputType::Text),
            _ => Err(UnknownInputType(s.to_string())),
        }
    }
}

/// What an in-flight operation is talking to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationTarget {
    Agent(AgentKind),
    Orchestrator,
}

impl OperationTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationTarget::Agent(kind) => kind.as_str(),
            OperationTarget::Orchestrator => "orchestrator",
        }
    }
}

impl From<AgentKind> for OperationTarget {
    fn from(kind: AgentKind) -> Self {
        OperationTarget::Agent(kind)
    }
}

impl fmt::Display for OperationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    pub input_type: InputType,
    pub input_data: String,
}

impl InputState {
    pub fn new(input_type: InputType, input_data: impl Into<String>) -> Self {
        Self {
            input_type,
            input_data: input_data.into(),
        }
    }

    pub fn is_submittable(&self) -> bool {
        !self.input_data.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDescriptor {
    pub kind: AgentKind,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    /// RGB accent used by card headers and result titles.
    pub accent: [u8; 3],
}

impl AgentDescriptor {
    pub fn all() -> &'static [AgentDescriptor] {
        &AGENTS
    }
}

pub const FALLBACK_AGENT_ICON: &str = "🤖";

static AGENTS: [AgentDescriptor; 3] = [
    AgentDescriptor {
        kind: AgentKind::Vision,
        name: "Vision Agent",
        description: "Converts your ideas into structured UI layouts",
        icon: "👁️",
        accent: [59, 130, 246],
    },
    AgentDescriptor {
        kind: AgentKind::Code,
        name: "Code Agent",
        description: "Generates production-ready code from layouts",
        icon: "⚙️",
        accent: [34, 197, 94],
    },
    AgentDescriptor {
        kind: AgentKind::Evaluator,
        name: "Evaluator Agent",
        description: "Reviews and validates generated code",
        icon: "🧪",
        accent: [168, 85, 247],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors_line_up_with_kinds() {
        for kind in AgentKind::ALL {
            assert_eq!(kind.descriptor().kind, kind);
        }
        assert_eq!(AgentDescriptor::all().len(), 3);
    }

    #[test]
    fn evaluator_is_routed_to_evaluate() {
        assert_eq!(AgentKind::Evaluator.route(), "evaluate");
        assert_eq!(AgentKind::Evaluator.as_str(), "evaluator");
    }

    #[test]
    fn parses_kinds_and_input_types() {
        assert_eq!("code".parse::<AgentKind>(), Ok(AgentKind::Code));
        assert!("planner".parse::<AgentKind>().is_err());
        assert_eq!(" Sketch ".parse::<InputType>(), Ok(InputType::Sketch));
        assert!("video".parse::<InputType>().is_err());
    }

    #[test]
    fn whitespace_only_input_is_not_submittable() {
        assert!(!InputState::new(InputType::Text, " \n\t ").is_submittable());
        assert!(InputState::new(InputType::Text, " hi ").is_submittable());
    }

    #[test]
    fn operation_target_names() {
        assert_eq!(OperationTarget::Orchestrator.to_string(), "orchestrator");
        assert_eq!(OperationTarget::from(AgentKind::Vision).to_string(), "vision");
    }
}
