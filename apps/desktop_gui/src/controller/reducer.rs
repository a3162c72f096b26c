//! Shell-side state and the transitions applied for each backend event.

use client_core::SessionSnapshot;
use result_render::{render_kind, RenderedResult};
use shared::domain::{InputType, OperationTarget};

use crate::controller::events::{UiError, UiErrorContext, UiEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendHealth {
    Unknown,
    Healthy,
    Unreachable,
}

pub struct ShellState {
    pub input_type: InputType,
    pub input_data: String,
    pub session: SessionSnapshot,
    /// Views for `session.results`. A view is rebuilt only when its own payload
    /// changes, so code expansion survives repaints and other agents' results.
    pub rendered: Vec<RenderedResult>,
    pub status: String,
    pub banner: Option<UiError>,
    pub health: BackendHealth,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            input_type: InputType::default(),
            input_data: String::new(),
            session: SessionSnapshot::default(),
            rendered: Vec::new(),
            status: "Starting...".to_string(),
            banner: None,
            health: BackendHealth::Unknown,
        }
    }
}

impl ShellState {
    pub fn triggers_enabled(&self) -> bool {
        !self.session.operation.active
    }

    pub fn is_running(&self, target: OperationTarget) -> bool {
        self.session.is_busy_with(target)
    }

    /// Session error if there is one, otherwise the latest worker-side error.
    pub fn visible_error(&self) -> Option<UiError> {
        self.session
            .operation
            .last_error
            .as_ref()
            .map(|message| UiError::from_message(UiErrorContext::Invocation, message.clone()))
            .or_else(|| self.banner.clone())
    }
}

pub fn apply_event(state: &mut ShellState, event: UiEvent) {
    match event {
        UiEvent::Info(message) => {
            state.status = message;
        }
        UiEvent::Error(err) => {
            tracing::warn!(
                context = ?err.context(),
                category = ?err.category(),
                "ui error: {}",
                err.message()
            );
            state.status = err.message().to_string();
            state.banner = Some(err);
        }
        UiEvent::Session(snapshot) => {
            if snapshot.results != state.session.results {
                rerender_changed(state, &snapshot);
            }
            state.status = match snapshot.operation.active_agent {
                Some(target) if snapshot.operation.active => format!("Running {target}..."),
                _ if snapshot.operation.last_error.is_some() => "Last call failed".to_string(),
                _ => "Ready".to_string(),
            };
            if snapshot.operation.active {
                state.banner = None;
            }
            state.session = snapshot;
        }
        UiEvent::BackendHealth { healthy, message } => {
            state.health = if healthy {
                BackendHealth::Healthy
            } else {
                BackendHealth::Unreachable
            };
            state.status = message;
        }
    }
}

/// Keeps the view of every result whose payload is unchanged and renders the rest.
fn rerender_changed(state: &mut ShellState, snapshot: &SessionSnapshot) {
    let mut previous = std::mem::take(&mut state.rendered);
    state.rendered = snapshot
        .results
        .iter()
        .map(|(kind, payload)| {
            let unchanged = state.session.results.get(*kind) == Some(payload);
            let kept = previous
                .iter()
                .position(|rendered| rendered.key == kind.as_str())
                .map(|idx| previous.swap_remove(idx));
            match kept {
                Some(view) if unchanged => view,
                _ => render_kind(*kind, payload),
            }
        })
        .collect();
}

#[cfg(test)]
mod tests {
    use result_render::ResultBody;
    use serde_json::json;
    use shared::domain::{AgentKind, InputState};

    use super::*;

    fn snapshot_with_code(code: &str) -> SessionSnapshot {
        let mut snapshot = SessionSnapshot {
            input: InputState::new(InputType::Text, "x"),
            ..SessionSnapshot::default()
        };
        snapshot
            .results
            .insert(AgentKind::Code, json!({"generated_code": code, "success": true}));
        snapshot
    }

    fn expand_code(state: &mut ShellState) {
        for rendered in &mut state.rendered {
            if let ResultBody::Code(view) = &mut rendered.body {
                view.toggle();
            }
        }
    }

    fn code_expanded(state: &ShellState) -> bool {
        state.rendered.iter().any(|rendered| {
            matches!(&rendered.body, ResultBody::Code(view) if view.is_expanded())
        })
    }

    #[test]
    fn active_snapshot_disables_triggers() {
        let mut state = ShellState::default();
        let mut snapshot = SessionSnapshot::default();
        snapshot.operation.active = true;
        snapshot.operation.active_agent = Some(OperationTarget::Orchestrator);

        apply_event(&mut state, UiEvent::Session(snapshot));

        assert!(!state.triggers_enabled());
        assert!(state.is_running(OperationTarget::Orchestrator));
        assert!(!state.is_running(OperationTarget::Agent(AgentKind::Vision)));
        assert_eq!(state.status, "Running orchestrator...");
    }

    #[test]
    fn expansion_survives_identical_snapshot_but_resets_on_new_data() {
        let mut state = ShellState::default();
        let long = "c".repeat(900);
        apply_event(&mut state, UiEvent::Session(snapshot_with_code(&long)));
        expand_code(&mut state);
        assert!(code_expanded(&state));

        apply_event(&mut state, UiEvent::Session(snapshot_with_code(&long)));
        assert!(code_expanded(&state));

        apply_event(&mut state, UiEvent::Session(snapshot_with_code(&"d".repeat(900))));
        assert!(!code_expanded(&state));
    }

    #[test]
    fn other_agent_result_keeps_code_expanded() {
        let mut state = ShellState::default();
        let mut snapshot = snapshot_with_code(&"c".repeat(900));
        apply_event(&mut state, UiEvent::Session(snapshot.clone()));
        expand_code(&mut state);

        snapshot
            .results
            .insert(AgentKind::Vision, json!({"layout": "grid", "success": true}));
        apply_event(&mut state, UiEvent::Session(snapshot.clone()));
        assert!(code_expanded(&state));
        assert_eq!(state.rendered.len(), 2);
        assert_eq!(state.rendered[0].key, "vision");

        snapshot
            .results
            .insert(AgentKind::Vision, json!({"layout": "stack", "success": true}));
        apply_event(&mut state, UiEvent::Session(snapshot));
        assert!(code_expanded(&state));
        let ResultBody::Vision(view) = &state.rendered[0].body else {
            panic!("expected vision body");
        };
        assert_eq!(view.layout, "stack");
    }

    #[test]
    fn session_error_takes_priority_over_banner() {
        let mut state = ShellState::default();
        apply_event(
            &mut state,
            UiEvent::Error(UiError::from_message(UiErrorContext::General, "queue full")),
        );
        assert_eq!(state.visible_error().map(|e| e.message().to_string()).as_deref(), Some("queue full"));

        let mut snapshot = SessionSnapshot::default();
        snapshot.operation.last_error = Some("Failed to orchestrate: HTTP error! status: 500".into());
        apply_event(&mut state, UiEvent::Session(snapshot));
        let shown = state.visible_error().expect("error");
        assert!(shown.message().contains("500"));
        assert_eq!(state.status, "Last call failed");
    }

    #[test]
    fn health_event_updates_indicator() {
        let mut state = ShellState::default();
        apply_event(
            &mut state,
            UiEvent::BackendHealth {
                healthy: false,
                message: "network error: connection refused".into(),
            },
        );
        assert_eq!(state.health, BackendHealth::Unreachable);
    }
}
