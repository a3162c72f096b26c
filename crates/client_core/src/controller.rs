//! Session state machine driving single-agent and orchestrated invocations.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use shared::{
    domain::{AgentKind, InputState, InputType, OperationTarget},
    protocol::{AgentRequest, OrchestrateRequest, OrchestrateResponse},
    results::ResultsTable,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    error::{InvokeError, MISSING_INPUT_MESSAGE},
    transport::AgentTransport,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationState {
    pub active: bool,
    pub active_agent: Option<OperationTarget>,
    pub last_error: Option<String>,
}

/// Read-only copy of the session handed to shells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub input: InputState,
    pub operation: OperationState,
    pub results: ResultsTable,
}

impl SessionSnapshot {
    pub fn is_busy_with(&self, target: OperationTarget) -> bool {
        self.operation.active && self.operation.active_agent == Some(target)
    }
}

pub struct SessionController {
    transport: Arc<dyn AgentTransport>,
    framework: String,
    state: Mutex<SessionSnapshot>,
    updates: watch::Sender<SessionSnapshot>,
}

impl SessionController {
    pub fn new(transport: Arc<dyn AgentTransport>, framework: impl Into<String>) -> Self {
        let (updates, _) = watch::channel(SessionSnapshot::default());
        Self {
            transport,
            framework: framework.into(),
            state: Mutex::new(SessionSnapshot::default()),
            updates,
        }
    }

    /// Receives a fresh snapshot after every state transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().clone()
    }

    pub fn transport(&self) -> &Arc<dyn AgentTransport> {
        &self.transport
    }

    /// Replaces the pending input. Nothing is validated until an invocation.
    pub fn set_input(&self, input_type: InputType, input_data: impl Into<String>) {
        self.mutate(|state| {
            state.input = InputState::new(input_type, input_data);
        });
    }

    pub fn clear_results(&self) -> Result<(), InvokeError> {
        let mut state = self.lock();
        if let Some(target) = running_target(&state) {
            return Err(InvokeError::Busy(target));
        }
        state.results.clear();
        state.operation.last_error = None;
        self.publish(&state);
        Ok(())
    }

    /// Calls one agent and stores its payload under `kind`, leaving other results alone.
    pub async fn invoke_single(&self, kind: AgentKind) -> Result<(), InvokeError> {
        let flight = self.begin(OperationTarget::Agent(kind))?;
        let request = AgentRequest::for_agent(kind, &flight.input, &self.framework);
        debug!(agent = %kind, "dispatching agent request");

        let outcome = self.transport.call_agent(&request).await;
        self.settle(OperationTarget::Agent(kind), outcome, |results, payload| {
            results.insert(kind, payload);
            Ok(())
        })
    }

    /// Runs the chained pipeline and replaces every stored result with its three outputs.
    pub async fn invoke_orchestrate(&self) -> Result<(), InvokeError> {
        let flight = self.begin(OperationTarget::Orchestrator)?;
        let request = OrchestrateRequest::from_input(&flight.input, &self.framework);
        debug!(input_type = %request.input_type, "dispatching orchestration request");

        let outcome = self.transport.orchestrate(&request).await;
        self.settle(OperationTarget::Orchestrator, outcome, |results, payload| {
            let response: OrchestrateResponse = serde_json::from_value(payload)
                .map_err(|err| InvokeError::Decode(err.to_string()))?;
            results.replace_all(response.into_results());
            Ok(())
        })
    }

    fn begin(&self, target: OperationTarget) -> Result<FlightGuard<'_>, InvokeError> {
        let mut state = self.lock();
        if let Some(running) = running_target(&state) {
            warn!(%target, %running, "rejecting overlapping invocation");
            return Err(InvokeError::Busy(running));
        }
        if !state.input.is_submittable() {
            state.operation.last_error = Some(MISSING_INPUT_MESSAGE.to_string());
            self.publish(&state);
            return Err(InvokeError::Validation);
        }

        state.operation.active = true;
        state.operation.active_agent = Some(target);
        state.operation.last_error = None;
        self.publish(&state);

        Ok(FlightGuard {
            controller: self,
            input: state.input.clone(),
        })
    }

    fn settle(
        &self,
        target: OperationTarget,
        outcome: Result<Value, InvokeError>,
        merge: impl FnOnce(&mut ResultsTable, Value) -> Result<(), InvokeError>,
    ) -> Result<(), InvokeError> {
        let mut state = self.lock();
        // Merge into a copy so a failed decode leaves the table untouched.
        let mut results = state.results.clone();
        let merged = outcome.and_then(|payload| merge(&mut results, payload));
        match merged {
            Ok(()) => {
                info!(%target, results = results.len(), "invocation settled");
                state.results = results;
            }
            Err(ref err) => {
                warn!(%target, status = ?err.status(), "invocation failed: {err}");
                state.operation.last_error = Some(failure_message(target, err));
            }
        }
        self.publish(&state);
        merged
    }

    fn finish_flight(&self) {
        self.mutate(|state| {
            state.operation.active = false;
            state.operation.active_agent = None;
        });
    }

    fn mutate(&self, update: impl FnOnce(&mut SessionSnapshot)) {
        let mut state = self.lock();
        update(&mut state);
        self.publish(&state);
    }

    fn publish(&self, state: &SessionSnapshot) {
        self.updates.send_replace(state.clone());
    }

    fn lock(&self) -> MutexGuard<'_, SessionSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn running_target(state: &SessionSnapshot) -> Option<OperationTarget> {
    if !state.operation.active {
        return None;
    }
    Some(
        state
            .operation
            .active_agent
            .unwrap_or(OperationTarget::Orchestrator),
    )
}

pub fn failure_message(target: OperationTarget, err: &InvokeError) -> String {
    match target {
        OperationTarget::Agent(kind) => format!("Failed to call {kind} agent: {err}"),
        OperationTarget::Orchestrator => format!("Failed to orchestrate: {err}"),
    }
}

/// Marks the session idle when dropped, whether the call settled, failed or was abandoned.
struct FlightGuard<'a> {
    controller: &'a SessionController,
    input: InputState,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.controller.finish_flight();
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
