//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{
    AgentTransport, ClientSettings, HttpAgentClient, InvokeError, SessionController,
    SessionSnapshot,
};
use crossbeam_channel::{Receiver, Sender};
use tokio::sync::watch;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(settings: ClientSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = match HttpAgentClient::new(&settings) {
                Ok(client) => Arc::new(client),
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_invoke(
                        UiErrorContext::BackendStartup,
                        &err,
                    )));
                    tracing::error!(server_url = %settings.server_url, "invalid agent backend: {err}");
                    return;
                }
            };
            let controller = Arc::new(SessionController::new(client, settings.framework.clone()));

            tokio::spawn(forward_snapshots(controller.subscribe(), ui_tx.clone()));

            spawn_health_check(&controller, &ui_tx);
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Backend worker ready ({})",
                settings.server_url
            )));

            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend worker received command");
                match cmd {
                    BackendCommand::SetInput {
                        input_type,
                        input_data,
                    } => controller.set_input(input_type, input_data),
                    BackendCommand::InvokeAgent { kind } => {
                        let controller = controller.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            if let Err(err) = controller.invoke_single(kind).await {
                                report_rejection(&ui_tx, &err);
                            }
                        });
                    }
                    BackendCommand::Orchestrate => {
                        let controller = controller.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            if let Err(err) = controller.invoke_orchestrate().await {
                                report_rejection(&ui_tx, &err);
                            }
                        });
                    }
                    BackendCommand::ClearResults => {
                        if let Err(err) = controller.clear_results() {
                            report_rejection(&ui_tx, &err);
                        }
                    }
                    BackendCommand::CheckHealth => spawn_health_check(&controller, &ui_tx),
                }
            }
        });
    });
}

/// Forwards every session transition to the UI. Sends block so the final idle
/// snapshot is never dropped by a full queue.
async fn forward_snapshots(mut updates: watch::Receiver<SessionSnapshot>, ui_tx: Sender<UiEvent>) {
    while updates.changed().await.is_ok() {
        let snapshot = updates.borrow_and_update().clone();
        let sent = tokio::task::block_in_place(|| ui_tx.send(UiEvent::Session(snapshot)));
        if sent.is_err() {
            tracing::warn!("ui event queue disconnected; stopping snapshot forwarding");
            break;
        }
    }
}

/// Invocation failures already land in the session error; only rejections that never
/// reached the session need their own event.
fn report_rejection(ui_tx: &Sender<UiEvent>, err: &InvokeError) {
    if matches!(err, InvokeError::Busy(_)) {
        let _ = ui_tx.try_send(UiEvent::Error(UiError::from_invoke(
            UiErrorContext::Invocation,
            err,
        )));
    }
}

fn spawn_health_check(controller: &Arc<SessionController>, ui_tx: &Sender<UiEvent>) {
    let transport = controller.transport().clone();
    let ui_tx = ui_tx.clone();
    tokio::spawn(async move {
        let event = match transport.health().await {
            Ok(message) => UiEvent::BackendHealth {
                healthy: true,
                message,
            },
            Err(err) => {
                tracing::warn!("agent backend health check failed: {err}");
                UiEvent::BackendHealth {
                    healthy: false,
                    message: err.to_string(),
                }
            }
        };
        let _ = ui_tx.try_send(event);
    });
}
