use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::OperationTarget;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{apply_event, ShellState};
use crate::ui::panels::{self, PanelAction};

pub struct DreamForgeApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    state: ShellState,
}

impl DreamForgeApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            state: ShellState::default(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            apply_event(&mut self.state, event);
        }
    }

    fn handle_actions(&mut self, actions: Vec<PanelAction>) {
        for action in actions {
            let cmd = command_for(action, &self.state);
            dispatch_backend_command(&self.cmd_tx, cmd, &mut self.state.status);
        }
    }
}

fn command_for(action: PanelAction, state: &ShellState) -> BackendCommand {
    match action {
        PanelAction::InputChanged => BackendCommand::SetInput {
            input_type: state.input_type,
            input_data: state.input_data.clone(),
        },
        PanelAction::Invoke(OperationTarget::Agent(kind)) => BackendCommand::InvokeAgent { kind },
        PanelAction::Invoke(OperationTarget::Orchestrator) => BackendCommand::Orchestrate,
        PanelAction::ClearResults => BackendCommand::ClearResults,
        PanelAction::CheckHealth => BackendCommand::CheckHealth,
    }
}

impl eframe::App for DreamForgeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let mut actions = Vec::new();
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            panels::status_bar(ui, &self.state, &mut actions);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("🌟 DreamForge AI");
                    ui.label("Transform your ideas into apps with AI agents");
                });
                ui.add_space(12.0);
                panels::input_panel(ui, &mut self.state, &mut actions);
                ui.add_space(12.0);
                panels::agent_cards(ui, &self.state, &mut actions);
                ui.add_space(12.0);
                panels::results_panel(ui, &mut self.state);
            });
        });
        self.handle_actions(actions);

        if self.state.session.operation.active {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
