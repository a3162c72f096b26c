use eframe::egui::{self, RichText};
use result_render::{CodeView, EvaluatorView, RenderedResult, ResultBody, VisionView};
use shared::domain::{AgentDescriptor, InputType, OperationTarget};

use crate::controller::reducer::{BackendHealth, ShellState};
use crate::ui::theme;

/// What the user asked for this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    InputChanged,
    Invoke(OperationTarget),
    ClearResults,
    CheckHealth,
}

pub fn input_panel(ui: &mut egui::Ui, state: &mut ShellState, actions: &mut Vec<PanelAction>) {
    ui.heading("Input Your Idea");
    ui.add_space(6.0);

    let previous_type = state.input_type;
    egui::ComboBox::from_id_salt("input_type")
        .selected_text(state.input_type.label())
        .show_ui(ui, |ui| {
            for input_type in InputType::ALL {
                ui.selectable_value(&mut state.input_type, input_type, input_type.label());
            }
        });
    let edited = ui
        .add(
            egui::TextEdit::multiline(&mut state.input_data)
                .desired_rows(3)
                .desired_width(f32::INFINITY)
                .hint_text("Describe your app idea, layout, or paste code to evaluate..."),
        )
        .changed();
    if edited || previous_type != state.input_type {
        actions.push(PanelAction::InputChanged);
    }

    if let Some(err) = state.visible_error() {
        ui.add_space(6.0);
        ui.label(
            RichText::new(err.message())
                .color(theme::ERROR_TEXT)
                .background_color(theme::ERROR_FILL),
        );
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        let enabled = state.triggers_enabled();
        if state.is_running(OperationTarget::Orchestrator) {
            ui.spinner();
            ui.label("Processing...");
        } else if ui
            .add_enabled(enabled, egui::Button::new("🎯 Run Full Orchestration"))
            .clicked()
        {
            actions.push(PanelAction::Invoke(OperationTarget::Orchestrator));
        }
        if ui
            .add_enabled(
                enabled && !state.session.results.is_empty(),
                egui::Button::new("Clear results"),
            )
            .clicked()
        {
            actions.push(PanelAction::ClearResults);
        }
    });
}

pub fn agent_cards(ui: &mut egui::Ui, state: &ShellState, actions: &mut Vec<PanelAction>) {
    let descriptors = AgentDescriptor::all();
    ui.columns(descriptors.len(), |columns| {
        for (column, descriptor) in columns.iter_mut().zip(descriptors) {
            column.group(|ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(descriptor.icon).size(28.0));
                    ui.label(
                        RichText::new(descriptor.name)
                            .strong()
                            .color(theme::accent(Some(descriptor.accent))),
                    );
                    ui.label(RichText::new(descriptor.description).small().color(theme::MUTED_TEXT));
                    ui.add_space(6.0);

                    let target = OperationTarget::Agent(descriptor.kind);
                    if state.is_running(target) {
                        ui.spinner();
                    } else if ui
                        .add_enabled(
                            state.triggers_enabled(),
                            egui::Button::new(format!("Call {}", descriptor.name)),
                        )
                        .clicked()
                    {
                        actions.push(PanelAction::Invoke(target));
                    }
                });
            });
        }
    });
}

pub fn results_panel(ui: &mut egui::Ui, state: &mut ShellState) {
    if state.rendered.is_empty() {
        return;
    }
    ui.heading("Results");
    for rendered in &mut state.rendered {
        ui.add_space(8.0);
        ui.group(|ui| result_card(ui, rendered));
    }
}

fn result_card(ui: &mut egui::Ui, rendered: &mut RenderedResult) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(rendered.icon).size(20.0));
        ui.label(
            RichText::new(&rendered.title)
                .strong()
                .size(16.0)
                .color(theme::accent(rendered.accent)),
        );
        if rendered.success {
            ui.label(RichText::new("✅ Success").small().color(theme::SUCCESS_TEXT));
        }
    });
    ui.add_space(4.0);

    match &mut rendered.body {
        ResultBody::Vision(view) => vision_body(ui, view),
        ResultBody::Code(view) => code_body(ui, view),
        ResultBody::Evaluator(view) => evaluator_body(ui, view),
        ResultBody::Raw(view) => {
            ui.label(RichText::new(&view.pretty).monospace());
        }
    }
}

fn vision_body(ui: &mut egui::Ui, view: &VisionView) {
    ui.label(RichText::new("Layout Description:").strong());
    ui.label(view.layout.as_str());
    tag_section(ui, "Components:", view.components.as_deref(), theme::COMPONENT_TAG);
    tag_section(ui, "Data Elements:", view.data_elements.as_deref(), theme::DATA_ELEMENT_TAG);
}

fn tag_section(
    ui: &mut egui::Ui,
    heading: &str,
    tags: Option<&[String]>,
    (fill, text): (egui::Color32, egui::Color32),
) {
    let Some(tags) = tags else {
        return;
    };
    ui.add_space(4.0);
    ui.label(RichText::new(heading).strong());
    ui.horizontal_wrapped(|ui| {
        for tag in tags {
            ui.label(RichText::new(tag).color(text).background_color(fill));
        }
    });
}

fn code_body(ui: &mut egui::Ui, view: &mut CodeView) {
    ui.label(RichText::new("Generated Code:").strong());
    ui.label(
        RichText::new(view.visible_text().into_owned())
            .monospace()
            .color(theme::CODE_TEXT),
    );
    if let Some(label) = view.toggle_label() {
        if ui.link(label).clicked() {
            view.toggle();
        }
    }
}

fn evaluator_body(ui: &mut egui::Ui, view: &EvaluatorView) {
    let (fill, text) = theme::badge_colors(view.badge);
    ui.horizontal(|ui| {
        ui.label(RichText::new("Status:").strong());
        ui.label(
            RichText::new(&view.status_label)
                .strong()
                .color(text)
                .background_color(fill),
        );
    });
    ui.label(RichText::new("Overall Feedback:").strong());
    ui.label(view.overall_feedback.as_str());

    if let Some(issues) = &view.issues {
        ui.label(RichText::new("Issues:").strong());
        for issue in issues {
            ui.label(RichText::new(format!("⚠️ {issue}")).color(theme::ISSUE_TEXT));
        }
    }
    if let Some(suggestions) = &view.suggestions {
        ui.label(RichText::new("Suggestions:").strong());
        for suggestion in suggestions {
            ui.label(RichText::new(format!("💡 {suggestion}")).color(theme::SUGGESTION_TEXT));
        }
    }
}

pub fn status_bar(ui: &mut egui::Ui, state: &ShellState, actions: &mut Vec<PanelAction>) {
    ui.horizontal(|ui| {
        let (dot, color) = match state.health {
            BackendHealth::Healthy => ("●", theme::SUCCESS_TEXT),
            BackendHealth::Unreachable => ("●", theme::ERROR_TEXT),
            BackendHealth::Unknown => ("○", theme::MUTED_TEXT),
        };
        ui.label(RichText::new(dot).color(color));
        ui.small(RichText::new(&state.status).weak());
        if ui.small_button("Check backend").clicked() {
            actions.push(PanelAction::CheckHealth);
        }
    });
}
