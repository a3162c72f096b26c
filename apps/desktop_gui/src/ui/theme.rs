use eframe::egui::Color32;
use shared::protocol::EvaluationStatus;

pub const ERROR_FILL: Color32 = Color32::from_rgb(127, 29, 29);
pub const ERROR_TEXT: Color32 = Color32::from_rgb(254, 202, 202);
pub const SUCCESS_TEXT: Color32 = Color32::from_rgb(134, 239, 172);
pub const ISSUE_TEXT: Color32 = Color32::from_rgb(252, 165, 165);
pub const SUGGESTION_TEXT: Color32 = Color32::from_rgb(147, 197, 253);
pub const CODE_TEXT: Color32 = Color32::from_rgb(74, 222, 128);
pub const MUTED_TEXT: Color32 = Color32::from_rgb(156, 163, 175);

pub fn accent(rgb: Option<[u8; 3]>) -> Color32 {
    match rgb {
        Some([r, g, b]) => Color32::from_rgb(r, g, b),
        None => MUTED_TEXT,
    }
}

/// (fill, text) for the evaluator status badge.
pub fn badge_colors(status: EvaluationStatus) -> (Color32, Color32) {
    match status {
        EvaluationStatus::Ok => (Color32::from_rgb(20, 83, 45), SUCCESS_TEXT),
        EvaluationStatus::Warning => (
            Color32::from_rgb(113, 63, 18),
            Color32::from_rgb(253, 224, 71),
        ),
        EvaluationStatus::Error => (ERROR_FILL, ERROR_TEXT),
    }
}

pub const COMPONENT_TAG: (Color32, Color32) = (Color32::from_rgb(30, 58, 138), SUGGESTION_TEXT);
pub const DATA_ELEMENT_TAG: (Color32, Color32) = (Color32::from_rgb(20, 83, 45), SUCCESS_TEXT);
