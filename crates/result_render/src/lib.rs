//! Turns agent payloads into display-ready views.
//!
//! Rendering never fails: a payload that does not fit its agent's shape, or a result
//! key that names no known agent, becomes a pretty-printed JSON dump.

use std::borrow::Cow;

use serde_json::Value;
use shared::{
    domain::{AgentKind, FALLBACK_AGENT_ICON},
    protocol::{is_truthy, AgentResult, CodeResult, EvaluationStatus, EvaluatorResult, VisionResult},
};

mod text;

/// Generated code longer than this many characters starts collapsed.
pub const CODE_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResult {
    pub key: String,
    pub title: String,
    pub icon: &'static str,
    pub accent: Option<[u8; 3]>,
    pub success: bool,
    pub body: ResultBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultBody {
    Vision(VisionView),
    Code(CodeView),
    Evaluator(EvaluatorView),
    Raw(RawView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisionView {
    pub layout: String,
    /// `None` when the agent sent no components; the subsection is then omitted.
    pub components: Option<Vec<String>>,
    pub data_elements: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeView {
    code: String,
    expanded: bool,
}

impl CodeView {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            expanded: false,
        }
    }

    pub fn full_text(&self) -> &str {
        &self.code
    }

    pub fn char_count(&self) -> usize {
        self.code.chars().count()
    }

    pub fn is_collapsible(&self) -> bool {
        self.char_count() > CODE_PREVIEW_CHARS
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_truncated(&self) -> bool {
        self.is_collapsible() && !self.expanded
    }

    /// Text currently on screen: the first [`CODE_PREVIEW_CHARS`] characters and an
    /// ellipsis while collapsed, otherwise everything.
    pub fn visible_text(&self) -> Cow<'_, str> {
        if !self.is_truncated() {
            return Cow::Borrowed(&self.code);
        }
        let cut = self
            .code
            .char_indices()
            .nth(CODE_PREVIEW_CHARS)
            .map(|(idx, _)| idx)
            .unwrap_or(self.code.len());
        Cow::Owned(format!("{}...", &self.code[..cut]))
    }

    /// Flips between collapsed and expanded. A no-op for short code.
    pub fn toggle(&mut self) {
        if self.is_collapsible() {
            self.expanded = !self.expanded;
        }
    }

    pub fn toggle_label(&self) -> Option<&'static str> {
        if !self.is_collapsible() {
            None
        } else if self.expanded {
            Some("Show Less")
        } else {
            Some("Show More")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorView {
    pub badge: EvaluationStatus,
    pub status_label: String,
    pub overall_feedback: String,
    pub issues: Option<Vec<String>>,
    pub suggestions: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawView {
    pub pretty: String,
}

impl RawView {
    fn of(payload: &Value) -> Self {
        Self {
            pretty: serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string()),
        }
    }
}

/// Renders the result stored under `key`. Keys that name no known agent fall back to
/// a raw dump.
pub fn render(key: &str, payload: &Value) -> RenderedResult {
    match key.parse::<AgentKind>() {
        Ok(kind) => render_kind(kind, payload),
        Err(_) => RenderedResult {
            key: key.to_string(),
            title: format!("{key} Results"),
            icon: FALLBACK_AGENT_ICON,
            accent: None,
            success: payload_success(payload),
            body: ResultBody::Raw(RawView::of(payload)),
        },
    }
}

pub fn render_kind(kind: AgentKind, payload: &Value) -> RenderedResult {
    let descriptor = kind.descriptor();
    let body = match AgentResult::from_payload(kind, payload) {
        Some(AgentResult::Vision(result)) => ResultBody::Vision(vision_view(result)),
        Some(AgentResult::Code(result)) => ResultBody::Code(code_view(result)),
        Some(AgentResult::Evaluator(result)) => ResultBody::Evaluator(evaluator_view(result)),
        None => ResultBody::Raw(RawView::of(payload)),
    };
    RenderedResult {
        key: kind.as_str().to_string(),
        title: format!("{} Results", descriptor.name),
        icon: descriptor.icon,
        accent: Some(descriptor.accent),
        success: payload_success(payload),
        body,
    }
}

/// Renders every stored result in table order.
pub fn render_all<'a>(
    results: impl IntoIterator<Item = (&'a AgentKind, &'a Value)>,
) -> Vec<RenderedResult> {
    results
        .into_iter()
        .map(|(kind, payload)| render_kind(*kind, payload))
        .collect()
}

fn payload_success(payload: &Value) -> bool {
    payload.get("success").is_some_and(is_truthy)
}

fn non_empty(list: Option<Vec<String>>) -> Option<Vec<String>> {
    list.filter(|items| !items.is_empty())
}

fn vision_view(result: VisionResult) -> VisionView {
    VisionView {
        layout: result.layout.unwrap_or_default(),
        components: non_empty(result.components),
        data_elements: non_empty(result.data_elements),
    }
}

fn code_view(result: CodeResult) -> CodeView {
    CodeView::new(result.generated_code.unwrap_or_default())
}

fn evaluator_view(result: EvaluatorResult) -> EvaluatorView {
    let badge = result.status_kind();
    let status_label = match result.status.as_deref() {
        Some(status) if !status.trim().is_empty() => status.to_uppercase(),
        _ => "UNKNOWN".to_string(),
    };
    EvaluatorView {
        badge,
        status_label,
        overall_feedback: result.overall_feedback.unwrap_or_default(),
        issues: non_empty(result.issues),
        suggestions: non_empty(result.suggestions),
    }
}
