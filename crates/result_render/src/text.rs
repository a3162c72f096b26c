use std::fmt;

use shared::protocol::EvaluationStatus;

use crate::{CodeView, EvaluatorView, RenderedResult, ResultBody, VisionView};

impl fmt::Display for RenderedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon, self.title)?;
        if self.success {
            write!(f, "  ✅ Success")?;
        }
        writeln!(f)?;
        match &self.body {
            ResultBody::Vision(view) => write_vision(f, view),
            ResultBody::Code(view) => write_code(f, view),
            ResultBody::Evaluator(view) => write_evaluator(f, view),
            ResultBody::Raw(view) => writeln!(f, "{}", view.pretty),
        }
    }
}

fn write_vision(f: &mut fmt::Formatter<'_>, view: &VisionView) -> fmt::Result {
    writeln!(f, "Layout Description:")?;
    writeln!(f, "  {}", view.layout)?;
    if let Some(components) = &view.components {
        writeln!(f, "Components: {}", tags(components))?;
    }
    if let Some(elements) = &view.data_elements {
        writeln!(f, "Data Elements: {}", tags(elements))?;
    }
    Ok(())
}

fn write_code(f: &mut fmt::Formatter<'_>, view: &CodeView) -> fmt::Result {
    writeln!(f, "Generated Code:")?;
    writeln!(f, "{}", view.visible_text())?;
    if view.is_truncated() {
        writeln!(
            f,
            "({} characters total; showing the first {})",
            view.char_count(),
            crate::CODE_PREVIEW_CHARS
        )?;
    }
    Ok(())
}

fn write_evaluator(f: &mut fmt::Formatter<'_>, view: &EvaluatorView) -> fmt::Result {
    let marker = match view.badge {
        EvaluationStatus::Ok => "🟢",
        EvaluationStatus::Warning => "🟡",
        EvaluationStatus::Error => "🔴",
    };
    writeln!(f, "Status: {marker} {}", view.status_label)?;
    writeln!(f, "Overall Feedback:")?;
    writeln!(f, "  {}", view.overall_feedback)?;
    if let Some(issues) = &view.issues {
        writeln!(f, "Issues:")?;
        for issue in issues {
            writeln!(f, "  ⚠️ {issue}")?;
        }
    }
    if let Some(suggestions) = &view.suggestions {
        writeln!(f, "Suggestions:")?;
        for suggestion in suggestions {
            writeln!(f, "  💡 {suggestion}")?;
        }
    }
    Ok(())
}

fn tags(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("[{item}]"))
        .collect::<Vec<_>>()
        .join(" ")
}
