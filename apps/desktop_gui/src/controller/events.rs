//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{InvokeError, SessionSnapshot};

pub enum UiEvent {
    Info(String),
    Error(UiError),
    Session(SessionSnapshot),
    BackendHealth { healthy: bool, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Busy,
    Transport,
    Decode,
    Configuration,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Invocation,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_invoke(context: UiErrorContext, err: &InvokeError) -> Self {
        let category = match err {
            InvokeError::Validation => UiErrorCategory::Validation,
            InvokeError::Busy(_) => UiErrorCategory::Busy,
            InvokeError::Transport { .. } | InvokeError::Network(_) => UiErrorCategory::Transport,
            InvokeError::Decode(_) => UiErrorCategory::Decode,
            InvokeError::InvalidEndpoint(_) => UiErrorCategory::Configuration,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    /// Classifies a free-form message such as the session's last error.
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("enter some input")
            || message_lower.contains("missing input")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("already in flight") {
            UiErrorCategory::Busy
        } else if message_lower.contains("malformed response") {
            UiErrorCategory::Decode
        } else if message_lower.contains("http error")
            || message_lower.contains("network error")
            || message_lower.contains("timed out")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("invalid endpoint") {
            UiErrorCategory::Configuration
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::OperationTarget;

    use super::*;

    #[test]
    fn invoke_errors_map_to_categories() {
        let busy = UiError::from_invoke(
            UiErrorContext::Invocation,
            &InvokeError::Busy(OperationTarget::Orchestrator),
        );
        assert_eq!(busy.category(), UiErrorCategory::Busy);
        assert_eq!(busy.context(), UiErrorContext::Invocation);

        let transport = UiError::from_invoke(
            UiErrorContext::Invocation,
            &InvokeError::Transport {
                status: 500,
                detail: None,
            },
        );
        assert_eq!(transport.category(), UiErrorCategory::Transport);
        assert_eq!(transport.message(), "HTTP error! status: 500");
    }

    #[test]
    fn session_messages_are_classified() {
        let cases = [
            ("Please enter some input data", UiErrorCategory::Validation),
            (
                "Failed to orchestrate: HTTP error! status: 500",
                UiErrorCategory::Transport,
            ),
            (
                "Failed to call code agent: malformed response body: EOF",
                UiErrorCategory::Decode,
            ),
            ("something odd", UiErrorCategory::Unknown),
        ];
        for (message, expected) in cases {
            assert_eq!(
                UiError::from_message(UiErrorContext::General, message).category(),
                expected,
                "{message}"
            );
        }
    }
}
