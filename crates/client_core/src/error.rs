use shared::domain::OperationTarget;
use thiserror::Error;

/// Message stored as the session error when an invocation is attempted without input.
pub const MISSING_INPUT_MESSAGE: &str = "Please enter some input data";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
    #[error("missing input")]
    Validation,
    #[error("{0} call already in flight")]
    Busy(OperationTarget),
    #[error("HTTP error! status: {status}{}", detail_suffix(.detail))]
    Transport { status: u16, detail: Option<String> },
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response body: {0}")]
    Decode(String),
    #[error("invalid endpoint url: {0}")]
    InvalidEndpoint(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) if !detail.is_empty() => format!(" ({detail})"),
        _ => String::new(),
    }
}

impl InvokeError {
    pub fn status(&self) -> Option<u16> {
        match self {
            InvokeError::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            InvokeError::Network("request timed out".to_string())
        } else if err.is_decode() {
            InvokeError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            InvokeError::Transport {
                status: status.as_u16(),
                detail: None,
            }
        } else {
            InvokeError::Network(err.to_string())
        }
    }
}
