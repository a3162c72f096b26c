use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    NotFound,
    RateLimited,
    AgentFailure,
    Unexpected,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => ErrorCode::Validation,
            404 => ErrorCode::NotFound,
            429 => ErrorCode::RateLimited,
            500..=599 => ErrorCode::AgentFailure,
            _ => ErrorCode::Unexpected,
        }
    }
}

/// Error reported by the agent backend with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct DetailBody {
    detail: Value,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Best-effort reading of an error body. Understands `{"detail": "..."}` and
    /// validation lists of `{"msg": "..."}`; anything else is kept as trimmed text.
    pub fn from_response(status: u16, body: &str) -> Self {
        let code = ErrorCode::from_status(status);
        let message = match serde_json::from_str::<DetailBody>(body) {
            Ok(DetailBody {
                detail: Value::String(detail),
            }) => detail,
            Ok(DetailBody {
                detail: Value::Array(items),
            }) => items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("; "),
            Ok(DetailBody { detail }) => detail.to_string(),
            Err(_) => body.trim().to_string(),
        };
        Self { code, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_string_detail() {
        let err = ApiError::from_response(500, r#"{"detail":"Vision Agent failed: boom"}"#);
        assert_eq!(err.code, ErrorCode::AgentFailure);
        assert_eq!(err.message, "Vision Agent failed: boom");
    }

    #[test]
    fn joins_validation_messages() {
        let body = r#"{"detail":[{"loc":["body","layout"],"msg":"field required"},{"msg":"bad type"}]}"#;
        let err = ApiError::from_response(422, body);
        assert_eq!(err.code, ErrorCode::Validation);
        assert_eq!(err.message, "field required; bad type");
    }

    #[test]
    fn keeps_plain_bodies() {
        let err = ApiError::from_response(404, "  Not Found \n");
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Not Found");
    }
}
