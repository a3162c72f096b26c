use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{AgentKind, InputState, InputType};

pub const DEFAULT_FRAMEWORK: &str = "react";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisionRequest {
    pub input_type: InputType,
    pub input_data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRequest {
    pub layout: String,
    pub framework: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorRequest {
    pub generated_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestrateRequest {
    pub input_type: InputType,
    pub input_data: String,
    pub framework: String,
}

impl OrchestrateRequest {
    pub fn from_input(input: &InputState, framework: &str) -> Self {
        Self {
            input_type: input.input_type,
            input_data: input.input_data.clone(),
            framework: framework.to_string(),
        }
    }
}

/// Body of a single-agent call. Each variant is the only shape its endpoint accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AgentRequest {
    Vision(VisionRequest),
    Code(CodeRequest),
    Evaluator(EvaluatorRequest),
}

impl AgentRequest {
    /// Builds the request for `kind` from the current input.
    ///
    /// The code agent treats the input as a layout and the evaluator treats it as
    /// source code, so the same text feeds every stage.
    pub fn for_agent(kind: AgentKind, input: &InputState, framework: &str) -> Self {
        match kind {
            AgentKind::Vision => AgentRequest::Vision(VisionRequest {
                input_type: input.input_type,
                input_data: input.input_data.clone(),
            }),
            AgentKind::Code => AgentRequest::Code(CodeRequest {
                layout: input.input_data.clone(),
                framework: framework.to_string(),
            }),
            AgentKind::Evaluator => AgentRequest::Evaluator(EvaluatorRequest {
                generated_code: input.input_data.clone(),
            }),
        }
    }

    pub fn agent(&self) -> AgentKind {
        match self {
            AgentRequest::Vision(_) => AgentKind::Vision,
            AgentRequest::Code(_) => AgentKind::Code,
            AgentRequest::Evaluator(_) => AgentKind::Evaluator,
        }
    }
}

/// JavaScript-style truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn deserialize_truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(is_truthy(&value))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionResult {
    pub layout: Option<String>,
    pub components: Option<Vec<String>>,
    pub data_elements: Option<Vec<String>>,
    #[serde(deserialize_with = "deserialize_truthy")]
    pub success: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeResult {
    pub generated_code: Option<String>,
    #[serde(deserialize_with = "deserialize_truthy")]
    pub success: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationStatus {
    Ok,
    Warning,
    /// Anything other than `ok` or `warning`, including a missing status.
    Error,
}

impl EvaluationStatus {
    pub fn classify(raw: &str) -> Self {
        match raw {
            "ok" => EvaluationStatus::Ok,
            "warning" => EvaluationStatus::Warning,
            _ => EvaluationStatus::Error,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorResult {
    pub status: Option<String>,
    pub overall_feedback: Option<String>,
    pub issues: Option<Vec<String>>,
    pub suggestions: Option<Vec<String>>,
    #[serde(deserialize_with = "deserialize_truthy")]
    pub success: bool,
}

impl EvaluatorResult {
    pub fn status_kind(&self) -> EvaluationStatus {
        EvaluationStatus::classify(self.status.as_deref().unwrap_or_default())
    }
}

/// Typed view over a decoded agent payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentResult {
    Vision(VisionResult),
    Code(CodeResult),
    Evaluator(EvaluatorResult),
}

impl AgentResult {
    /// Reads `payload` as the result shape of `kind`. Returns `None` when the payload
    /// does not fit that shape at all.
    pub fn from_payload(kind: AgentKind, payload: &Value) -> Option<Self> {
        if !payload.is_object() {
            return None;
        }
        let parsed = match kind {
            AgentKind::Vision => VisionResult::deserialize(payload).map(AgentResult::Vision),
            AgentKind::Code => CodeResult::deserialize(payload).map(AgentResult::Code),
            AgentKind::Evaluator => {
                EvaluatorResult::deserialize(payload).map(AgentResult::Evaluator)
            }
        };
        parsed.ok()
    }
}

/// Response of the chained endpoint. Sub-results are kept as raw payloads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrchestrateResponse {
    pub vision_result: Value,
    pub code_result: Value,
    pub evaluation_result: Value,
}

impl OrchestrateResponse {
    pub fn into_results(self) -> [(AgentKind, Value); 3] {
        [
            (AgentKind::Vision, self.vision_result),
            (AgentKind::Code, self.code_result),
            (AgentKind::Evaluator, self.evaluation_result),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrchestrateStreamQuery {
    pub input_type: InputType,
    pub input_data: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn input(data: &str) -> InputState {
        InputState::new(InputType::Sketch, data)
    }

    #[test]
    fn each_agent_gets_its_own_body_shape() {
        let vision = AgentRequest::for_agent(AgentKind::Vision, &input("nav bar"), "react");
        assert_eq!(
            serde_json::to_value(&vision).unwrap(),
            json!({"input_type": "sketch", "input_data": "nav bar"})
        );

        let code = AgentRequest::for_agent(AgentKind::Code, &input("two columns"), "react");
        assert_eq!(
            serde_json::to_value(&code).unwrap(),
            json!({"layout": "two columns", "framework": "react"})
        );

        let eval = AgentRequest::for_agent(AgentKind::Evaluator, &input("fn main() {}"), "react");
        assert_eq!(
            serde_json::to_value(&eval).unwrap(),
            json!({"generated_code": "fn main() {}"})
        );
        assert_eq!(eval.agent(), AgentKind::Evaluator);
    }

    #[test]
    fn orchestrate_request_carries_framework() {
        let body = OrchestrateRequest::from_input(&input("todo app"), DEFAULT_FRAMEWORK);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"input_type": "sketch", "input_data": "todo app", "framework": "react"})
        );
    }

    #[test]
    fn truthiness_follows_js_rules() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("yes")));
        assert!(is_truthy(&json!([])));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&Value::Null));
    }

    #[test]
    fn vision_result_tolerates_missing_lists() {
        let parsed = AgentResult::from_payload(
            AgentKind::Vision,
            &json!({"layout": "grid", "success": 1}),
        );
        assert_eq!(
            parsed,
            Some(AgentResult::Vision(VisionResult {
                layout: Some("grid".into()),
                components: None,
                data_elements: None,
                success: true,
            }))
        );
    }

    #[test]
    fn non_object_payload_has_no_typed_view() {
        assert_eq!(AgentResult::from_payload(AgentKind::Code, &json!("oops")), None);
        assert_eq!(
            AgentResult::from_payload(AgentKind::Code, &json!({"generated_code": 42})),
            None
        );
    }

    #[test]
    fn evaluation_status_is_three_way() {
        assert_eq!(EvaluationStatus::classify("ok"), EvaluationStatus::Ok);
        assert_eq!(EvaluationStatus::classify("warning"), EvaluationStatus::Warning);
        assert_eq!(EvaluationStatus::classify("fail"), EvaluationStatus::Error);
        assert_eq!(EvaluationStatus::classify("OK"), EvaluationStatus::Error);
        assert_eq!(EvaluatorResult::default().status_kind(), EvaluationStatus::Error);
    }

    #[test]
    fn orchestrate_response_requires_all_three_results() {
        let full = json!({
            "vision_result": {"layout": "a"},
            "code_result": {"generated_code": "b"},
            "evaluation_result": {"status": "ok"},
            "success": true
        });
        let parsed: OrchestrateResponse = serde_json::from_value(full).unwrap();
        let keys: Vec<_> = parsed.into_results().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, AgentKind::ALL.to_vec());

        let partial = json!({"vision_result": {}, "code_result": {}});
        assert!(serde_json::from_value::<OrchestrateResponse>(partial).is_err());
    }
}
