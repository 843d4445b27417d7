//! Shared test doubles for session tests.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;
use toolrelay_core::error::{ProviderError, ToolError};
use toolrelay_core::provider::{
    ContentBlock, Provider, ProviderRequest, ProviderResponse, StopReason, ToolUseRequest, Usage,
};
use toolrelay_core::tool::{Tool, ToolInput, ToolRegistry};

/// A provider that replays queued results and records every request.
///
/// Panics if more calls are made than results provided.
pub struct ScriptedProvider {
    results: Mutex<VecDeque<Result<ProviderResponse, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(results: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedProvider: no more scripted results")
    }
}

pub fn response_with(content: Vec<ContentBlock>) -> ProviderResponse {
    let stop_reason = if content.iter().any(|b| matches!(b, ContentBlock::ToolUse(_))) {
        StopReason::ToolUse
    } else {
        StopReason::EndTurn
    };
    ProviderResponse {
        id: "msg_test".into(),
        model: "mock-model".into(),
        content,
        stop_reason: Some(stop_reason),
        usage: Usage {
            input_tokens: 10,
            output_tokens: 5,
        },
    }
}

pub fn text_response(text: &str) -> ProviderResponse {
    response_with(vec![ContentBlock::Text(text.into())])
}

pub fn tool_response(calls: Vec<ToolUseRequest>) -> ProviderResponse {
    response_with(calls.into_iter().map(ContentBlock::ToolUse).collect())
}

pub fn tool_call(id: &str, name: &str, input: Value) -> ToolUseRequest {
    ToolUseRequest {
        id: id.into(),
        name: name.into(),
        input,
    }
}

struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }
    fn description(&self) -> &str {
        "Echoes back the input"
    }
    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "text": { "type": "string" } },
            "required": ["text"]
        })
    }
    async fn execute(&self, input: &ToolInput) -> Result<String, ToolError> {
        Ok(input.require_str("text")?.to_string())
    }
}

/// Always fails with an I/O error.
struct FailTool;

#[async_trait]
impl Tool for FailTool {
    fn name(&self) -> &str {
        "fail"
    }
    fn description(&self) -> &str {
        "Always fails"
    }
    fn input_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }
    async fn execute(&self, _input: &ToolInput) -> Result<String, ToolError> {
        Err(ToolError::Io("disk on fire".into()))
    }
}

pub fn echo_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(EchoTool)).unwrap();
    registry.register(Box::new(FailTool)).unwrap();
    registry
}
