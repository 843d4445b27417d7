//! Provider trait: the abstraction over the remote model endpoint.
//!
//! A Provider knows how to send a transcript (plus optional tool schemas)
//! to an LLM and get one complete, structured response back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::Turn;

/// A single query to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "claude-3-5-sonnet-20241022")
    pub model: String,

    /// Top-level system prompt, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// The full transcript, oldest first
    pub turns: Vec<Turn>,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Tools the model may invoke. Empty for a bare follow-up query.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

/// A tool schema sent to the LLM so it knows what it can call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema: `{type: "object", properties: {..}, required: [..]}`
    pub input_schema: serde_json::Value,
}

/// A model-issued request to run a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolUseRequest {
    /// Opaque id assigned by the model
    pub id: String,
    pub name: String,
    /// Heterogeneous parameter map; validated by the tool itself
    pub input: serde_json::Value,
}

/// One block of a model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentBlock {
    Text(String),
    ToolUse(ToolUseRequest),
}

/// Why the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
    ToolUse,
    #[serde(untagged)]
    Other(String),
}

/// Token usage counters for one query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl Usage {
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// A complete response from a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub id: String,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    /// Content blocks in the order the model produced them
    pub content: Vec<ContentBlock>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,

    pub usage: Usage,
}

impl ProviderResponse {
    /// The first text block, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::Text(text) => Some(text.as_str()),
            ContentBlock::ToolUse(_) => None,
        })
    }

    /// Every tool-use block, in content order.
    pub fn tool_uses(&self) -> Vec<&ToolUseRequest> {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse(request) => Some(request),
                ContentBlock::Text(_) => None,
            })
            .collect()
    }
}

/// The core Provider trait.
///
/// The orchestration loop calls `complete()` without knowing which backend
/// answers it; tests substitute scripted implementations.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "anthropic").
    fn name(&self) -> &str;

    /// Send a request and wait for the complete response.
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError>;
}
