//! Tool trait: the abstraction over local capabilities the model may invoke.
//!
//! Tools are registered once at startup in a [`ToolRegistry`]; the
//! orchestration loop looks them up by name when the model requests them.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

use crate::error::ToolError;
use crate::provider::{ToolDefinition, ToolUseRequest};

/// The validated parameter map handed to a tool.
///
/// The wire value is a tagged union (null | bool | number | string | array |
/// object). Only objects (or null, meaning "no parameters") are accepted;
/// each tool then narrows the keys it expects through the typed accessors,
/// which fail with [`ToolError::InvalidInput`] on a missing key or wrong
/// shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolInput {
    params: Map<String, Value>,
}

impl ToolInput {
    pub fn from_value(value: Value) -> Result<Self, ToolError> {
        match value {
            Value::Object(params) => Ok(Self { params }),
            Value::Null => Ok(Self::default()),
            other => Err(ToolError::InvalidInput(format!(
                "expected an object of parameters, got {}",
                kind_of(&other)
            ))),
        }
    }

    /// A required string parameter.
    pub fn require_str(&self, key: &str) -> Result<&str, ToolError> {
        match self.params.get(key) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(ToolError::InvalidInput(format!(
                "'{key}' must be a string, got {}",
                kind_of(other)
            ))),
            None => Err(ToolError::InvalidInput(format!(
                "missing required parameter '{key}'"
            ))),
        }
    }

    /// An optional string parameter; explicit `null` counts as absent.
    pub fn optional_str(&self, key: &str) -> Result<Option<&str>, ToolError> {
        match self.params.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(ToolError::InvalidInput(format!(
                "'{key}' must be a string, got {}",
                kind_of(other)
            ))),
        }
    }

    /// An optional boolean parameter; explicit `null` counts as absent.
    pub fn optional_bool(&self, key: &str) -> Result<Option<bool>, ToolError> {
        match self.params.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(ToolError::InvalidInput(format!(
                "'{key}' must be a boolean, got {}",
                kind_of(other)
            ))),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The core Tool trait.
///
/// Each file operation implements this trait. Executables may have local
/// file-system side effects and report failures as typed [`ToolError`]s.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "read_file").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn input_schema(&self) -> Value;

    /// Execute the tool with validated parameters.
    async fn execute(&self, input: &ToolInput) -> Result<String, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the LLM.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// An ordered registry of available tools.
///
/// Insertion order is preserved so the schema list sent to the model is
/// identical on every query of a session.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool. Fails if a tool with the same name already exists.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(ToolError::DuplicateTool(name));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Get a tool by name.
    pub fn lookup(&self, name: &str) -> Option<&dyn Tool> {
        self.index.get(name).map(|&i| self.tools[i].as_ref())
    }

    /// All tool schemas, in registration order.
    pub fn all_schemas(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.to_definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Look up and run a model-issued tool call.
    pub async fn execute(&self, call: &ToolUseRequest) -> Result<String, ToolError> {
        let tool = self
            .lookup(&call.name)
            .ok_or_else(|| ToolError::NotFound(format!("no tool named '{}'", call.name)))?;
        let input = ToolInput::from_value(call.input.clone())?;
        debug!(tool = %call.name, call_id = %call.id, "Dispatching tool call");
        tool.execute(&input).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
