//! Read file tool: return a text file's contents.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use toolrelay_core::error::ToolError;
use toolrelay_core::tool::{Tool, ToolInput};
use tracing::debug;

use crate::fs;

/// Largest slice of a file returned to the model.
pub const MAX_READ_BYTES: usize = 100 * 1024;

pub struct ReadFileTool {
    root: PathBuf,
    max_bytes: usize,
}

impl ReadFileTool {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_bytes: MAX_READ_BYTES,
        }
    }

    /// Override the output cap.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

/// Cut `content` to at most `max` bytes on a char boundary, appending a marker.
fn truncate(mut content: String, max: usize) -> String {
    if content.len() <= max {
        return content;
    }
    let total = content.len();
    let mut cut = max;
    while !content.is_char_boundary(cut) {
        cut -= 1;
    }
    content.truncate(cut);
    content.push_str(&format!("\n[truncated: showing {cut} of {total} bytes]"));
    content
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the contents of a given relative file path. Use this when you want to see \
         what's inside a file. Do not use this with directory names."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The relative path of a file in the working directory"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, input: &ToolInput) -> Result<String, ToolError> {
        let shown = input.require_str("path")?;
        let path = fs::resolve(&self.root, shown);
        fs::require_file(&path, shown).await?;

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| ToolError::from_io(Path::new(shown), e))?;
        let content = String::from_utf8(bytes)
            .map_err(|_| ToolError::Io(format!("{shown} is not valid UTF-8 text")))?;

        debug!(path = %path.display(), bytes = content.len(), "Read file");
        Ok(truncate(content, self.max_bytes))
    }
}
