//! Find file tool: recursive search by file name.

use async_trait::async_trait;
use std::path::PathBuf;
use toolrelay_core::error::ToolError;
use toolrelay_core::tool::{Tool, ToolInput};
use tracing::debug;

use crate::fs;

pub struct FindFileTool {
    root: PathBuf,
}

impl FindFileTool {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Tool for FindFileTool {
    fn name(&self) -> &str {
        "find_file"
    }

    fn description(&self) -> &str {
        "Search for files whose name contains the given text (case-insensitive), \
         looking through a directory and all of its subdirectories."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Text the file name must contain, e.g. 'config' or '.rs'"
                },
                "path": {
                    "type": "string",
                    "description": "Directory to search. Defaults to the current directory."
                }
            },
            "required": ["name"]
        })
    }

    async fn execute(&self, input: &ToolInput) -> Result<String, ToolError> {
        let needle = input.require_str("name")?;
        if needle.is_empty() {
            return Err(ToolError::InvalidInput("'name' must not be empty".into()));
        }
        let shown = input.optional_str("path")?.unwrap_or(".");
        let dir = fs::resolve(&self.root, shown);
        fs::require_dir(&dir, shown).await?;

        let needle_lower = needle.to_lowercase();
        let matches: Vec<String> = fs::walk(&dir, shown, true)
            .await?
            .into_iter()
            .filter(|e| !e.is_dir && e.file_name.to_lowercase().contains(&needle_lower))
            .map(|e| e.relative)
            .collect();

        debug!(needle, dir = %dir.display(), found = matches.len(), "Searched files");

        if matches.is_empty() {
            return Err(ToolError::NotFound(format!(
                "no files matching '{needle}' under {shown}"
            )));
        }
        Ok(matches.join("\n"))
    }
}
