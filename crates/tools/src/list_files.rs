//! List files tool: directory listing relative to the tool root.

use async_trait::async_trait;
use std::path::PathBuf;
use toolrelay_core::error::ToolError;
use toolrelay_core::tool::{Tool, ToolInput};

use crate::fs;

pub struct ListFilesTool {
    root: PathBuf,
}

impl ListFilesTool {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "List files and directories at a given path. Directories are shown with a \
         trailing '/'. Defaults to the current directory."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Directory to list. Defaults to the current directory."
                },
                "recursive": {
                    "type": "boolean",
                    "description": "Also list subdirectory contents, skipping hidden entries"
                }
            }
        })
    }

    async fn execute(&self, input: &ToolInput) -> Result<String, ToolError> {
        let shown = input.optional_str("path")?.unwrap_or(".");
        let recursive = input.optional_bool("recursive")?.unwrap_or(false);
        let dir = fs::resolve(&self.root, shown);

        fs::require_dir(&dir, shown).await?;
        let entries = fs::walk(&dir, shown, recursive).await?;

        if entries.is_empty() {
            return Ok(format!("{shown} is empty"));
        }
        Ok(entries
            .iter()
            .map(fs::Entry::display)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
