//! Create file tool: write a new file, creating parent directories.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use toolrelay_core::error::ToolError;
use toolrelay_core::tool::{Tool, ToolInput};
use tracing::debug;

use crate::fs;

pub struct CreateFileTool {
    root: PathBuf,
}

impl CreateFileTool {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Tool for CreateFileTool {
    fn name(&self) -> &str {
        "create_file"
    }

    fn description(&self) -> &str {
        "Create a new file with the given content. Missing parent directories are created. \
         Fails if the file already exists; use edit_file to change existing files."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The path of the file to create"
                },
                "content": {
                    "type": "string",
                    "description": "The content to write"
                }
            },
            "required": ["path", "content"]
        })
    }

    async fn execute(&self, input: &ToolInput) -> Result<String, ToolError> {
        let shown = input.require_str("path")?;
        let content = input.require_str("content")?;
        let path = fs::resolve(&self.root, shown);

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => {
                return Err(ToolError::WrongType(format!("{shown} is a directory")));
            }
            Ok(_) => {
                return Err(ToolError::InvalidInput(format!(
                    "{shown} already exists; use edit_file to modify it"
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(ToolError::from_io(Path::new(shown), e)),
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ToolError::Io(format!("creating parent of {shown}: {e}")))?;
        }

        tokio::fs::write(&path, content)
            .await
            .map_err(|e| ToolError::from_io(Path::new(shown), e))?;

        debug!(path = %path.display(), bytes = content.len(), "Created file");
        Ok(format!("Created {shown} ({} bytes)", content.len()))
    }
}
