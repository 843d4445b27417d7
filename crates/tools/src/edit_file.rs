//! Edit file tool: exact string replacement in an existing file.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use toolrelay_core::error::ToolError;
use toolrelay_core::tool::{Tool, ToolInput};
use tracing::debug;

use crate::fs;

pub struct EditFileTool {
    root: PathBuf,
}

impl EditFileTool {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Tool for EditFileTool {
    fn name(&self) -> &str {
        "edit_file"
    }

    fn description(&self) -> &str {
        "Make edits to a text file. Replaces 'old_str' with 'new_str' in the given file. \
         'old_str' must appear in the file exactly. Only the first occurrence is replaced \
         unless 'replace_all' is true. Use create_file for new files."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The path to the file"
                },
                "old_str": {
                    "type": "string",
                    "description": "Text to search for; must match exactly"
                },
                "new_str": {
                    "type": "string",
                    "description": "Text to replace old_str with"
                },
                "replace_all": {
                    "type": "boolean",
                    "description": "Replace every occurrence instead of only the first"
                }
            },
            "required": ["path", "old_str", "new_str"]
        })
    }

    async fn execute(&self, input: &ToolInput) -> Result<String, ToolError> {
        let shown = input.require_str("path")?;
        let old_str = input.require_str("old_str")?;
        let new_str = input.require_str("new_str")?;
        let replace_all = input.optional_bool("replace_all")?.unwrap_or(false);

        if old_str.is_empty() {
            return Err(ToolError::InvalidInput("'old_str' must not be empty".into()));
        }

        let path = fs::resolve(&self.root, shown);
        fs::require_file(&path, shown).await?;

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ToolError::from_io(Path::new(shown), e))?;

        let occurrences = content.matches(old_str).count();
        if occurrences == 0 {
            return Err(ToolError::InvalidInput(format!(
                "'old_str' not found in {shown}"
            )));
        }
        if old_str == new_str {
            return Ok(format!("No changes made to {shown}: old_str equals new_str"));
        }

        let (updated, replaced) = if replace_all {
            (content.replace(old_str, new_str), occurrences)
        } else {
            (content.replacen(old_str, new_str, 1), 1)
        };

        tokio::fs::write(&path, &updated)
            .await
            .map_err(|e| ToolError::from_io(Path::new(shown), e))?;

        debug!(path = %path.display(), replaced, "Edited file");
        Ok(format!(
            "Edited {shown}: replaced {replaced} occurrence{}",
            if replaced == 1 { "" } else { "s" }
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: serde_json::Value) -> ToolInput {
        ToolInput::from_value(value).unwrap()
    }

    fn setup(content: &str) -> (tempfile::TempDir, EditFileTool) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), content).unwrap();
        let tool = EditFileTool::new(dir.path());
        (dir, tool)
    }

    fn read(dir: &tempfile::TempDir) -> String {
        std::fs::read_to_string(dir.path().join("notes.txt")).unwrap()
    }

    #[test]
    fn tool_definition() {
        let tool = EditFileTool::new(".");
        assert_eq!(tool.name(), "edit_file");
        assert_eq!(
            tool.input_schema()["required"],
            json!(["path", "old_str", "new_str"])
        );
    }

    #[tokio::test]
    async fn replaces_first_occurrence_by_default() {
        let (dir, tool) = setup("one two one");
        let output = tool
            .execute(&input(json!({"path": "notes.txt", "old_str": "one", "new_str": "1"})))
            .await
            .unwrap();
        assert_eq!(output, "Edited notes.txt: replaced 1 occurrence");
        assert_eq!(read(&dir), "1 two one");
    }

    #[tokio::test]
    async fn replace_all() {
        let (dir, tool) = setup("one two one");
        let output = tool
            .execute(&input(json!({
                "path": "notes.txt",
                "old_str": "one",
                "new_str": "1",
                "replace_all": true
            })))
            .await
            .unwrap();
        assert_eq!(output, "Edited notes.txt: replaced 2 occurrences");
        assert_eq!(read(&dir), "1 two 1");
    }

    #[tokio::test]
    async fn missing_old_str_fails_and_leaves_file() {
        let (dir, tool) = setup("hello");
        let err = tool
            .execute(&input(json!({"path": "notes.txt", "old_str": "bye", "new_str": "x"})))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ToolError::InvalidInput("'old_str' not found in notes.txt".into())
        );
        assert_eq!(read(&dir), "hello");
    }

    #[tokio::test]
    async fn identical_strings_are_a_no_op() {
        let (dir, tool) = setup("keep me");
        let output = tool
            .execute(&input(json!({"path": "notes.txt", "old_str": "keep", "new_str": "keep"})))
            .await
            .unwrap();
        assert!(output.starts_with("No changes made"));
        assert_eq!(read(&dir), "keep me");
    }

    #[tokio::test]
    async fn identical_strings_still_require_presence() {
        let (_dir, tool) = setup("keep me");
        let err = tool
            .execute(&input(json!({"path": "notes.txt", "old_str": "gone", "new_str": "gone"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let (_dir, tool) = setup("");
        let err = tool
            .execute(&input(json!({"path": "other.txt", "old_str": "a", "new_str": "b"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn missing_new_str_is_invalid() {
        let (_dir, tool) = setup("abc");
        let err = tool
            .execute(&input(json!({"path": "notes.txt", "old_str": "a"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(msg) if msg.contains("new_str")));
    }
}
