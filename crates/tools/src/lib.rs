//! Local file-system tools for toolrelay.
//!
//! Every tool resolves relative paths against a single root directory
//! (the configured `tools.root`, or the working directory).

pub mod create_file;
pub mod edit_file;
pub mod find_file;
mod fs;
pub mod list_files;
pub mod read_file;

pub use create_file::CreateFileTool;
pub use edit_file::EditFileTool;
pub use find_file::FindFileTool;
pub use list_files::ListFilesTool;
pub use read_file::ReadFileTool;

use std::path::Path;
use toolrelay_core::error::ToolError;
use toolrelay_core::tool::ToolRegistry;

/// Create the registry of built-in file tools rooted at `root`.
///
/// Registration order is the order schemas are offered to the model.
pub fn default_registry(root: &Path) -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(ReadFileTool::new(root)))?;
    registry.register(Box::new(ListFilesTool::new(root)))?;
    registry.register(Box::new(FindFileTool::new(root)))?;
    registry.register(Box::new(EditFileTool::new(root)))?;
    registry.register(Box::new(CreateFileTool::new(root)))?;
    tracing::debug!(root = %root.display(), tools = registry.len(), "Built tool registry");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolrelay_core::ToolUseRequest;

    #[test]
    fn default_registry_order() {
        let registry = default_registry(Path::new(".")).unwrap();
        let names: Vec<_> = registry.all_schemas().into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec!["read_file", "list_files", "find_file", "edit_file", "create_file"]
        );
    }

    #[test]
    fn schemas_are_objects() {
        let registry = default_registry(Path::new(".")).unwrap();
        for def in registry.all_schemas() {
            assert_eq!(def.input_schema["type"], "object", "{}", def.name);
            assert!(!def.description.is_empty());
        }
    }

    #[tokio::test]
    async fn registry_dispatches_to_rooted_tool() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "alpha").unwrap();
        let registry = default_registry(dir.path()).unwrap();

        let call = ToolUseRequest {
            id: "toolu_1".into(),
            name: "read_file".into(),
            input: serde_json::json!({"path": "a.txt"}),
        };
        assert_eq!(registry.execute(&call).await.unwrap(), "alpha");
    }
}
