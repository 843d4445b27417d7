//! Error types for the toolrelay domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use thiserror::Error;

/// Failures talking to the remote model endpoint.
///
/// `Display` renders only the human-readable message so the loop can
/// surface it verbatim as `Error: <message>`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// Connectivity problem or timeout before a response arrived.
    #[error("{0}")]
    Network(String),

    /// Non-2xx response carrying a server-provided message.
    #[error("{message}")]
    Api { status_code: u16, message: String },

    /// The body could not be decoded or lacked the expected content.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// HTTP status for API failures, `None` otherwise.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolError {
    /// No tool with this name, or the referenced path does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The path exists but is a file where a directory was expected, or vice versa.
    #[error("Wrong type: {0}")]
    WrongType(String),

    #[error("I/O failure: {0}")]
    Io(String),

    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),
}

impl ToolError {
    /// Map an I/O error on `path` into the tool taxonomy.
    pub fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => {
                ToolError::NotFound(format!("{} does not exist", path.display()))
            }
            _ => ToolError::Io(format!("{}: {err}", path.display())),
        }
    }
}
