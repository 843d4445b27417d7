//! # toolrelay core
//!
//! Domain types, traits, and error definitions for the toolrelay chat client.
//! This crate has no HTTP or terminal dependencies; it defines the model
//! that the provider, tool, and agent crates implement against.
//!
//! Every seam is a trait here:
//! - [`Provider`]: the remote model endpoint
//! - [`Tool`]: a local operation the model may invoke

pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{ProviderError, ToolError};
pub use message::{ConversationId, Role, Transcript, Turn};
pub use provider::{
    ContentBlock, Provider, ProviderRequest, ProviderResponse, StopReason, ToolDefinition,
    ToolUseRequest, Usage,
};
pub use tool::{Tool, ToolInput, ToolRegistry};
