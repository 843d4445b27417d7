//! The chat session: the heart of toolrelay.
//!
//! Each user message runs through a bounded tool-calling loop:
//!
//! 1. **Receive** one line of input; slash commands are handled locally
//! 2. **Query** the model with the transcript and every tool schema
//! 3. **If text**: append it and show it
//! 4. **If tool calls**: run them in order, fold the results into the
//!    transcript, and query once more without tool schemas
//!
//! There is exactly one follow-up query per message, never a second tool round.

pub mod commands;
pub mod loop_runner;
#[cfg(test)]
mod test_helpers;

pub use commands::{COMMANDS, CommandError, SlashCommand, help_text};
pub use loop_runner::{ChatSession, InputOutcome, SessionStats, TurnReport};
