//! Slash-command parsing.
//!
//! Commands are handled locally and never reach the model.

/// A recognized `/command`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashCommand {
    Exit,
    Clear,
    Tools,
    Help,
    /// Accepted but does nothing; conversations are never persisted.
    Save,
    /// Accepted but does nothing; conversations are never persisted.
    Load,
}

/// Name and one-line description of every command, in help order.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/exit", "Quit the session (also: exit, Ctrl-D)"),
    ("/clear", "Forget the conversation so far"),
    ("/tools", "List the tools the model can use"),
    ("/help", "Show this help"),
    ("/save", "Accepted for compatibility; does nothing"),
    ("/load", "Accepted for compatibility; does nothing"),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command: /{0}. Type /help for available commands.")]
    Unknown(String),
}

impl SlashCommand {
    /// Parse a line of user input.
    ///
    /// Returns `None` when the line is not a command (no leading `/`).
    /// Anything after the command word is ignored.
    pub fn parse(line: &str) -> Option<Result<Self, CommandError>> {
        let rest = line.trim().strip_prefix('/')?;
        let word = rest.split_whitespace().next().unwrap_or("");
        let command = match word.to_ascii_lowercase().as_str() {
            "exit" => Self::Exit,
            "clear" => Self::Clear,
            "tools" => Self::Tools,
            "help" => Self::Help,
            "save" => Self::Save,
            "load" => Self::Load,
            _ => return Some(Err(CommandError::Unknown(word.to_string()))),
        };
        Some(Ok(command))
    }
}

/// Whether `line` is the bare word `exit`, in any case.
pub fn is_exit_word(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("exit")
}

/// Render the command table for `/help`.
pub fn help_text() -> String {
    let width = COMMANDS.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    COMMANDS
        .iter()
        .map(|(name, about)| format!("  {name:<width$}  {about}"))
        .collect::<Vec<_>>()
        .join("\n")
}
