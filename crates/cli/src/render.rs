//! Terminal rendering for session output.

use console::style;
use std::fmt::Display;
use toolrelay_agent::{InputOutcome, SessionStats, SlashCommand, TurnReport, help_text};
use toolrelay_core::ToolDefinition;

pub fn banner(model: &str, tool_count: usize) -> String {
    format!(
        "{}\n  Model: {}\n  Tools: {} available\n  Type {} to quit, {} for commands\n",
        style("toolrelay").bold().cyan(),
        model,
        tool_count,
        style("exit").dim(),
        style("/help").dim(),
    )
}

pub fn prompt() -> String {
    format!("{} ", style("You >").cyan().bold())
}

pub fn reply(text: &str) -> String {
    format!("{} {}", style("Claude >").yellow().bold(), text)
}

pub fn tool_line(line: &str) -> String {
    style(line).dim().to_string()
}

pub fn error(message: impl Display) -> String {
    style(format!("Error: {message}")).red().to_string()
}

pub fn note(message: &str) -> String {
    style(message).dim().to_string()
}

pub fn tools(definitions: &[ToolDefinition]) -> String {
    if definitions.is_empty() {
        return note("No tools available.");
    }
    let width = definitions.iter().map(|d| d.name.len()).max().unwrap_or(0);
    definitions
        .iter()
        .map(|d| format!("  {:<width$}  {}", style(&d.name).green(), d.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn goodbye(stats: &SessionStats) -> String {
    format!(
        "Goodbye! {}",
        note(&format!(
            "({} queries, {} input + {} output = {} tokens)",
            stats.queries,
            stats.input_tokens,
            stats.output_tokens,
            stats.total_tokens()
        ))
    )
}

fn turn(report: &TurnReport) -> Vec<String> {
    let mut lines: Vec<String> = report.tool_lines.iter().map(|l| tool_line(l)).collect();
    lines.push(match &report.reply {
        Ok(text) => reply(text),
        Err(e) => error(e),
    });
    lines
}

/// Lines to print for one handled input. `Exit` and `Ignored` print nothing.
pub fn outcome(outcome: &InputOutcome, tool_defs: &[ToolDefinition]) -> Vec<String> {
    match outcome {
        InputOutcome::Ignored | InputOutcome::Exit => Vec::new(),
        InputOutcome::Cleared => vec![note("Conversation cleared.")],
        InputOutcome::ShowTools => vec![tools(tool_defs)],
        InputOutcome::Help => vec![help_text()],
        InputOutcome::NoOp(command) => {
            let name = match command {
                SlashCommand::Save => "/save",
                SlashCommand::Load => "/load",
                _ => "command",
            };
            vec![note(&format!(
                "{name} does nothing: conversations are not persisted."
            ))]
        }
        InputOutcome::UnknownCommand(e) => vec![error(e)],
        InputOutcome::Turn(report) => turn(report),
    }
}
