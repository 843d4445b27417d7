//! The chat session and its tool-calling loop.

use std::sync::Arc;
use toolrelay_core::error::ProviderError;
use toolrelay_core::message::{Transcript, Turn};
use toolrelay_core::provider::{
    Provider, ProviderRequest, ProviderResponse, StopReason, ToolDefinition, ToolUseRequest, Usage,
};
use toolrelay_core::tool::ToolRegistry;
use tracing::{debug, info, warn};

use crate::commands::{self, CommandError, SlashCommand};

/// Token and call counters accumulated over a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Successful model queries
    pub queries: u32,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub tool_calls: u32,
    pub tool_failures: u32,
}

impl SessionStats {
    fn record_usage(&mut self, usage: &Usage) {
        self.queries += 1;
        self.input_tokens += u64::from(usage.input_tokens);
        self.output_tokens += u64::from(usage.output_tokens);
    }

    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// What happened during one user message.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    /// One line per tool invocation, in the order the model requested them.
    pub tool_lines: Vec<String>,
    /// The text shown to the user, or the failure that replaced it.
    pub reply: Result<String, ProviderError>,
}

/// Result of handing one line of input to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum InputOutcome {
    /// Blank line; nothing happened.
    Ignored,
    Exit,
    Cleared,
    ShowTools,
    Help,
    /// `/save` or `/load`: accepted, no effect.
    NoOp(SlashCommand),
    UnknownCommand(CommandError),
    Turn(TurnReport),
}

/// One interactive conversation with the model.
///
/// Owns the transcript exclusively; every mutation goes through
/// [`ChatSession::handle_input`] or [`ChatSession::send`].
pub struct ChatSession {
    provider: Arc<dyn Provider>,
    tools: Arc<ToolRegistry>,
    model: String,
    max_tokens: u32,
    system_prompt: Option<String>,
    transcript: Transcript,
    stats: SessionStats,
}

impl ChatSession {
    pub fn new(
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            tools,
            model: model.into(),
            max_tokens: 1024,
            system_prompt: None,
            transcript: Transcript::new(),
            stats: SessionStats::default(),
        }
    }

    /// Set the max tokens per model response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    /// Send a top-level system prompt with every query.
    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt.filter(|p| !p.trim().is_empty());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn tool_schemas(&self) -> Vec<ToolDefinition> {
        self.tools.all_schemas()
    }

    /// Drop the conversation history.
    pub fn clear(&mut self) {
        self.transcript.clear();
        info!(conversation_id = %self.transcript.id(), "Transcript cleared");
    }

    /// Route one line of user input: blank lines, exit words and slash
    /// commands are handled locally; anything else goes to the model.
    pub async fn handle_input(&mut self, line: &str) -> InputOutcome {
        let text = line.trim();
        if text.is_empty() {
            return InputOutcome::Ignored;
        }
        if commands::is_exit_word(text) {
            return InputOutcome::Exit;
        }
        if let Some(parsed) = SlashCommand::parse(text) {
            return match parsed {
                Ok(command) => self.run_command(command),
                Err(e) => {
                    debug!(error = %e, "Rejected slash command");
                    InputOutcome::UnknownCommand(e)
                }
            };
        }
        InputOutcome::Turn(self.send(text).await)
    }

    fn run_command(&mut self, command: SlashCommand) -> InputOutcome {
        match command {
            SlashCommand::Exit => InputOutcome::Exit,
            SlashCommand::Clear => {
                self.clear();
                InputOutcome::Cleared
            }
            SlashCommand::Tools => InputOutcome::ShowTools,
            SlashCommand::Help => InputOutcome::Help,
            SlashCommand::Save | SlashCommand::Load => InputOutcome::NoOp(command),
        }
    }

    /// Process one user message through the tool-calling loop.
    ///
    /// 1. Append the user turn and query with every tool schema
    /// 2. No tool calls: the first text block is the reply
    /// 3. Otherwise run each call in order, append one assistant turn
    ///    announcing the tools and one user turn carrying their results
    /// 4. Query again without tool schemas for the final reply
    ///
    /// A failed query appends nothing; turns already appended stay.
    pub async fn send(&mut self, text: &str) -> TurnReport {
        self.transcript.push(Turn::user(text));
        info!(
            conversation_id = %self.transcript.id(),
            turns = self.transcript.len(),
            "Processing user message"
        );

        let response = match self.query(true).await {
            Ok(response) => response,
            Err(e) => return Self::failed(Vec::new(), e),
        };

        let calls: Vec<ToolUseRequest> = response.tool_uses().into_iter().cloned().collect();
        if calls.is_empty() {
            return TurnReport {
                tool_lines: Vec::new(),
                reply: self.accept_text(&response),
            };
        }

        let tool_lines = self.run_tools(&calls).await;
        self.transcript.push(Turn::assistant(announce(&calls)));
        self.transcript.push(Turn::user(tool_lines.join("\n")));

        let reply = match self.query(false).await {
            Ok(response) => self.accept_text(&response),
            Err(e) => {
                warn!(error = %e, "Follow-up query failed");
                Err(e)
            }
        };
        TurnReport { tool_lines, reply }
    }

    fn failed(tool_lines: Vec<String>, error: ProviderError) -> TurnReport {
        warn!(error = %error, "Query failed");
        TurnReport {
            tool_lines,
            reply: Err(error),
        }
    }

    async fn query(&mut self, with_tools: bool) -> Result<ProviderResponse, ProviderError> {
        let request = ProviderRequest {
            model: self.model.clone(),
            system: self.system_prompt.clone(),
            turns: self.transcript.turns().to_vec(),
            max_tokens: self.max_tokens,
            tools: if with_tools {
                self.tools.all_schemas()
            } else {
                Vec::new()
            },
        };

        debug!(
            provider = self.provider.name(),
            turns = request.turns.len(),
            tools = request.tools.len(),
            "Querying model"
        );
        let response = self.provider.complete(request).await?;

        self.stats.record_usage(&response.usage);
        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            session_total = self.stats.total_tokens(),
            "Query usage"
        );
        if response.stop_reason == Some(StopReason::MaxTokens) {
            warn!(max_tokens = self.max_tokens, "Response hit the max_tokens limit");
        }
        Ok(response)
    }

    /// Append the first text block as an assistant turn.
    fn accept_text(&mut self, response: &ProviderResponse) -> Result<String, ProviderError> {
        let Some(text) = response.first_text() else {
            let e = ProviderError::MalformedResponse("response contained no text".into());
            warn!(response_id = %response.id, "Response had no text block");
            return Err(e);
        };
        self.transcript.push(Turn::assistant(text));
        Ok(text.to_string())
    }

    async fn run_tools(&mut self, calls: &[ToolUseRequest]) -> Vec<String> {
        debug!(tool_count = calls.len(), "Executing tool calls");
        let mut lines = Vec::with_capacity(calls.len());
        for call in calls {
            self.stats.tool_calls += 1;
            let line = match self.tools.execute(call).await {
                Ok(output) => format!("Tool '{}' returned: {output}", call.name),
                Err(e) => {
                    self.stats.tool_failures += 1;
                    warn!(tool = %call.name, error = %e, "Tool execution failed");
                    format!("Tool '{}' error: {e}", call.name)
                }
            };
            lines.push(line);
        }
        lines
    }
}

/// Content of the synthetic assistant turn recorded for a tool batch.
fn announce(calls: &[ToolUseRequest]) -> String {
    let names: Vec<&str> = calls.iter().map(|c| c.name.as_str()).collect();
    if names.len() == 1 {
        format!("Using tool: {}", names[0])
    } else {
        format!("Using tools: {}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use serde_json::json;
    use toolrelay_core::Role;
    use toolrelay_core::error::ToolError;

    fn session(provider: Arc<ScriptedProvider>) -> ChatSession {
        ChatSession::new(provider, Arc::new(echo_registry()), "mock-model")
    }

    #[tokio::test]
    async fn simple_text_response() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(text_response(
            "Hello! How can I help?",
        ))]));
        let mut chat = session(provider.clone());

        let report = chat.send("Hello!").await;
        assert_eq!(report.reply, Ok("Hello! How can I help?".to_string()));
        assert!(report.tool_lines.is_empty());
        assert_eq!(chat.transcript().len(), 2);
        assert_eq!(chat.transcript().turns()[1], Turn::assistant("Hello! How can I help?"));

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].tools.len(), 2);
        assert_eq!(requests[0].max_tokens, 1024);
    }

    #[tokio::test]
    async fn n_exchanges_give_two_n_turns() {
        let replies = ["one", "two", "three"];
        let provider = Arc::new(ScriptedProvider::new(
            replies.iter().map(|r| Ok(text_response(r))).collect(),
        ));
        let mut chat = session(provider);

        for (i, reply) in replies.iter().enumerate() {
            chat.send(&format!("message {i}")).await;
            let turns = chat.transcript().turns();
            assert_eq!(turns.len(), 2 * (i + 1));
            assert_eq!(turns[2 * i + 1].content, *reply);
        }
    }

    #[tokio::test]
    async fn tool_batch_appends_two_synthetic_turns() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(tool_response(vec![
                tool_call("t1", "echo", json!({"text": "first"})),
                tool_call("t2", "missing_tool", json!({})),
                tool_call("t3", "fail", json!({})),
            ])),
            Ok(text_response("All done.")),
        ]));
        let mut chat = session(provider.clone());

        let report = chat.send("do things").await;
        assert_eq!(
            report.tool_lines,
            vec![
                "Tool 'echo' returned: first".to_string(),
                "Tool 'missing_tool' error: Not found: no tool named 'missing_tool'".to_string(),
                format!("Tool 'fail' error: {}", ToolError::Io("disk on fire".into())),
            ]
        );
        assert_eq!(report.reply, Ok("All done.".to_string()));

        // user, synthetic assistant, synthetic user, final assistant
        let turns = chat.transcript().turns();
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[1], Turn::assistant("Using tools: echo, missing_tool, fail"));
        assert_eq!(turns[2].role, Role::User);
        assert_eq!(turns[2].content, report.tool_lines.join("\n"));
        assert_eq!(turns[3], Turn::assistant("All done."));

        let stats = chat.stats();
        assert_eq!(stats.tool_calls, 3);
        assert_eq!(stats.tool_failures, 2);
        assert_eq!(stats.queries, 2);
    }

    #[tokio::test]
    async fn requery_carries_no_tool_schemas() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(tool_response(vec![tool_call("t1", "echo", json!({"text": "x"}))])),
            Ok(text_response("ok")),
        ]));
        let mut chat = session(provider.clone());
        chat.send("go").await;

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert!(!requests[0].tools.is_empty());
        assert!(requests[1].tools.is_empty());
        assert_eq!(requests[1].turns.len(), 3);
    }

    #[tokio::test]
    async fn query_failure_keeps_only_user_turn() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(ProviderError::Api {
            status_code: 429,
            message: "slow down".into(),
        })]));
        let mut chat = session(provider);

        let report = chat.send("hello").await;
        assert_eq!(report.reply.unwrap_err().to_string(), "slow down");
        assert_eq!(chat.transcript().turns(), &[Turn::user("hello")]);
        assert_eq!(chat.stats().queries, 0);
    }

    #[tokio::test]
    async fn requery_failure_keeps_synthetic_turns() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(tool_response(vec![tool_call("t1", "echo", json!({"text": "x"}))])),
            Err(ProviderError::Network("connection reset".into())),
        ]));
        let mut chat = session(provider);

        let report = chat.send("go").await;
        assert_eq!(report.tool_lines, vec!["Tool 'echo' returned: x".to_string()]);
        assert!(matches!(report.reply, Err(ProviderError::Network(_))));
        assert_eq!(chat.transcript().len(), 3);
        assert_eq!(chat.transcript().last().map(|t| t.role), Some(Role::User));
    }

    #[tokio::test]
    async fn empty_content_is_malformed() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(response_with(vec![]))]));
        let mut chat = session(provider);

        let report = chat.send("hi").await;
        assert!(matches!(report.reply, Err(ProviderError::MalformedResponse(_))));
        assert_eq!(chat.transcript().len(), 1);
    }

    #[tokio::test]
    async fn unknown_command_never_contacts_provider() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let mut chat = session(provider.clone());

        let outcome = chat.handle_input("/foo").await;
        assert_eq!(outcome, InputOutcome::UnknownCommand(CommandError::Unknown("foo".into())));
        assert!(provider.requests().is_empty());
        assert!(chat.transcript().is_empty());
    }

    #[tokio::test]
    async fn quit_is_unknown_not_exit() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let mut chat = session(provider.clone());

        let outcome = chat.handle_input("/quit").await;
        assert_eq!(outcome, InputOutcome::UnknownCommand(CommandError::Unknown("quit".into())));
        assert!(provider.requests().is_empty());
        assert!(chat.transcript().is_empty());
    }

    #[tokio::test]
    async fn local_inputs() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(text_response("hi"))]));
        let mut chat = session(provider.clone());

        assert_eq!(chat.handle_input("   ").await, InputOutcome::Ignored);
        assert_eq!(chat.handle_input("EXIT").await, InputOutcome::Exit);
        assert_eq!(chat.handle_input("/exit").await, InputOutcome::Exit);
        assert_eq!(chat.handle_input("/tools").await, InputOutcome::ShowTools);
        assert_eq!(chat.handle_input("/help").await, InputOutcome::Help);
        assert_eq!(chat.handle_input("/save").await, InputOutcome::NoOp(SlashCommand::Save));
        assert!(provider.requests().is_empty());

        assert!(matches!(chat.handle_input("hello").await, InputOutcome::Turn(_)));
        assert_eq!(chat.transcript().len(), 2);
        assert_eq!(chat.handle_input("/clear").await, InputOutcome::Cleared);
        assert!(chat.transcript().is_empty());
    }

    #[tokio::test]
    async fn system_prompt_and_usage_are_tracked() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(text_response("a")),
            Ok(text_response("b")),
        ]));
        let mut chat = session(provider.clone())
            .with_system_prompt(Some("Be brief.".into()))
            .with_max_tokens(256);

        chat.send("one").await;
        chat.send("two").await;

        let requests = provider.requests();
        assert!(requests.iter().all(|r| r.system.as_deref() == Some("Be brief.")));
        assert!(requests.iter().all(|r| r.max_tokens == 256));

        let stats = chat.stats();
        assert_eq!(stats.queries, 2);
        assert_eq!(stats.input_tokens, 20);
        assert_eq!(stats.output_tokens, 10);
        assert_eq!(stats.total_tokens(), 30);
    }

    #[test]
    fn announce_single_and_many() {
        let one = [tool_call("a", "list_files", json!({}))];
        assert_eq!(announce(&one), "Using tool: list_files");
        let two = [
            tool_call("a", "read_file", json!({})),
            tool_call("b", "edit_file", json!({})),
        ];
        assert_eq!(announce(&two), "Using tools: read_file, edit_file");
    }
}
