//! Interactive read-eval-print loop over stdin.

use std::io::Write;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader};
use toolrelay_agent::{ChatSession, InputOutcome};

use crate::render;

/// Read one line, decoding invalid UTF-8 lossily.
///
/// Returns `None` at end of input. The line ending is stripped.
async fn read_line<R>(reader: &mut R) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf).await? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// Run the interactive chat until `exit`, `/exit` or end of input.
pub async fn run(mut session: ChatSession) -> Result<(), Box<dyn std::error::Error>> {
    let tool_defs = session.tool_schemas();
    println!();
    println!("{}", render::banner(session.model(), tool_defs.len()));

    let mut stdin = BufReader::new(io::stdin());
    loop {
        print!("{}", render::prompt());
        std::io::stdout().flush()?;

        let Some(line) = read_line(&mut stdin).await? else {
            println!();
            break;
        };

        let outcome = session.handle_input(&line).await;
        if outcome == InputOutcome::Exit {
            break;
        }
        for out in render::outcome(&outcome, &tool_defs) {
            println!("{out}");
        }
        if !matches!(outcome, InputOutcome::Ignored) {
            println!();
        }
    }

    tracing::info!(
        conversation_id = %session.transcript().id(),
        turns = session.transcript().len(),
        "Session ended"
    );
    println!("{}", render::goodbye(&session.stats()));
    Ok(())
}
