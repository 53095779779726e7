use super::insights::AI_DISABLED;
use super::ui;
use crate::core::AiCapability;
use crate::core::assistant::{Assistant, ChatReply, ChatTurn};
use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, error};

const GREETING: &str = "Hello! I'm the fxdesk assistant. How can I help you today?";
const CHAT_FAILED: &str = "An error occurred. Please try again.";

fn write_reply<W: Write>(out: &mut W, reply: &ChatReply) -> Result<()> {
    writeln!(out, "{}", reply.text)?;
    if !reply.sources.is_empty() {
        writeln!(out, "{}", ui::style_text("Sources:", ui::StyleType::Subtle))?;
        for source in &reply.sources {
            writeln!(out, "  - {} ({})", source.title, source.uri)?;
        }
    }
    Ok(())
}

/// Reads messages from `input` until EOF or `exit`, keeping the conversation
/// history across turns. Failed turns are reported and left out of the history.
pub async fn converse<R, W>(
    assistant: &dyn Assistant,
    input: R,
    out: &mut W,
) -> Result<Vec<ChatTurn>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut history = Vec::new();
    let mut lines = input.lines();

    writeln!(out, "{GREETING}")?;
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        match ui::with_spinner("Thinking...", assistant.chat(message, &history)).await {
            Ok(reply) => {
                write_reply(out, &reply)?;
                history.push(ChatTurn::user(message));
                history.push(ChatTurn::model(reply.text));
            }
            Err(e) => {
                error!(error = %e, "Chat request failed");
                writeln!(out, "{}", ui::style_text(CHAT_FAILED, ui::StyleType::Error))?;
            }
        }
    }
    debug!(turns = history.len(), "Chat finished");
    Ok(history)
}

pub async fn run(ai: &AiCapability, message: Option<&str>) -> Result<()> {
    let Some(assistant) = ai.client() else {
        println!("{AI_DISABLED}");
        return Ok(());
    };

    match message {
        Some(message) => {
            let reply = ui::with_spinner("Thinking...", assistant.chat(message, &[])).await?;
            write_reply(&mut std::io::stdout(), &reply)
        }
        None => {
            let stdin = BufReader::new(tokio::io::stdin());
            converse(assistant.as_ref(), stdin, &mut std::io::stdout()).await?;
            Ok(())
        }
    }
}
