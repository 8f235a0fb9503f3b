//! Prompt-less "say" command

use std::error::Error;

use crate::core::app::{App, Command, CommandOutcome, TurnStatus};

pub async fn run_say(mut app: App, prompt: Vec<String>) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: taskchat say <message>");
        std::process::exit(1);
    }

    match say(&mut app, prompt).await {
        Ok(reply) => {
            println!("{reply}");
            Ok(())
        }
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    }
}

/// Sends one message. Anything short of a real assistant reply is an error
/// carrying the text the chat would have shown.
pub async fn say(app: &mut App, prompt: String) -> Result<String, String> {
    match app.dispatch(Command::SendMessage(prompt)).await {
        CommandOutcome::Turn(report) => match report.status {
            TurnStatus::Answered { .. } => Ok(report.reply.content),
            _ => Err(report.reply.content),
        },
        CommandOutcome::Ignored => Err("Usage: taskchat say <message>".to_string()),
        other => Err(format!("unexpected outcome for a message: {other:?}")),
    }
}
