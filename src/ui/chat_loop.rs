//! Line-oriented chat prompt.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::commands::{help_text, process_input, CommandResult};
use crate::core::app::{App, Command, CommandOutcome, TurnStatus};
use crate::ui::renderer::{render_message, render_status, render_task_refresh};

const PROMPT: &str = "> ";
const WELCOME: &str = "Type a message to manage your tasks, or /help for commands.";
const RESET_NOTICE: &str = "🔄 Started a new conversation.";
const ROTATED_NOTICE: &str = "ℹ️ The backend started a new session.";

/// Runs the prompt against stdin and stdout until `/quit` or end of input.
pub async fn run_chat(app: App, auto_load_tasks: bool) -> Result<(), Box<dyn std::error::Error>> {
    let input = BufReader::new(tokio::io::stdin());
    let mut output = std::io::stdout();
    run_session(app, auto_load_tasks, input, &mut output).await
}

pub async fn run_session<R, W>(
    mut app: App,
    auto_load_tasks: bool,
    input: R,
    output: &mut W,
) -> Result<(), Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if auto_load_tasks {
        let refresh = app.initial_task_load().await;
        writeln!(output, "{}", render_task_refresh(&refresh))?;
    }
    writeln!(
        output,
        "{}",
        render_status(app.session().is_disconnected(), app.base_url())
    )?;
    writeln!(output, "{WELCOME}")?;

    let mut lines = input.lines();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(output)?;
            break;
        };

        let command = match process_input(&line) {
            CommandResult::ProcessAsMessage(text) => Command::SendMessage(text),
            CommandResult::Dispatch(command) => command,
            CommandResult::ShowHelp => {
                writeln!(output, "{}", help_text())?;
                continue;
            }
            CommandResult::ShowStatus => {
                writeln!(
                    output,
                    "{}",
                    render_status(app.session().is_disconnected(), app.base_url())
                )?;
                continue;
            }
            CommandResult::Usage(message) => {
                writeln!(output, "{message}")?;
                continue;
            }
            CommandResult::Quit => break,
        };

        let was_disconnected = app.session().is_disconnected();
        let outcome = app.dispatch(command).await;
        render_outcome(&outcome, output)?;

        let disconnected = app.session().is_disconnected();
        if disconnected != was_disconnected {
            debug!(disconnected, "backend connectivity changed");
            writeln!(output, "{}", render_status(disconnected, app.base_url()))?;
        }
    }

    Ok(())
}

fn render_outcome<W: Write>(outcome: &CommandOutcome, output: &mut W) -> std::io::Result<()> {
    match outcome {
        CommandOutcome::Ignored => Ok(()),
        CommandOutcome::Turn(report) => {
            writeln!(output, "{}", render_message(&report.reply))?;
            if report.status
                == (TurnStatus::Answered {
                    session_rotated: true,
                })
            {
                writeln!(output, "{ROTATED_NOTICE}")?;
            }
            Ok(())
        }
        CommandOutcome::Tasks(refresh) => writeln!(output, "{}", render_task_refresh(refresh)),
        CommandOutcome::Reset => writeln!(output, "{RESET_NOTICE}"),
    }
}
