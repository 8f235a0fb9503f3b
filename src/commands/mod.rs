//! Slash commands typed at the chat prompt.
//!
//! Anything that is not a known `/command` is handed back as a message for the
//! backend, so a line such as `/etc/hosts is missing` still reaches the
//! assistant.

mod registry;

pub use registry::{all_commands, CommandInvocation, SlashCommand};

use crate::core::app::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Hand the command to the orchestrator.
    Dispatch(Command),
    ShowHelp,
    ShowStatus,
    Quit,
    /// Usage problem with a known command; shown but not sent anywhere.
    Usage(String),
    ProcessAsMessage(String),
}

pub fn process_input(input: &str) -> CommandResult {
    let trimmed = input.trim();

    if !trimmed.starts_with('/') {
        return CommandResult::ProcessAsMessage(input.to_string());
    }

    let mut parts = trimmed[1..].splitn(2, ' ');
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    if let Some(command) = registry::find_command(command_name) {
        let invocation = CommandInvocation {
            input: trimmed,
            args,
        };
        (command.handler)(invocation)
    } else {
        CommandResult::ProcessAsMessage(input.to_string())
    }
}

pub fn help_text() -> String {
    let width = all_commands()
        .iter()
        .map(|command| command.name.len())
        .max()
        .unwrap_or_default();

    let mut help = String::from("Commands:\n");
    for command in all_commands() {
        help.push_str(&format!(
            "  /{:<width$}  {}\n",
            command.name,
            command.help,
            width = width
        ));
    }
    help.push_str("Anything else is sent to the assistant.");
    help
}

fn no_arguments(invocation: CommandInvocation<'_>, result: CommandResult) -> CommandResult {
    if invocation.args.is_empty() {
        result
    } else {
        let name = invocation
            .input
            .split_whitespace()
            .next()
            .unwrap_or(invocation.input);
        CommandResult::Usage(format!("Usage: {name} (takes no arguments)"))
    }
}

pub(super) fn handle_help(invocation: CommandInvocation<'_>) -> CommandResult {
    no_arguments(invocation, CommandResult::ShowHelp)
}

pub(super) fn handle_tasks(invocation: CommandInvocation<'_>) -> CommandResult {
    no_arguments(invocation, CommandResult::Dispatch(Command::RefreshTasks))
}

pub(super) fn handle_reset(invocation: CommandInvocation<'_>) -> CommandResult {
    no_arguments(invocation, CommandResult::Dispatch(Command::ResetSession))
}

pub(super) fn handle_status(invocation: CommandInvocation<'_>) -> CommandResult {
    no_arguments(invocation, CommandResult::ShowStatus)
}

pub(super) fn handle_quit(_invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Quit
}
