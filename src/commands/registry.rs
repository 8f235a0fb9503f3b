use super::CommandResult;

pub type CommandHandler = fn(CommandInvocation<'_>) -> CommandResult;

pub struct SlashCommand {
    pub name: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub input: &'a str,
    pub args: &'a str,
}

pub fn all_commands() -> &'static [SlashCommand] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static SlashCommand> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[SlashCommand] = &[
    SlashCommand {
        name: "help",
        help: "Show available commands.",
        handler: super::handle_help,
    },
    SlashCommand {
        name: "tasks",
        help: "Reload and show all scheduled tasks.",
        handler: super::handle_tasks,
    },
    SlashCommand {
        name: "reset",
        help: "Forget the conversation and start a new backend session.",
        handler: super::handle_reset,
    },
    SlashCommand {
        name: "status",
        help: "Show whether the backend is reachable.",
        handler: super::handle_status,
    },
    SlashCommand {
        name: "quit",
        help: "Leave the chat.",
        handler: super::handle_quit,
    },
];
