//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod say;
pub mod settings;
pub mod task_list;

use std::error::Error;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::cli::say::run_say;
use crate::cli::settings::{apply_set, apply_unset};
use crate::cli::task_list::run_task_list;
use crate::core::app::App;
use crate::core::config::{Config, ResolvedBaseUrl};
use crate::logging::init_tracing;
use crate::ui::chat_loop::run_chat;
use crate::utils::url::is_http_url;

#[derive(Parser)]
#[command(name = "taskchat")]
#[command(about = "Chat with a task-manager assistant from the terminal")]
#[command(
    long_about = "taskchat talks to a task-manager backend in plain language. Ask it to add, \
move, or complete tasks, and view the full task list as a table.\n\n\
Environment Variables:\n\
  TASKCHAT_BASE_URL    Backend address (defaults to http://localhost:8000)\n\
  TASKCHAT_CONFIG_DIR  Directory holding config.toml\n\
  RUST_LOG             Diagnostic log filter (defaults to warn)\n\n\
Commands:\n\
  /help             List chat commands\n\
  /tasks            Reload and show all tasks\n\
  /reset            Start a new conversation\n\
  /status           Show whether the backend is reachable\n\
  /quit             Leave the chat"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend address, overriding the environment and config file
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive chat (default)
    Chat,
    /// Send one message and print the assistant's reply
    Say {
        /// Message to send (multiple words are joined with spaces)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Print all scheduled tasks
    Tasks,
    /// Set configuration values, or print them when no key is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Option<Vec<String>>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Set { key, value } => {
            let Some(key) = key else {
                Config::load()?.print_all();
                return Ok(());
            };
            match apply_set(&key, &value.unwrap_or_default()) {
                Ok(message) => println!("{message}"),
                Err(err) => {
                    err.print();
                    std::process::exit(err.exit_code());
                }
            }
            Ok(())
        }
        Commands::Unset { key } => {
            match apply_unset(&key) {
                Ok(message) => println!("{message}"),
                Err(err) => {
                    err.print();
                    std::process::exit(err.exit_code());
                }
            }
            Ok(())
        }
        Commands::Chat => {
            let config = Config::load()?;
            let app = build_app(&config, args.base_url.as_deref())?;
            run_chat(app, config.auto_load_tasks()).await
        }
        Commands::Say { prompt } => {
            let config = Config::load()?;
            let app = build_app(&config, args.base_url.as_deref())?;
            run_say(app, prompt).await
        }
        Commands::Tasks => {
            let config = Config::load()?;
            let app = build_app(&config, args.base_url.as_deref())?;
            run_task_list(app).await
        }
    }
}

fn build_app(config: &Config, flag: Option<&str>) -> Result<App, Box<dyn Error>> {
    let ResolvedBaseUrl { url, source } = config.resolve_base_url(flag);
    if !is_http_url(&url) {
        eprintln!("❌ Invalid base URL from {}: {url}", source.describe());
        eprintln!("   The URL must start with http:// or https://");
        std::process::exit(1);
    }
    debug!(base_url = %url, source = source.describe(), "resolved backend address");
    Ok(App::new(&url)?)
}
