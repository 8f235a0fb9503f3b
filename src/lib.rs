//! taskchat is a terminal client for a conversational task-manager backend.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the session store, the chat and task-listing clients, the
//!   error classifier, configuration, and the command orchestrator.
//! - [`api`] defines the JSON payloads exchanged with the backend.
//! - [`commands`] parses slash commands typed into the interactive prompt.
//! - [`ui`] renders transcripts, task tables, and the connectivity indicator,
//!   and runs the interactive prompt loop.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which resolves configuration and dispatches
//! into [`core::app`] for every user action.

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod logging;
pub mod ui;
pub mod utils;
