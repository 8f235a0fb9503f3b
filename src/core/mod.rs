pub mod app;
pub mod chat;
pub mod config;
pub mod constants;
pub mod errors;
pub mod message;
pub mod session;
pub mod tasks;
