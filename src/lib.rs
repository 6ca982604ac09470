pub mod bot;
pub mod chat;
pub mod commands;
pub mod config;
pub mod console;
pub mod context;
pub mod error;
pub mod features;
pub mod paste;
pub mod ui;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export commonly used types for convenience
pub use bot::Bot;
pub use context::{AppContext, CommandContext};
pub use error::BotError;
