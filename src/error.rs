use crate::chat::UserId;
use std::time::Duration;
use thiserror::Error;

/// Failure while fetching or scraping an upstream page
#[derive(Debug, Error)]
pub enum FetchError {
    /// Upstream answered with a non-success status
    #[error("{status} {reason}, Something went wrong while searching :(")]
    Status { status: u16, reason: String },

    /// The request never produced a response
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body did not have the expected shape
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The offloaded parse task panicked or was cancelled
    #[error("worker task failed: {0}")]
    Worker(String),
}

impl FetchError {
    /// Builds a `Status` error from a non-success response status
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        FetchError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }
}

/// Failure reported by a chat surface while sending or editing
#[derive(Debug, Error)]
pub enum ChatError {
    /// The platform refused the message body as too long
    #[error("content must be {limit} or fewer in length")]
    ContentTooLong { length: usize, limit: usize },

    /// The message being edited no longer exists
    #[error("unknown message {0}")]
    UnknownMessage(u64),

    /// Any other transport failure
    #[error("chat transport error: {0}")]
    Transport(String),
}

/// Failure while uploading to the paste service
#[derive(Debug, Error)]
pub enum PasteError {
    #[error("paste request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("paste service answered {0}")]
    Status(u16),

    #[error("paste service returned no paste id")]
    MissingId,
}

/// Errors surfaced by command handlers and interactive views
#[derive(Debug, Error)]
pub enum BotError {
    #[error("This interaction can only be used by {}", .owner.mention())]
    PermissionDenied { owner: UserId, actor: UserId },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("content of length {length} exceeds {limit} and the paste fallback failed: {source}")]
    RenderOverflow {
        length: usize,
        limit: usize,
        #[source]
        source: PasteError,
    },

    #[error("Command \"{0}\" is not found")]
    UnknownCommand(String),

    #[error("{0} is a required argument that is missing.")]
    MissingArgument(&'static str),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("You are on cooldown. Try again in {:.2}s", .retry_after.as_secs_f64())]
    OnCooldown { retry_after: Duration },

    #[error("`{0}` is an invalid linear equation, please try again.")]
    InvalidEquation(String),

    #[error("unknown selection value {0:?}")]
    UnknownSelection(String),

    #[error("a paginated session needs at least one page")]
    EmptySession,

    #[error(transparent)]
    Chat(#[from] ChatError),
}
