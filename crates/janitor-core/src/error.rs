use thiserror::Error;

use crate::report::Pass;

/// Failure reported by a [`Board`](crate::board::Board) implementation.
#[derive(Debug, Clone, Error)]
pub enum BoardError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("failed to decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum JanitorError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to fetch {what}: {source}")]
    Fetch {
        what: String,
        #[source]
        source: BoardError,
    },

    #[error("{pass} of card '{card}' failed: {source}")]
    Mutation {
        pass: Pass,
        card: String,
        #[source]
        source: BoardError,
    },

    #[error("task join error: {0}")]
    Task(String),
}

impl JanitorError {
    pub fn fetch(what: impl Into<String>, source: BoardError) -> Self {
        JanitorError::Fetch {
            what: what.into(),
            source,
        }
    }

    /// `true` for errors raised before any board traffic.
    pub fn is_config(&self) -> bool {
        matches!(self, JanitorError::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, JanitorError>;
