use thiserror::Error;

/// Errors surfaced by the chat core and its transport.
///
/// A rule miss is never an error: the resolver answers with its default reply instead.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat endpoint unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("chat endpoint returned HTTP {0}")]
    Status(u16),

    #[error("unknown language tag '{0}' (expected 'en' or 'cn')")]
    UnknownLanguage(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChatError>;
