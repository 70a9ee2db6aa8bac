/// Core error type for banofbot.
///
/// Adapter crates should map their specific errors into this type so the
/// dispatch core can report every failure the same way (outcome + log line).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("chat store error: {0}")]
    Store(String),

    #[error("permission check failed: {0}")]
    Permission(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
