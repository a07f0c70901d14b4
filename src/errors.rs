use thiserror::Error;

/// Errors that can occur while scanning or resolving mentions.
#[derive(Error, Debug)]
pub enum MentionError {
    #[error("resolution error: {message} (username: {username})")]
    Resolution { username: String, message: String },

    #[error("transport error: {message} (username: {username})")]
    Transport { username: String, message: String },

    #[error("dispatch error: {message}")]
    Dispatch { message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MentionError {
    /// Returns `true` for failures that prevented lookups from being
    /// dispatched at all, as opposed to a single candidate failing.
    pub fn is_dispatch(&self) -> bool {
        matches!(self, MentionError::Dispatch { .. })
    }
}

/// Convenience alias for results using `MentionError`.
pub type Result<T> = std::result::Result<T, MentionError>;
