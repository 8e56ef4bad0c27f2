use thiserror::Error;

/// Errors from the shared herald layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration file or environment could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
