use thiserror::Error;

/// Errors that can occur within the cron subsystem.
#[derive(Debug, Error)]
pub enum CronError {
    /// The plugin-data store failed.
    #[error("Store error: {0}")]
    Store(#[from] herald_store::StoreError),

    /// The per-account schedule mapping could not be encoded.
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CronError>;
