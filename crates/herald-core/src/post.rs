use async_trait::async_trait;
use thiserror::Error;

use crate::types::AccountContext;

/// Errors a posting backend can report for a single delivery attempt.
#[derive(Debug, Error)]
pub enum PostError {
    /// The remote service refused the content (length limit, policy, …).
    #[error("Post rejected: {0}")]
    Rejected(String),

    /// The content never reached the remote service.
    #[error("Transport failed: {0}")]
    Transport(String),

    /// The backend rejected the supplied credentials or token.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),
}

/// Interface implemented by every posting backend (Twitter, Mastodon, a test
/// recorder, …).
///
/// Implementations must be `Send + Sync` so a runner can hold one behind an
/// `Arc` and dispatch from spawned tasks. One call is one delivery attempt;
/// herald never retries on its own.
#[async_trait]
pub trait Poster: Send + Sync {
    /// Deliver `text` as `account`.
    ///
    /// Intentionally `&self` so a connected backend can post concurrently
    /// without a mutable borrow.
    async fn post(&self, account: &AccountContext, text: &str) -> Result<(), PostError>;
}
