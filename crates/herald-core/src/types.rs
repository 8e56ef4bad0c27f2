use serde::{Deserialize, Serialize};

/// The account an evaluation pass or an outbound post runs on behalf of.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountContext {
    /// Stable platform identifier for the account.
    pub account_id: String,

    /// Human-readable handle (e.g. screen name), if known.
    pub handle: Option<String>,
}

impl AccountContext {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            handle: None,
        }
    }

    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = Some(handle.into());
        self
    }
}
