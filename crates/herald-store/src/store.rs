use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::Result;

/// Keyed blob storage shared by all herald plugins.
///
/// Implementations must be `Send + Sync`; the cron registry holds its store
/// behind an `Arc` and may be driven from multiple Tokio tasks. The blob
/// is opaque to the store; callers own its format.
pub trait PluginStore: Send + Sync {
    /// Fetch the blob stored for `(namespace, account_id)`.
    ///
    /// Absence is `Ok(None)`, never an error.
    fn get(&self, namespace: &str, account_id: &str) -> Result<Option<String>>;

    /// Store `blob` under `(namespace, account_id)`, replacing any previous
    /// value.
    fn set(&self, namespace: &str, account_id: &str, blob: &str) -> Result<()>;
}

/// In-memory store, used in tests and by embedders that want no database.
#[derive(Default)]
pub struct MemStore {
    data: Mutex<HashMap<(String, String), String>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PluginStore for MemStore {
    fn get(&self, namespace: &str, account_id: &str) -> Result<Option<String>> {
        let data = self.data.lock().unwrap();
        Ok(data
            .get(&(namespace.to_string(), account_id.to_string()))
            .cloned())
    }

    fn set(&self, namespace: &str, account_id: &str, blob: &str) -> Result<()> {
        let mut data = self.data.lock().unwrap();
        data.insert(
            (namespace.to_string(), account_id.to_string()),
            blob.to_string(),
        );
        Ok(())
    }
}
