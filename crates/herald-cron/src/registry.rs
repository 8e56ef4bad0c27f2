use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use herald_store::PluginStore;

use crate::error::Result;
use crate::schedule::{Persist, ScheduleSpec};

/// One schedule as persisted: the schedule in its stored string form plus
/// the command text forwarded verbatim when it fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub schedule: String,
    pub command: String,
}

/// Decoded view of a stored entry.
#[derive(Debug, Clone)]
pub struct ScheduleEntry {
    pub id: u64,
    pub spec: ScheduleSpec,
    pub command: String,
}

/// Per-account schedule registry.
///
/// The whole per-account state is one blob in the plugin store: a JSON
/// mapping from decimal id string to [`StoredEntry`]. The registry is the
/// only writer of that blob; ids are assigned max+1 and gaps left by
/// removal are never reused.
pub struct ScheduleRegistry {
    store: Arc<dyn PluginStore>,
    namespace: String,
}

impl ScheduleRegistry {
    /// `namespace` identifies this plugin's data in the shared store,
    /// normally `CronConfig::namespace`.
    pub fn new(store: Arc<dyn PluginStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    /// All stored entries for `account_id`, keyed by id string.
    ///
    /// An account with no stored data reads as an empty map, as does a blob
    /// that no longer decodes (logged, same degrade policy as a malformed
    /// schedule).
    pub fn list_all(&self, account_id: &str) -> Result<BTreeMap<String, StoredEntry>> {
        let Some(blob) = self.store.get(&self.namespace, account_id)? else {
            return Ok(BTreeMap::new());
        };
        match serde_json::from_str(&blob) {
            Ok(all) => Ok(all),
            Err(e) => {
                warn!(account = %account_id, error = %e, "malformed schedule blob, treating as empty");
                Ok(BTreeMap::new())
            }
        }
    }

    /// Store a new schedule for `account_id` and return its id.
    ///
    /// Ids grow strictly: max of the existing numeric ids plus one, starting
    /// at 1. Read-modify-write with no cross-process lock; the harness
    /// serialises mutations per account.
    pub fn add(&self, account_id: &str, spec: &ScheduleSpec, command: &str) -> Result<u64> {
        let mut all = self.list_all(account_id)?;
        let next_id = all
            .keys()
            .filter_map(|k| k.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;

        if !spec.is_complete() {
            warn!(account = %account_id, schedule = %spec, "storing incomplete schedule, it will never fire");
        }

        all.insert(
            next_id.to_string(),
            StoredEntry {
                schedule: spec.to_stored()?,
                command: command.to_string(),
            },
        );
        self.persist(account_id, &all)?;
        info!(account = %account_id, id = next_id, schedule = %spec, "schedule added");
        Ok(next_id)
    }

    /// Delete the entry with `id`, reporting whether anything was removed.
    pub fn remove(&self, account_id: &str, id: u64) -> Result<bool> {
        let mut all = self.list_all(account_id)?;
        let before = all.len();
        all.remove(&id.to_string());
        self.persist(account_id, &all)?;

        let removed = all.len() != before;
        if removed {
            info!(account = %account_id, id, "schedule removed");
        }
        Ok(removed)
    }

    /// Decoded entries for `account_id`, ids ascending. Entries under a
    /// non-numeric key are skipped.
    pub fn entries(&self, account_id: &str) -> Result<Vec<ScheduleEntry>> {
        let mut entries: Vec<ScheduleEntry> = self
            .list_all(account_id)?
            .iter()
            .filter_map(|(key, entry)| {
                let id = key.parse().ok()?;
                Some(ScheduleEntry {
                    id,
                    spec: ScheduleSpec::from_stored(&entry.schedule),
                    command: entry.command.clone(),
                })
            })
            .collect();
        entries.sort_by_key(|e| e.id);
        Ok(entries)
    }

    fn persist(&self, account_id: &str, all: &BTreeMap<String, StoredEntry>) -> Result<()> {
        let blob = serde_json::to_string(all)?;
        self.store.set(&self.namespace, account_id, &blob)?;
        Ok(())
    }
}
