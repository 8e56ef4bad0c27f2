//! `herald-store` — per-account plugin-data persistence.
//!
//! Plugins (the cron registry being the main one) persist one opaque blob per
//! `(namespace, account)` pair through the [`PluginStore`] trait. The blob's
//! shape is the plugin's business; the store only guarantees that whatever
//! was `set` comes back from `get`, and that an account with no data reads
//! as absent rather than as an error.
//!
//! Two implementations ship: [`SqliteStore`] for durable storage and
//! [`MemStore`] for tests and embedders that want no database at all.

pub mod error;
pub mod sqlite;
pub mod store;

pub use error::{Result, StoreError};
pub use sqlite::SqliteStore;
pub use store::{MemStore, PluginStore};
