//! `herald-core` — shared configuration, account types and the posting seam.
//!
//! Everything the other herald crates have in common lives here: the
//! [`HeraldConfig`] loaded from `herald.toml` + `HERALD_*` env overrides,
//! the [`AccountContext`] an evaluation pass runs on behalf of, and the
//! [`Poster`] trait implemented by whatever channel actually delivers a
//! fired command (the core never talks to a network itself).

pub mod config;
pub mod error;
pub mod post;
pub mod types;

pub use config::{CronConfig, HeraldConfig, StorageConfig};
pub use error::{CoreError, Result};
pub use post::{PostError, Poster};
pub use types::AccountContext;
