//! `herald-cron` — per-account scheduled posting.
//!
//! # Overview
//!
//! Accounts store cron-like schedules through the [`ScheduleRegistry`]; an
//! external harness calls [`CronRunner::run`] once per minute with the
//! current wall-clock time, and every stored schedule that matches fires its
//! command through the configured [`Poster`](herald_core::Poster). The
//! runner never self-schedules; cadence belongs to the caller.
//!
//! # Schedule format
//!
//! A schedule is five fields, each a literal number or a wildcard:
//!
//! | Field | Range | Notes                        |
//! |-------|-------|------------------------------|
//! | `min` | 0–59  |                              |
//! | `hour`| 0–23  |                              |
//! | `day` | 1–31  | day of month                 |
//! | `mon` | 1–12  |                              |
//! | `week`| 0–6   | day of week, 0 = Sunday      |
//!
//! All five checks must pass for a schedule to fire. `day` and `week` are
//! both required to match, unlike classic cron which takes either. Lists,
//! ranges and steps (`1-5`, `*/10`) are not supported.

pub mod error;
pub mod registry;
pub mod runner;
pub mod schedule;

pub use error::{CronError, Result};
pub use registry::{ScheduleEntry, ScheduleRegistry, StoredEntry};
pub use runner::{CronRunner, PassSummary};
pub use schedule::{Persist, ScheduleSpec};
