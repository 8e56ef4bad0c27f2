use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, error, info};

use herald_core::{AccountContext, Poster};

use crate::registry::{ScheduleRegistry, StoredEntry};
use crate::schedule::{Persist, ScheduleSpec};

/// Outcome counters for one evaluation pass.
///
/// `dormant` counts entries whose schedule is incomplete or unparseable and
/// therefore can never fire, as opposed to entries that simply did not
/// match this minute. Nothing here is an error; a pass always completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Entries loaded for the account.
    pub evaluated: usize,
    /// Entries whose schedule matched `now` and were handed to the poster.
    pub matched: usize,
    /// Entries that can never match any timestamp.
    pub dormant: usize,
}

/// Evaluates one account's schedules against a single timestamp.
///
/// Stateless between passes: the harness constructs a runner (or reuses one)
/// and calls [`run`](CronRunner::run) once per minute with the current
/// wall-clock time. Matching commands are dispatched fire-and-forget; the
/// pass never waits for deliveries and never reports their failures upward.
pub struct CronRunner {
    account: AccountContext,
    registry: ScheduleRegistry,
    poster: Arc<dyn Poster>,
}

impl CronRunner {
    pub fn new(account: AccountContext, registry: ScheduleRegistry, poster: Arc<dyn Poster>) -> Self {
        Self {
            account,
            registry,
            poster,
        }
    }

    /// Gating predicate for the harness: should a pass run for `account`
    /// at `now`? Always true: the cadence is already once per minute and
    /// every minute is evaluated.
    pub fn is_due(_account: &AccountContext, _now: NaiveDateTime) -> bool {
        true
    }

    /// One evaluation pass.
    ///
    /// Loads every entry for the account, filters by [`ScheduleSpec::is_match`]
    /// and spawns one dispatch task per match. Returning is the completion
    /// signal: dispatch outcomes (success, failure, still in flight) never
    /// block or alter it. A store failure logs and yields an empty pass.
    pub async fn run(&self, now: NaiveDateTime) -> PassSummary {
        let all = match self.registry.list_all(&self.account.account_id) {
            Ok(all) => all,
            Err(e) => {
                error!(account = %self.account.account_id, error = %e, "schedule load failed, skipping pass");
                return PassSummary::default();
            }
        };

        let mut summary = PassSummary {
            evaluated: all.len(),
            ..Default::default()
        };

        for (id, entry) in &all {
            let spec = ScheduleSpec::from_stored(&entry.schedule);
            if spec.is_dormant() {
                summary.dormant += 1;
                continue;
            }
            if !spec.is_match(now) {
                continue;
            }
            summary.matched += 1;
            self.dispatch(id, spec, entry);
        }

        if summary.matched > 0 || summary.dormant > 0 {
            info!(
                account = %self.account.account_id,
                evaluated = summary.evaluated,
                matched = summary.matched,
                dormant = summary.dormant,
                "evaluation pass complete"
            );
        }
        summary
    }

    /// Hand one matching entry to the poster on a spawned task.
    ///
    /// One attempt, no retry. Success logs the schedule's cron line;
    /// failure logs the error together with the raw stored entry so the
    /// offending schedule can be found and removed.
    fn dispatch(&self, id: &str, spec: ScheduleSpec, entry: &StoredEntry) {
        let account = self.account.clone();
        let poster = Arc::clone(&self.poster);
        let entry = entry.clone();
        let id = id.to_string();

        tokio::spawn(async move {
            match poster.post(&account, &entry.command).await {
                Ok(()) => {
                    debug!(
                        account = %account.account_id,
                        entry = %id,
                        schedule = %spec,
                        "cron executed"
                    );
                }
                Err(e) => {
                    error!(
                        account = %account.account_id,
                        entry = %id,
                        error = %e,
                        raw = ?entry,
                        "cron dispatch failed"
                    );
                }
            }
        });
    }
}
