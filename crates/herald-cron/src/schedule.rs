use std::fmt;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Types that persist themselves as a single stored string.
///
/// Encoding can fail (and propagates); decoding never fails outward.
/// Malformed input degrades to a value the caller treats as inert.
pub trait Persist: Sized {
    fn to_stored(&self) -> crate::error::Result<String>;
    fn from_stored(text: &str) -> Self;
}

/// One schedule: minute, hour, day of month, month, day of week.
///
/// Fields hold the raw tokens they were written with: a wildcard (`*`, or
/// its full-width variant) or the decimal string of a component value. They
/// are not parsed until matching, so an odd token is stored verbatim and
/// simply never fires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<String>,
}

impl ScheduleSpec {
    /// Build a spec from an authoring command.
    ///
    /// The first three whitespace-separated tokens are the command verb,
    /// sub-verb and a placeholder; the next five are taken positionally as
    /// min/hour/day/mon/week. Missing trailing tokens leave fields unset.
    pub fn from_command_text(text: &str) -> Self {
        let mut tokens = text.split_whitespace().skip(3).map(str::to_string);
        Self {
            min: tokens.next(),
            hour: tokens.next(),
            day: tokens.next(),
            mon: tokens.next(),
            week: tokens.next(),
        }
    }

    /// All five fields present and non-empty.
    ///
    /// Advisory only. An incomplete spec is stored and evaluated like any
    /// other, it just never matches.
    pub fn is_complete(&self) -> bool {
        [&self.min, &self.hour, &self.day, &self.mon, &self.week]
            .iter()
            .all(|f| f.as_deref().is_some_and(|v| !v.is_empty()))
    }

    /// True when some field can never equal its timestamp component
    /// (missing, or neither a wildcard nor a number). A dormant spec matches
    /// no timestamp, ever.
    pub fn is_dormant(&self) -> bool {
        [&self.min, &self.hour, &self.day, &self.mon, &self.week]
            .iter()
            .any(|f| match f.as_deref() {
                Some(tok) => !is_wildcard(tok) && tok.parse::<u32>().is_err(),
                None => true,
            })
    }

    /// Does this schedule fire at `now`?
    ///
    /// Conjunction of all five field checks. Day-of-month and weekday must
    /// both match, deliberately unlike classic cron's either-or on the two
    /// day fields. `now` is plain wall-clock time; any timezone conversion
    /// happened on the caller's side.
    pub fn is_match(&self, now: NaiveDateTime) -> bool {
        field_matches(self.min.as_deref(), now.minute())
            && field_matches(self.hour.as_deref(), now.hour())
            && field_matches(self.day.as_deref(), now.day())
            && field_matches(self.mon.as_deref(), now.month())
            && field_matches(self.week.as_deref(), now.weekday().num_days_from_sunday())
    }
}

impl Persist for ScheduleSpec {
    /// Canonical stored form: a JSON record with the five keys in
    /// min/hour/day/mon/week order, unset fields omitted.
    fn to_stored(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode the stored form. Malformed text is logged and yields an
    /// all-unset spec, which then matches nothing.
    fn from_stored(text: &str) -> Self {
        match serde_json::from_str(text) {
            Ok(spec) => spec,
            Err(e) => {
                warn!(error = %e, "malformed stored schedule, treating as inert");
                Self::default()
            }
        }
    }
}

impl fmt::Display for ScheduleSpec {
    /// Unix-cron style line (`min hour day mon week`, unset fields as `?`).
    /// Diagnostic output only; matching and persistence never read it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.min.as_deref().unwrap_or("?"),
            self.hour.as_deref().unwrap_or("?"),
            self.day.as_deref().unwrap_or("?"),
            self.mon.as_deref().unwrap_or("?"),
            self.week.as_deref().unwrap_or("?"),
        )
    }
}

/// A single field check: wildcard passes, a number must equal `component`,
/// anything else (missing field included) fails.
///
/// `component` is already 1-based for months: chrono's `month()`, unlike
/// some datetime APIs, needs no +1 adjustment.
fn field_matches(field: Option<&str>, component: u32) -> bool {
    match field {
        Some(tok) if is_wildcard(tok) => true,
        Some(tok) => tok.parse::<u32>().is_ok_and(|n| n == component),
        None => false,
    }
}

/// `*`, plus the full-width variant typed by IME users.
fn is_wildcard(tok: &str) -> bool {
    tok == "*" || tok == "＊"
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn spec(min: &str, hour: &str, day: &str, mon: &str, week: &str) -> ScheduleSpec {
        ScheduleSpec {
            min: Some(min.to_string()),
            hour: Some(hour.to_string()),
            day: Some(day.to_string()),
            mon: Some(mon.to_string()),
            week: Some(week.to_string()),
        }
    }

    #[test]
    fn all_wildcards_match_any_time() {
        let s = spec("*", "*", "*", "*", "*");
        assert!(s.is_match(at(2026, 8, 8, 12, 30)));
        assert!(s.is_match(at(2027, 1, 1, 0, 0)));
    }

    #[test]
    fn hour_only_matches_whole_hour_window() {
        let s = spec("*", "9", "*", "*", "*");
        assert!(s.is_match(at(2026, 8, 8, 9, 0)));
        assert!(s.is_match(at(2026, 8, 8, 9, 59)));
        assert!(!s.is_match(at(2026, 8, 8, 8, 59)));
        assert!(!s.is_match(at(2026, 8, 8, 10, 0)));
    }

    #[test]
    fn new_year_midnight_exact() {
        let s = spec("0", "0", "1", "1", "*");
        assert!(s.is_match(at(2026, 1, 1, 0, 0)));
        assert!(s.is_match(at(2027, 1, 1, 0, 0)));
        assert!(!s.is_match(at(2026, 1, 1, 0, 1)));
        assert!(!s.is_match(at(2026, 1, 2, 0, 0)));
        assert!(!s.is_match(at(2026, 2, 1, 0, 0)));
    }

    #[test]
    fn month_field_is_one_based() {
        let s = spec("*", "*", "*", "1", "*");
        assert!(s.is_match(at(2026, 1, 15, 3, 4)));
        assert!(!s.is_match(at(2026, 2, 15, 3, 4)));
    }

    #[test]
    fn weekday_zero_is_sunday() {
        // 2026-08-09 is a Sunday, 2026-08-10 a Monday.
        let sunday = spec("*", "*", "*", "*", "0");
        assert!(sunday.is_match(at(2026, 8, 9, 10, 0)));
        assert!(!sunday.is_match(at(2026, 8, 10, 10, 0)));

        let monday = spec("*", "*", "*", "*", "1");
        assert!(monday.is_match(at(2026, 8, 10, 10, 0)));
    }

    #[test]
    fn day_and_weekday_are_both_required() {
        // 2026-08-09 is a Sunday; the 10th is a Monday. Classic cron would
        // fire on either field; this format needs both.
        let s = spec("*", "*", "9", "*", "0");
        assert!(s.is_match(at(2026, 8, 9, 10, 0)));
        assert!(!s.is_match(at(2026, 8, 10, 10, 0)));
        // Sunday the 16th fails the day-of-month check.
        assert!(!s.is_match(at(2026, 8, 16, 10, 0)));
    }

    #[test]
    fn fullwidth_wildcard_accepted() {
        let s = spec("＊", "＊", "＊", "＊", "＊");
        assert!(s.is_match(at(2026, 8, 8, 12, 30)));
    }

    #[test]
    fn leading_zero_tokens_match() {
        let s = spec("05", "09", "*", "*", "*");
        assert!(s.is_match(at(2026, 8, 8, 9, 5)));
    }

    #[test]
    fn non_numeric_field_never_matches() {
        let s = spec("*", "*", "*", "*", "soon");
        assert!(s.is_dormant());
        assert!(!s.is_match(at(2026, 8, 8, 12, 30)));
    }

    #[test]
    fn missing_field_never_matches() {
        let s = ScheduleSpec {
            week: None,
            ..spec("*", "*", "*", "*", "*")
        };
        assert!(!s.is_complete());
        assert!(s.is_dormant());
        assert!(!s.is_match(at(2026, 8, 8, 12, 30)));
    }

    #[test]
    fn command_text_skips_three_leading_tokens() {
        let s = ScheduleSpec::from_command_text("@herald cron add 0 9 * * 1 good morning");
        assert_eq!(s.min.as_deref(), Some("0"));
        assert_eq!(s.hour.as_deref(), Some("9"));
        assert_eq!(s.day.as_deref(), Some("*"));
        assert_eq!(s.mon.as_deref(), Some("*"));
        assert_eq!(s.week.as_deref(), Some("1"));
        assert!(s.is_complete());
    }

    #[test]
    fn short_command_text_leaves_fields_unset() {
        let s = ScheduleSpec::from_command_text("@herald cron add 0 9");
        assert_eq!(s.min.as_deref(), Some("0"));
        assert_eq!(s.hour.as_deref(), Some("9"));
        assert!(s.day.is_none());
        assert!(!s.is_complete());
        assert!(s.is_dormant());
    }

    #[test]
    fn stored_form_round_trips() {
        let s = spec("0", "9", "*", "*", "1");
        let text = s.to_stored().unwrap();
        assert_eq!(ScheduleSpec::from_stored(&text), s);
    }

    #[test]
    fn stored_form_is_the_five_key_record() {
        let s = spec("0", "9", "*", "12", "1");
        assert_eq!(
            s.to_stored().unwrap(),
            r#"{"min":"0","hour":"9","day":"*","mon":"12","week":"1"}"#
        );
    }

    #[test]
    fn stored_form_omits_unset_fields() {
        let s = ScheduleSpec {
            min: Some("0".to_string()),
            ..Default::default()
        };
        assert_eq!(s.to_stored().unwrap(), r#"{"min":"0"}"#);
    }

    #[test]
    fn partial_record_decodes_with_missing_field_unset() {
        let s = ScheduleSpec::from_stored(r#"{"min":"*","hour":"*","day":"*","mon":"*"}"#);
        assert!(s.week.is_none());
        assert!(s.is_dormant());
        assert!(!s.is_match(at(2026, 8, 8, 12, 30)));
    }

    #[test]
    fn malformed_stored_text_degrades_to_inert() {
        let s = ScheduleSpec::from_stored("not json at all");
        assert_eq!(s, ScheduleSpec::default());
        assert!(!s.is_match(at(2026, 8, 8, 12, 30)));
    }

    #[test]
    fn display_renders_cron_line() {
        let s = spec("0", "9", "*", "*", "1");
        assert_eq!(s.to_string(), "0 9 * * 1");

        let partial = ScheduleSpec {
            min: Some("0".to_string()),
            ..Default::default()
        };
        assert_eq!(partial.to_string(), "0 ? ? ? ?");
    }
}
