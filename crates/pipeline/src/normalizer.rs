//! Event normalizer.
//!
//! Turns raw clickstream rows into [`NormalizedEvent`]s. Rows whose timestamp
//! cannot be turned into a calendar date are dropped and counted; nothing
//! else is validated.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use metrics_core::{NormalizedEvent, RawEvent};
use telemetry::metrics;
use tracing::info;

/// The normalized working set, shared read-only by every aggregation.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<NormalizedEvent>,
    dropped: u64,
}

impl EventLog {
    pub fn events(&self) -> &[NormalizedEvent] {
        &self.events
    }

    /// Rows discarded because no date could be derived.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl FromIterator<NormalizedEvent> for EventLog {
    fn from_iter<I: IntoIterator<Item = NormalizedEvent>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
            dropped: 0,
        }
    }
}

/// Normalizes raw rows against a fixed calendar time zone.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    tz: Tz,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl Normalizer {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Normalizes one row, or `None` if its date is unobtainable.
    pub fn normalize_event(&self, raw: RawEvent) -> Option<NormalizedEvent> {
        let millis = raw.timestamp.as_deref().and_then(parse_epoch_millis)?;
        let event_date = event_date(millis, self.tz)?;

        Some(NormalizedEvent {
            event_date,
            user_id: raw.visitorid,
            item_id: raw.itemid,
            event_name: raw.event.map(|e| e.to_lowercase()),
            transaction_id: raw.transactionid,
        })
    }

    /// Normalizes every row. Duplicates are kept.
    pub fn normalize(&self, raw: Vec<RawEvent>) -> EventLog {
        let total = raw.len();
        let events: Vec<NormalizedEvent> = raw
            .into_iter()
            .filter_map(|row| self.normalize_event(row))
            .collect();
        let dropped = (total - events.len()) as u64;

        let m = metrics();
        m.events_normalized.inc_by(events.len() as u64);
        m.rows_dropped_invalid_date.inc_by(dropped);

        info!(
            kept = events.len(),
            dropped,
            timezone = %self.tz,
            "Normalized events"
        );

        EventLog { events, dropped }
    }
}

/// Parses a string-encoded epoch-millisecond value.
///
/// Leading/trailing whitespace and a sign are accepted, and a fractional part
/// is truncated toward zero. Exponents, hex, and empty strings are rejected.
pub fn parse_epoch_millis(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(millis) = value.parse::<i64>() {
        return Some(millis);
    }

    let (int_part, frac_part) = value.split_once('.')?;
    if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match int_part {
        "" | "+" | "-" if !frac_part.is_empty() => Some(0),
        _ => int_part.parse::<i64>().ok(),
    }
}

/// Calendar date of an epoch-millisecond instant in `tz`.
pub fn event_date(millis: i64, tz: Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(millis).map(|utc| utc.with_timezone(&tz).date_naive())
}
