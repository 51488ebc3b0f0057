//! Conditional distinct-user and event counting per funnel step.

use std::collections::HashSet;

use metrics_core::{EventKind, NormalizedEvent};

/// Per-step unique users and raw event counts for one grouping key.
///
/// Users are borrowed from the event log, so a tally never outlives it.
#[derive(Debug, Default)]
pub struct FunnelTally<'a> {
    users: [HashSet<&'a str>; 3],
    events: [u64; 3],
}

fn slot(kind: EventKind) -> usize {
    match kind {
        EventKind::View => 0,
        EventKind::AddToCart => 1,
        EventKind::Transaction => 2,
    }
}

impl<'a> FunnelTally<'a> {
    /// Counts one event. Events outside the funnel and null users are
    /// ignored for unique counts; the raw count only needs a known step.
    pub fn record(&mut self, event: &'a NormalizedEvent) {
        let Some(kind) = event.kind() else {
            return;
        };
        let idx = slot(kind);
        self.events[idx] += 1;
        if let Some(user) = event.user() {
            self.users[idx].insert(user);
        }
    }

    /// Distinct users with at least one event of `kind`.
    pub fn unique_users(&self, kind: EventKind) -> u64 {
        self.users[slot(kind)].len() as u64
    }

    /// Events of `kind`, duplicates included.
    pub fn event_count(&self, kind: EventKind) -> u64 {
        self.events[slot(kind)]
    }
}
