//! Per-item daily funnel counts.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use metrics_core::{EventKind, TopItemRow};

use crate::normalizer::EventLog;
use crate::tally::FunnelTally;

/// One row per `(dt, item_id)` pair. A null item is its own group.
///
/// Consumers must not rely on row order; rows come out sorted by
/// `(dt, item_id)` with the null item first so reruns are byte-identical.
pub fn top_items_daily(log: &EventLog) -> Vec<TopItemRow> {
    let mut items: BTreeMap<(NaiveDate, Option<&str>), FunnelTally<'_>> = BTreeMap::new();

    for event in log.events() {
        items
            .entry((event.event_date, event.item()))
            .or_default()
            .record(event);
    }

    items
        .into_iter()
        .map(|((dt, item_id), tally)| TopItemRow {
            dt,
            item_id: item_id.map(str::to_string),
            view_uv: tally.unique_users(EventKind::View),
            atc_uv: tally.unique_users(EventKind::AddToCart),
            buy_uv: tally.unique_users(EventKind::Transaction),
            buy_cnt: tally.event_count(EventKind::Transaction),
        })
        .collect()
}
