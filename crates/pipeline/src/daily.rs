//! Daily overview aggregation.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use metrics_core::{ratio, DailyOverviewRow, EventKind};

use crate::normalizer::EventLog;
use crate::tally::FunnelTally;

#[derive(Default)]
struct DayTally<'a> {
    active: HashSet<&'a str>,
    funnel: FunnelTally<'a>,
}

/// One row per date present in the log, ordered by date ascending.
pub fn daily_overview(log: &EventLog) -> Vec<DailyOverviewRow> {
    let mut days: BTreeMap<NaiveDate, DayTally<'_>> = BTreeMap::new();

    for event in log.events() {
        let tally = days.entry(event.event_date).or_default();
        if let Some(user) = event.user() {
            tally.active.insert(user);
        }
        tally.funnel.record(event);
    }

    days.into_iter()
        .map(|(dt, tally)| {
            let f = &tally.funnel;
            let view_uv = f.unique_users(EventKind::View);
            let atc_uv = f.unique_users(EventKind::AddToCart);
            let buy_uv = f.unique_users(EventKind::Transaction);

            DailyOverviewRow {
                dt,
                dau: tally.active.len() as u64,
                view_uv,
                atc_uv,
                buy_uv,
                view_cnt: f.event_count(EventKind::View),
                atc_cnt: f.event_count(EventKind::AddToCart),
                buy_cnt: f.event_count(EventKind::Transaction),
                act_rate_uv: ratio(atc_uv, view_uv),
                purchase_rate_uv: ratio(buy_uv, view_uv),
                atc_to_buy_rate_uv: ratio(buy_uv, atc_uv),
            }
        })
        .collect()
}
