//! Cohort retention.
//!
//! A user's cohort is the first date they were active. Instead of joining
//! first-activity back onto every active day, each event is bucketed by its
//! day offset from the user's cohort date:
//! - offset 1 marks D+1
//! - offsets 1..=7 mark the rolling D+7 window
//!
//! Flags are per user, so several active days in the window count once.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use metrics_core::{ratio, CohortRow};

use crate::normalizer::EventLog;

/// Rolling retention window, in days after the cohort date.
pub const ROLLING_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy)]
struct UserRetention {
    cohort_dt: NaiveDate,
    d1: bool,
    d7: bool,
}

#[derive(Debug, Default)]
struct CohortTally {
    size: u64,
    d1: u64,
    d7_rolling: u64,
}

/// One row per cohort date, ordered ascending.
///
/// Events without a user never join to any activity. They still form a
/// first-activity group of their own, so their earliest date yields a
/// cohort row, with zero size unless real users share it.
pub fn cohort_retention(log: &EventLog) -> Vec<CohortRow> {
    let mut users: HashMap<&str, UserRetention> = HashMap::new();
    let mut anonymous_first: Option<NaiveDate> = None;

    for event in log.events() {
        let dt = event.event_date;
        match event.user() {
            Some(user) => {
                users
                    .entry(user)
                    .and_modify(|u| u.cohort_dt = u.cohort_dt.min(dt))
                    .or_insert(UserRetention {
                        cohort_dt: dt,
                        d1: false,
                        d7: false,
                    });
            }
            None => {
                anonymous_first = Some(anonymous_first.map_or(dt, |first| first.min(dt)));
            }
        }
    }

    for event in log.events() {
        let Some(retention) = event.user().and_then(|u| users.get_mut(u)) else {
            continue;
        };
        let offset = (event.event_date - retention.cohort_dt).num_days();
        if offset == 1 {
            retention.d1 = true;
        }
        if (1..=ROLLING_WINDOW_DAYS).contains(&offset) {
            retention.d7 = true;
        }
    }

    let mut cohorts: BTreeMap<NaiveDate, CohortTally> = BTreeMap::new();
    for retention in users.values() {
        let tally = cohorts.entry(retention.cohort_dt).or_default();
        tally.size += 1;
        tally.d1 += u64::from(retention.d1);
        tally.d7_rolling += u64::from(retention.d7);
    }
    if let Some(dt) = anonymous_first {
        cohorts.entry(dt).or_default();
    }

    cohorts
        .into_iter()
        .map(|(cohort_dt, tally)| CohortRow {
            cohort_dt,
            cohort_size: tally.size,
            d1: tally.d1,
            d7_rolling: tally.d7_rolling,
            d1_retention: ratio(tally.d1, tally.size),
            d7_rolling_retention: ratio(tally.d7_rolling, tally.size),
        })
        .collect()
}
