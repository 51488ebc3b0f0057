//! Funnel reshape of the daily overview.

use metrics_core::{DailyOverviewRow, EventKind, FunnelRow};

/// Unpivots each day's `*_uv` columns into one row per step, ordered by
/// `(dt, step name)`.
pub fn funnel(daily: &[DailyOverviewRow]) -> Vec<FunnelRow> {
    let mut rows: Vec<FunnelRow> = EventKind::FUNNEL
        .iter()
        .flat_map(|&step| {
            daily.iter().map(move |day| FunnelRow {
                dt: day.dt,
                step,
                uv: day.uv(step),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        a.dt.cmp(&b.dt)
            .then_with(|| a.step.as_str().cmp(b.step.as_str()))
    });
    rows
}
