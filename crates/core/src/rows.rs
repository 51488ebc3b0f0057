//! Output table rows.
//!
//! Field names double as CSV headers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::events::EventKind;

/// `numerator / denominator`, or `None` when the denominator is zero.
pub fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    if denominator > 0 {
        Some(numerator as f64 / denominator as f64)
    } else {
        None
    }
}

/// One row of `metrics_daily_overview`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyOverviewRow {
    pub dt: NaiveDate,
    pub dau: u64,
    pub view_uv: u64,
    pub atc_uv: u64,
    pub buy_uv: u64,
    pub view_cnt: u64,
    pub atc_cnt: u64,
    pub buy_cnt: u64,
    pub act_rate_uv: Option<f64>,
    pub purchase_rate_uv: Option<f64>,
    pub atc_to_buy_rate_uv: Option<f64>,
}

impl DailyOverviewRow {
    /// Unique users for a funnel step.
    pub fn uv(&self, kind: EventKind) -> u64 {
        match kind {
            EventKind::View => self.view_uv,
            EventKind::AddToCart => self.atc_uv,
            EventKind::Transaction => self.buy_uv,
        }
    }
}

/// One row of `metrics_daily_funnel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelRow {
    pub dt: NaiveDate,
    pub step: EventKind,
    pub uv: u64,
}

/// One row of `metrics_top_items_daily`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopItemRow {
    pub dt: NaiveDate,
    pub item_id: Option<String>,
    pub view_uv: u64,
    pub atc_uv: u64,
    pub buy_uv: u64,
    pub buy_cnt: u64,
}

/// One row of `metrics_cohort_retention`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortRow {
    pub cohort_dt: NaiveDate,
    pub cohort_size: u64,
    pub d1: u64,
    pub d7_rolling: u64,
    pub d1_retention: Option<f64>,
    pub d7_rolling_retention: Option<f64>,
}

/// The four result tables of one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrowthReport {
    pub daily: Vec<DailyOverviewRow>,
    pub funnel: Vec<FunnelRow>,
    pub top_items: Vec<TopItemRow>,
    pub retention: Vec<CohortRow>,
}
