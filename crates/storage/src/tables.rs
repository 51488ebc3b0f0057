//! Output table catalog.
//!
//! Each table is a directory under the output root:
//! - `part-00000.csv` holds the header and every row
//! - `_SUCCESS` marks a completed write

/// Data file inside each table directory.
pub const PART_FILE: &str = "part-00000.csv";

/// Completion marker inside each table directory.
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// The four result tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputTable {
    DailyOverview,
    DailyFunnel,
    TopItemsDaily,
    CohortRetention,
}

impl OutputTable {
    /// Write order.
    pub const ALL: [OutputTable; 4] = [
        Self::DailyOverview,
        Self::DailyFunnel,
        Self::TopItemsDaily,
        Self::CohortRetention,
    ];

    /// Logical destination name (directory under the output root).
    pub fn name(&self) -> &'static str {
        match self {
            Self::DailyOverview => "metrics_daily_overview",
            Self::DailyFunnel => "metrics_daily_funnel",
            Self::TopItemsDaily => "metrics_top_items_daily",
            Self::CohortRetention => "metrics_cohort_retention",
        }
    }

    /// CSV header, in the field order of the matching row type.
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            Self::DailyOverview => &[
                "dt",
                "dau",
                "view_uv",
                "atc_uv",
                "buy_uv",
                "view_cnt",
                "atc_cnt",
                "buy_cnt",
                "act_rate_uv",
                "purchase_rate_uv",
                "atc_to_buy_rate_uv",
            ],
            Self::DailyFunnel => &["dt", "step", "uv"],
            Self::TopItemsDaily => &["dt", "item_id", "view_uv", "atc_uv", "buy_uv", "buy_cnt"],
            Self::CohortRetention => &[
                "cohort_dt",
                "cohort_size",
                "d1",
                "d7_rolling",
                "d1_retention",
                "d7_rolling_retention",
            ],
        }
    }
}

impl std::fmt::Display for OutputTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
