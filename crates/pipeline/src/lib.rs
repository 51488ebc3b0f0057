//! Growth metrics pipeline.
//!
//! - Normalizer (raw rows → dated events, invalid dates dropped)
//! - Daily overview and funnel reshape
//! - Per-item daily funnel counts
//! - Cohort retention (D+1, D+1..D+7)
//! - Runner (read → aggregate concurrently → staged write)

pub mod cohort;
pub mod config;
pub mod daily;
pub mod funnel;
pub mod normalizer;
pub mod runner;
pub mod tally;
pub mod top_items;

pub use cohort::cohort_retention;
pub use config::*;
pub use daily::daily_overview;
pub use funnel::funnel;
pub use normalizer::*;
pub use runner::*;
pub use top_items::top_items_daily;
