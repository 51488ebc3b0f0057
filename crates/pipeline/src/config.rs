//! Pipeline configuration.

use chrono_tz::Tz;
use metrics_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Aggregation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// IANA zone that defines calendar days (e.g. "UTC", "Europe/Moscow")
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

impl PipelineConfig {
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Resolves the configured zone.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .trim()
            .parse::<Tz>()
            .map_err(|_| Error::config(format!("unknown time zone: {}", self.timezone)))
    }
}
