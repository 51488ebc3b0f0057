//! Tracing setup for structured logging.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Log level filter (e.g., "info", "pipeline=debug")
    pub filter: String,
    /// Whether to output JSON format
    pub json: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl TracingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Reads `RUST_LOG` and `LOG_JSON`.
    pub fn from_env() -> Self {
        let json = std::env::var("LOG_JSON")
            .map(|v| is_truthy(&v))
            .unwrap_or(false);
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self::new().with_filter(filter).with_json(json)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}

/// Initialize tracing with the given configuration.
///
/// A second call is a no-op, so tests may initialize freely.
pub fn init_tracing(config: TracingConfig) {
    let env_filter =
        EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let result = if config.json {
        let fmt_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    } else {
        let fmt_layer = fmt::layer().with_target(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    };

    if result.is_ok() {
        tracing::debug!(filter = %config.filter, json = config.json, "Tracing initialized");
    }
}

/// Initialize tracing from environment variables.
pub fn init_tracing_from_env() {
    init_tracing(TracingConfig::from_env());
}
