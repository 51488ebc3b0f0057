//! Growth Metrics batch job
//!
//! Turns a raw clickstream log into four daily-grain CSV extracts:
//! - Daily overview (DAU, funnel uniques and counts, conversion rates)
//! - Daily funnel (long format)
//! - Per-item daily funnel counts
//! - Cohort retention (D+1, rolling D+7)

use anyhow::{Context, Result};
use tracing::{error, info};

use pipeline::{PipelineConfig, PipelineRunner};
use storage::StorageConfig;
use telemetry::{init_tracing_from_env, metrics, snapshot_json};

/// Application configuration.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default)]
    storage: StorageConfig,

    #[serde(default)]
    pipeline: PipelineConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting growth metrics v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    info!(
        input_path = %config.storage.input_path.display(),
        output_dir = %config.storage.output_dir.display(),
        timezone = %config.pipeline.timezone,
        "Loaded config"
    );

    let runner = PipelineRunner::new(config.storage, &config.pipeline)
        .context("Invalid pipeline configuration")?;

    let result = runner.run().await;

    let snapshot = metrics().snapshot();
    info!(metrics = %snapshot_json(&snapshot), "Run metrics");

    match result {
        Ok(summary) => {
            info!(
                run_id = %summary.run_id,
                dropped_rows = summary.rows_dropped + summary.rows_unreadable,
                "Done"
            );
            Ok(())
        }
        Err(e) => {
            error!(code = e.error_code().unwrap_or("-"), error = %e, "Pipeline run failed");
            Err(e).context("Pipeline run failed")
        }
    }
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("GROWTH")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Flat overrides for the three documented options
    if let Ok(path) = std::env::var("GROWTH_INPUT_PATH") {
        config.storage.input_path = path.into();
    }
    if let Ok(dir) = std::env::var("GROWTH_OUTPUT_DIR") {
        config.storage.output_dir = dir.into();
    }
    if let Ok(tz) = std::env::var("GROWTH_TIMEZONE") {
        config.pipeline.timezone = tz;
    }

    Ok(config)
}
