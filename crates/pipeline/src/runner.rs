//! Pipeline runner.
//!
//! One run reads the event log, normalizes it once, computes the four tables
//! on blocking tasks, and stages them for an all-or-nothing swap into the
//! output directory.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono_tz::Tz;
use metrics_core::{Error, GrowthReport, Result};
use storage::{read_events, StagedOutput, StorageConfig};
use telemetry::metrics;
use tokio::task::{spawn_blocking, JoinError};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::cohort::cohort_retention;
use crate::config::PipelineConfig;
use crate::daily::daily_overview;
use crate::funnel::funnel;
use crate::normalizer::{EventLog, Normalizer};
use crate::top_items::top_items_daily;

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub run_id: String,
    pub rows_read: u64,
    pub rows_unreadable: u64,
    pub rows_dropped: u64,
    pub events: u64,
    pub rows_written: u64,
}

/// Computes every table sequentially on the calling thread.
pub fn build_report(log: &EventLog) -> GrowthReport {
    let daily = daily_overview(log);
    let funnel = funnel(&daily);
    GrowthReport {
        daily,
        funnel,
        top_items: top_items_daily(log),
        retention: cohort_retention(log),
    }
}

/// Computes the tables concurrently. The funnel is derived from the daily
/// overview, so the two share a task.
pub async fn build_report_concurrent(log: Arc<EventLog>) -> Result<GrowthReport> {
    let started = Instant::now();

    let daily_log = log.clone();
    let daily_task = spawn_blocking(move || {
        let daily = daily_overview(&daily_log);
        let funnel = funnel(&daily);
        (daily, funnel)
    });

    let items_log = log.clone();
    let items_task = spawn_blocking(move || top_items_daily(&items_log));

    let cohort_task = spawn_blocking(move || cohort_retention(&log));

    let (daily, items, cohorts) = tokio::join!(daily_task, items_task, cohort_task);
    let (daily, funnel) = daily.map_err(task_failed)?;

    let report = GrowthReport {
        daily,
        funnel,
        top_items: items.map_err(task_failed)?,
        retention: cohorts.map_err(task_failed)?,
    };

    let elapsed_ms = started.elapsed().as_millis() as u64;
    metrics().aggregate_latency_ms.observe(elapsed_ms);
    info!(
        days = report.daily.len(),
        funnel_rows = report.funnel.len(),
        item_days = report.top_items.len(),
        cohorts = report.retention.len(),
        elapsed_ms,
        "Aggregations complete"
    );

    Ok(report)
}

/// The normalized event log plus what was lost before normalization.
#[derive(Debug)]
pub struct LoadedEvents {
    pub log: EventLog,
    pub rows_read: u64,
    pub unreadable: u64,
}

/// Reads and normalizes the event log. Blocking; the runner calls it off the
/// async workers.
pub fn load_event_log(input_path: &Path, tz: Tz) -> Result<LoadedEvents> {
    let batch = read_events(input_path)?;
    let rows_read = batch.events.len() as u64;
    let log = Normalizer::new(tz).normalize(batch.events);
    Ok(LoadedEvents {
        log,
        rows_read,
        unreadable: batch.unreadable,
    })
}

fn task_failed(e: JoinError) -> Error {
    Error::internal(format!("aggregation task failed: {e}"))
}

/// Runs the pipeline end to end.
#[derive(Debug, Clone)]
pub struct PipelineRunner {
    storage: StorageConfig,
    tz: Tz,
}

impl PipelineRunner {
    /// Validates the configuration up front; an unknown zone fails here.
    pub fn new(storage: StorageConfig, pipeline: &PipelineConfig) -> Result<Self> {
        Ok(Self {
            storage,
            tz: pipeline.tz()?,
        })
    }

    /// Executes one run under a fresh run id.
    pub async fn run(&self) -> Result<RunSummary> {
        let run_id = Uuid::new_v4().simple().to_string();
        let span = info_span!("pipeline_run", run_id = %run_id);
        self.run_with_id(run_id).instrument(span).await
    }

    async fn run_with_id(&self, run_id: String) -> Result<RunSummary> {
        let started = Instant::now();
        info!(
            input = %self.storage.input_path.display(),
            output = %self.storage.output_dir.display(),
            timezone = %self.tz,
            "Starting pipeline run"
        );

        let input_path = self.storage.input_path.clone();
        let tz = self.tz;
        let loaded = spawn_blocking(move || load_event_log(&input_path, tz))
            .await
            .map_err(|e| Error::internal(format!("reader task failed: {e}")))??;
        let rows_read = loaded.rows_read;
        let rows_unreadable = loaded.unreadable;

        let log = Arc::new(loaded.log);
        let rows_dropped = log.dropped();
        let events = log.len() as u64;

        let report = build_report_concurrent(log).await?;

        let output_dir = self.storage.output_dir.clone();
        let stage_id = run_id.clone();
        let written = spawn_blocking(move || -> Result<usize> {
            let mut stage = StagedOutput::begin(&output_dir, &stage_id)?;
            let written = stage.write_report(&report)?;
            stage.commit()?;
            Ok(written)
        })
        .await
        .map_err(|e| Error::internal(format!("writer task failed: {e}")))??;
        let rows_written = written as u64;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        metrics().run_latency_ms.observe(elapsed_ms);
        info!(
            rows_read,
            rows_unreadable,
            rows_dropped,
            events,
            rows_written,
            elapsed_ms,
            "Pipeline run complete"
        );

        Ok(RunSummary {
            run_id,
            rows_read,
            rows_unreadable,
            rows_dropped,
            events,
            rows_written,
        })
    }
}
