//! Staged table writer.
//!
//! Tables are written into `<output_dir>/.staging-<run_id>/` first. Only
//! [`StagedOutput::commit`] touches the live table directories, replacing each
//! one wholesale. Dropping an uncommitted stage deletes it, so a failed run
//! leaves prior outputs untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use csv::WriterBuilder;
use metrics_core::{Error, GrowthReport, Result};
use serde::Serialize;
use telemetry::metrics;
use tracing::{debug, info, warn};

use crate::tables::{OutputTable, PART_FILE, SUCCESS_MARKER};

const STAGING_PREFIX: &str = ".staging-";

/// A set of tables staged for one run.
#[derive(Debug)]
pub struct StagedOutput {
    output_dir: PathBuf,
    staging_dir: PathBuf,
    staged: Vec<OutputTable>,
    committed: bool,
}

impl StagedOutput {
    /// Creates a fresh staging directory under `output_dir`. Stages left
    /// behind by runs that died before cleanup are removed first.
    pub fn begin(output_dir: &Path, run_id: &str) -> Result<Self> {
        let staging_dir = output_dir.join(format!("{STAGING_PREFIX}{run_id}"));

        remove_stale_stages(output_dir).map_err(|e| Error::write(output_dir, e))?;
        fs::create_dir_all(&staging_dir).map_err(|e| Error::write(&staging_dir, e))?;

        debug!(staging_dir = %staging_dir.display(), "Created staging directory");

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            staging_dir,
            staged: Vec::new(),
            committed: false,
        })
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Writes one table into the stage. Returns the number of rows written.
    pub fn write_table<T: Serialize>(&mut self, table: OutputTable, rows: &[T]) -> Result<usize> {
        let started = Instant::now();
        let table_dir = self.staging_dir.join(table.name());

        if let Err(e) = write_table_dir(&table_dir, table, rows) {
            metrics().write_errors.inc();
            return Err(e);
        }

        self.staged.retain(|t| *t != table);
        self.staged.push(table);

        let m = metrics();
        m.rows_written.inc_by(rows.len() as u64);
        m.write_latency_ms.observe(started.elapsed().as_millis() as u64);

        debug!(table = %table, rows = rows.len(), "Staged table");
        Ok(rows.len())
    }

    /// Stages all four tables of a report.
    pub fn write_report(&mut self, report: &GrowthReport) -> Result<usize> {
        let mut total = 0;
        total += self.write_table(OutputTable::DailyOverview, &report.daily)?;
        total += self.write_table(OutputTable::DailyFunnel, &report.funnel)?;
        total += self.write_table(OutputTable::TopItemsDaily, &report.top_items)?;
        total += self.write_table(OutputTable::CohortRetention, &report.retention)?;
        Ok(total)
    }

    /// Replaces each live table directory with its staged copy.
    pub fn commit(mut self) -> Result<()> {
        for table in &self.staged {
            let staged = self.staging_dir.join(table.name());
            let live = self.output_dir.join(table.name());

            remove_existing(&live).map_err(|e| Error::write(&live, e))?;
            fs::rename(&staged, &live).map_err(|e| Error::write(&live, e))?;

            metrics().tables_written.inc();
            info!(table = %table, path = %live.display(), "Table replaced");
        }

        self.committed = true;
        fs::remove_dir_all(&self.staging_dir).map_err(|e| Error::write(&self.staging_dir, e))?;
        Ok(())
    }

    /// Discards the stage without touching live tables.
    pub fn abort(self) {
        // Drop does the cleanup.
    }
}

impl Drop for StagedOutput {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Err(e) = fs::remove_dir_all(&self.staging_dir) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(
                    staging_dir = %self.staging_dir.display(),
                    error = %e,
                    "Failed to remove staging directory"
                );
            }
        }
    }
}

fn write_table_dir<T: Serialize>(dir: &Path, table: OutputTable, rows: &[T]) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::write(dir, e))?;

    let path = dir.join(PART_FILE);
    // Header written by hand so empty tables still carry one.
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)
        .map_err(|e| Error::write(&path, e))?;

    writer
        .write_record(table.header())
        .map_err(|e| Error::write(&path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| Error::write(&path, e))?;
    }
    writer.flush().map_err(|e| Error::write(&path, e))?;

    let marker = dir.join(SUCCESS_MARKER);
    fs::write(&marker, b"").map_err(|e| Error::write(&marker, e))?;
    Ok(())
}

fn remove_stale_stages(output_dir: &Path) -> io::Result<()> {
    let entries = match fs::read_dir(output_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    for entry in entries {
        let entry = entry?;
        if !entry.file_name().to_string_lossy().starts_with(STAGING_PREFIX) {
            continue;
        }
        let path = entry.path();
        remove_existing(&path)?;
        warn!(path = %path.display(), "Removed stale staging directory");
    }
    Ok(())
}

fn remove_existing(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
