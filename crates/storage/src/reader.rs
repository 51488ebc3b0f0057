//! CSV readers for the raw event log and written tables.

use std::path::Path;
use std::time::Instant;

use csv::ReaderBuilder;
use metrics_core::{Error, RawEvent, Result};
use serde::de::DeserializeOwned;
use telemetry::metrics;
use tracing::{debug, info};

use crate::tables::{OutputTable, PART_FILE};

/// Raw rows read from the input, plus the records that could not be decoded.
#[derive(Debug, Default)]
pub struct RawEventBatch {
    pub events: Vec<RawEvent>,
    /// Records rejected by the CSV decoder (e.g. invalid UTF-8)
    pub unreadable: u64,
}

/// Read the header-bearing clickstream CSV at `path`.
///
/// Columns are matched by header name, so column order does not matter and
/// missing columns read as null. Undecodable records are skipped and counted;
/// an I/O error aborts the read.
pub fn read_events(path: &Path) -> Result<RawEventBatch> {
    let started = Instant::now();

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| Error::read(path, e))?;

    let mut batch = RawEventBatch::default();

    for (index, record) in reader.deserialize::<RawEvent>().enumerate() {
        match record {
            Ok(event) => batch.events.push(event),
            Err(e) if e.is_io_error() => return Err(Error::read(path, e)),
            Err(e) => {
                debug!(record = index + 1, error = %e, "Skipping unreadable record");
                batch.unreadable += 1;
            }
        }
    }

    let elapsed_ms = started.elapsed().as_millis() as u64;
    let m = metrics();
    m.rows_read.inc_by(batch.events.len() as u64);
    m.rows_unreadable.inc_by(batch.unreadable);
    m.read_latency_ms.observe(elapsed_ms);

    info!(
        path = %path.display(),
        rows = batch.events.len(),
        unreadable = batch.unreadable,
        elapsed_ms,
        "Read raw events"
    );

    Ok(batch)
}

/// Read a written table back from `<output_dir>/<table>/part-00000.csv`.
pub fn read_table<T: DeserializeOwned>(output_dir: &Path, table: OutputTable) -> Result<Vec<T>> {
    let path = output_dir.join(table.name()).join(PART_FILE);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(&path)
        .map_err(|e| Error::read(&path, e))?;

    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(|e| Error::read(&path, e))
}
