//! Failure handling: fatal I/O, tolerated row-level problems.

use std::fs;

use integration_tests::{fixtures, setup::TestContext};
use pipeline::{PipelineConfig, PipelineRunner};
use storage::{OutputTable, PART_FILE};

/// Missing input aborts with IO_001 and writes nothing.
#[tokio::test]
async fn test_missing_input_is_fatal() {
    let ctx = TestContext::new();

    let err = ctx.run().await.unwrap_err();
    assert_eq!(err.error_code(), Some("IO_001"));
    assert!(!ctx.output_dir.exists());
}

/// An unwritable output root aborts with IO_002.
#[tokio::test]
async fn test_unwritable_output_is_fatal() {
    let ctx = TestContext::with_input(&fixtures::csv(&[fixtures::event(0, "u1", "view", "i1")]));
    fs::write(&ctx.output_dir, "not a directory").unwrap();

    let err = ctx.run().await.unwrap_err();
    assert_eq!(err.error_code(), Some("IO_002"));
}

/// A failed rerun leaves the previous outputs in place.
#[tokio::test]
async fn test_failed_rerun_keeps_previous_outputs() {
    let ctx = TestContext::with_input(&fixtures::csv(&[fixtures::event(0, "u1", "view", "i1")]));
    ctx.run().await.expect("first run failed");
    let before = ctx.table_text(OutputTable::DailyOverview);

    fs::remove_file(&ctx.input_path).unwrap();
    assert!(ctx.run().await.is_err());

    assert_eq!(ctx.table_text(OutputTable::DailyOverview), before);
}

/// Rerunning replaces prior content rather than appending.
#[tokio::test]
async fn test_rerun_overwrites() {
    let ctx = TestContext::with_input(&fixtures::csv(&[
        fixtures::event(0, "u1", "view", "i1"),
        fixtures::event(1, "u2", "view", "i1"),
    ]));
    ctx.run().await.expect("first run failed");
    assert_eq!(ctx.read_report().daily.len(), 2);

    let stray = ctx.table_dir(OutputTable::DailyOverview).join("part-00001.csv");
    fs::write(&stray, "stale").unwrap();

    ctx.write_input(&fixtures::csv(&[fixtures::event(3, "u9", "view", "i1")]));
    ctx.run().await.expect("second run failed");

    let report = ctx.read_report();
    assert_eq!(report.daily.len(), 1);
    assert_eq!(report.daily[0].dt, fixtures::day(3));
    assert!(!stray.exists());
    assert!(ctx.table_dir(OutputTable::DailyOverview).join(PART_FILE).exists());
}

/// Missing columns become nulls instead of failing the run.
#[tokio::test]
async fn test_schema_drift_tolerated() {
    let ctx = TestContext::new();
    let ts = fixtures::millis(0, 0);
    ctx.write_input(&format!(
        "visitorid,timestamp,event\nu1,{ts},view\nu2,{ts},transaction\nu3\n"
    ));

    let summary = ctx.run().await.expect("run failed");
    assert_eq!(summary.rows_read, 3);
    assert_eq!(summary.rows_dropped, 1);

    let report = ctx.read_report();
    assert_eq!(report.daily[0].dau, 2);
    assert_eq!(report.daily[0].buy_cnt, 1);
    assert_eq!(report.top_items.len(), 1);
    assert_eq!(report.top_items[0].item_id, None);
    assert_eq!(report.top_items[0].buy_cnt, 1);
}

/// Undecodable records are skipped and counted.
#[tokio::test]
async fn test_unreadable_record_skipped() {
    let ctx = TestContext::new();
    let mut bytes = format!("{}\n{},", fixtures::HEADER, fixtures::millis(0, 0)).into_bytes();
    // visitor id that is not valid UTF-8
    bytes.extend_from_slice(b"u\xff\xfe,view,i1,\n");
    bytes.extend_from_slice(format!("{}\n", fixtures::event(0, "u2", "view", "i1")).as_bytes());
    fs::write(&ctx.input_path, bytes).unwrap();

    let summary = ctx.run().await.expect("run failed");
    assert_eq!(summary.rows_unreadable, 1);
    assert_eq!(summary.events, 1);
    assert_eq!(ctx.read_report().daily[0].dau, 1);
}

/// An unknown zone is rejected before any I/O.
#[test]
fn test_unknown_timezone_rejected() {
    let ctx = TestContext::new();
    let err = PipelineRunner::new(
        ctx.storage_config(),
        &PipelineConfig::default().with_timezone("Atlantis/Central"),
    )
    .unwrap_err();
    assert_eq!(err.error_code(), Some("CFG_001"));
}
