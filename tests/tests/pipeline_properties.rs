//! Cross-table invariants over a larger generated clickstream.

use std::collections::HashMap;
use std::fs;

use integration_tests::{fixtures, setup::TestContext};
use metrics_core::EventKind;
use pipeline::{build_report, Normalizer};
use storage::{read_events, OutputTable};

async fn run_mixed() -> TestContext {
    let ctx = TestContext::with_input(&fixtures::mixed_clickstream());
    ctx.run().await.expect("run failed");
    ctx
}

#[tokio::test]
async fn test_dau_covers_typed_uniques() {
    let ctx = run_mixed().await;
    let report = ctx.read_report();
    assert!(!report.daily.is_empty());

    for row in &report.daily {
        assert!(
            row.dau >= row.view_uv.max(row.atc_uv).max(row.buy_uv),
            "dau too small on {}",
            row.dt
        );
    }

    let dates: Vec<_> = report.daily.iter().map(|r| r.dt).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted, "daily overview must be chronological");
}

#[tokio::test]
async fn test_funnel_matches_daily_uniques() {
    let ctx = run_mixed().await;
    let report = ctx.read_report();

    assert_eq!(report.funnel.len(), report.daily.len() * 3);
    for row in &report.funnel {
        let day = report
            .daily
            .iter()
            .find(|d| d.dt == row.dt)
            .expect("funnel date missing from overview");
        let expected = match row.step {
            EventKind::View => day.view_uv,
            EventKind::AddToCart => day.atc_uv,
            EventKind::Transaction => day.buy_uv,
        };
        assert_eq!(row.uv, expected, "{} {}", row.dt, row.step);
    }
}

#[tokio::test]
async fn test_item_purchases_sum_to_daily() {
    let ctx = run_mixed().await;
    let report = ctx.read_report();

    for day in &report.daily {
        let sum: u64 = report
            .top_items
            .iter()
            .filter(|r| r.dt == day.dt)
            .map(|r| r.buy_cnt)
            .sum();
        assert_eq!(sum, day.buy_cnt, "buy_cnt mismatch on {}", day.dt);
    }
}

#[tokio::test]
async fn test_cohort_sizes_and_ratio_bounds() {
    let ctx = run_mixed().await;
    let report = ctx.read_report();

    let batch = read_events(&ctx.input_path).expect("read failed");
    let log = Normalizer::default().normalize(batch.events);
    let mut first_seen: HashMap<&str, chrono::NaiveDate> = HashMap::new();
    let mut sorted: Vec<_> = log
        .events()
        .iter()
        .filter_map(|e| e.user().map(|u| (u, e.event_date)))
        .collect();
    sorted.sort();
    for (user, dt) in sorted {
        first_seen.entry(user).or_insert(dt);
    }

    for row in &report.retention {
        let expected = first_seen.values().filter(|&&d| d == row.cohort_dt).count() as u64;
        assert_eq!(row.cohort_size, expected, "cohort {}", row.cohort_dt);
        assert!(row.d1 <= row.d7_rolling && row.d7_rolling <= row.cohort_size);

        if row.cohort_size == 0 {
            assert_eq!(row.d1_retention, None);
            assert_eq!(row.d7_rolling_retention, None);
        } else {
            for r in [row.d1_retention, row.d7_rolling_retention] {
                let r = r.expect("ratio should be present");
                assert!((0.0..=1.0).contains(&r));
            }
        }
    }

    let total: u64 = report.retention.iter().map(|r| r.cohort_size).sum();
    assert_eq!(total, first_seen.len() as u64);
}

#[tokio::test]
async fn test_written_tables_match_in_memory_report() {
    let ctx = run_mixed().await;

    let batch = read_events(&ctx.input_path).expect("read failed");
    let log = Normalizer::default().normalize(batch.events);

    assert_eq!(ctx.read_report(), build_report(&log));
}

#[tokio::test]
async fn test_rerun_is_byte_identical() {
    let ctx = run_mixed().await;
    let first: Vec<String> = OutputTable::ALL.iter().map(|t| ctx.table_text(*t)).collect();

    ctx.run().await.expect("second run failed");
    let second: Vec<String> = OutputTable::ALL.iter().map(|t| ctx.table_text(*t)).collect();

    assert_eq!(first, second);

    let leftovers: Vec<_> = fs::read_dir(&ctx.output_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(".staging"))
        .collect();
    assert!(leftovers.is_empty(), "staging left behind: {:?}", leftovers);
}
