//! Test fixtures and clickstream generators.

use chrono::{Days, NaiveDate};

/// Midnight UTC of the first fixture day (2015-06-01).
pub const BASE_MILLIS: i64 = 1_433_116_800_000;

pub const MILLIS_PER_DAY: i64 = 86_400_000;

pub const HEADER: &str = "timestamp,visitorid,event,itemid,transactionid";

/// Calendar date `offset` days after the first fixture day.
pub fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 6, 1).unwrap() + Days::new(offset)
}

/// Epoch millis `ms_into_day` after midnight UTC of fixture day `offset`.
pub fn millis(offset: u64, ms_into_day: i64) -> i64 {
    BASE_MILLIS + offset as i64 * MILLIS_PER_DAY + ms_into_day
}

/// One CSV line. `None` fields are written empty.
pub fn line(
    timestamp: &str,
    visitor: Option<&str>,
    event: &str,
    item: Option<&str>,
    transaction: Option<&str>,
) -> String {
    format!(
        "{},{},{},{},{}",
        timestamp,
        visitor.unwrap_or(""),
        event,
        item.unwrap_or(""),
        transaction.unwrap_or("")
    )
}

/// A well-formed event line on fixture day `offset`.
pub fn event(offset: u64, visitor: &str, event: &str, item: &str) -> String {
    line(
        &millis(offset, 3_600_000).to_string(),
        Some(visitor),
        event,
        Some(item),
        None,
    )
}

/// A transaction line on fixture day `offset`.
pub fn purchase(offset: u64, visitor: &str, item: &str, transaction: &str) -> String {
    line(
        &millis(offset, 7_200_000).to_string(),
        Some(visitor),
        "transaction",
        Some(item),
        Some(transaction),
    )
}

/// Header plus lines, newline-terminated.
pub fn csv(lines: &[String]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for l in lines {
        out.push_str(l);
        out.push('\n');
    }
    out
}

/// A deterministic mixed clickstream over two weeks.
///
/// Visitors browse several items, some add to cart, fewer buy, and users
/// return on varying schedules. Labels vary in case, and a few rows carry
/// junk timestamps or unknown event names.
pub fn mixed_clickstream() -> String {
    let mut lines = Vec::new();
    let items = ["i1", "i2", "i3", "i4"];
    let labels = ["view", "VIEW", "View"];

    for v in 0..40u64 {
        let visitor = format!("v{v}");
        let first_day = v % 6;
        let visits: Vec<u64> = match v % 5 {
            0 => vec![first_day],
            1 => vec![first_day, first_day + 1],
            2 => vec![first_day, first_day + 3, first_day + 9],
            3 => vec![first_day, first_day + 7, first_day + 8],
            _ => vec![first_day, first_day + 1, first_day + 2, first_day + 5],
        };

        for (n, &d) in visits.iter().enumerate() {
            let item = items[(v as usize + n) % items.len()];
            lines.push(event(d, &visitor, labels[(v as usize + n) % labels.len()], item));
            lines.push(event(d, &visitor, "view", item));
            if (v + n as u64) % 3 == 0 {
                lines.push(event(d, &visitor, "addtocart", item));
                if v % 2 == 0 {
                    lines.push(purchase(d, &visitor, item, &format!("t{v}-{n}")));
                }
            }
            if v % 7 == 0 {
                lines.push(event(d, &visitor, "wishlist", item));
            }
        }
    }

    lines.push(line("garbage", Some("v1"), "view", Some("i1"), None));
    lines.push(line("", Some("v2"), "transaction", Some("i2"), Some("tx")));
    lines.push(line(&millis(4, 0).to_string(), None, "view", Some("i9"), None));

    csv(&lines)
}
