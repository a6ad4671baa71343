//! Human-facing order identifiers: `OS-{YYYY}{MM}-{seq:04}`.

use chrono::{Datelike, Months, NaiveDate};

/// First day of `date`'s month and first day of the following month.
pub fn month_window(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date.with_day(1).unwrap_or(date);
    let end = start
        .checked_add_months(Months::new(1))
        .unwrap_or(NaiveDate::MAX);
    (start, end)
}

/// Formats the identifier for the `sequence`-th order of `date`'s month.
pub fn format_readable_id(date: NaiveDate, sequence: u64) -> String {
    format!("OS-{:04}{:02}-{:04}", date.year(), date.month(), sequence)
}

/// Sequence for a new order given how many orders already share its month.
pub fn next_sequence(existing_in_month: usize) -> u64 {
    existing_in_month as u64 + 1
}

/// Splits a readable id into (year, month, sequence).
pub fn parse_readable_id(id: &str) -> Option<(i32, u32, u64)> {
    let rest = id.strip_prefix("OS-")?;
    let (period, sequence) = rest.split_once('-')?;
    if period.len() != 6 || sequence.len() < 4 || !period.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = period[..4].parse().ok()?;
    let month = period[4..].parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    let sequence = sequence.parse().ok()?;
    Some((year, month, sequence))
}
