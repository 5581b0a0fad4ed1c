use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::json;

use crate::error::{AppError, AppResult};

/// Start of the calendar day containing `dt` (00:00:00).
pub fn start_of_day(dt: DateTime<Utc>) -> DateTime<Utc> {
    day_start(dt.date_naive())
}

/// End of the calendar day containing `dt` (23:59:59).
pub fn end_of_day(dt: DateTime<Utc>) -> DateTime<Utc> {
    day_end(dt.date_naive())
}

pub fn day_start(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0).expect("midnight must be valid"))
}

pub fn day_end(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_hms_opt(23, 59, 59).expect("23:59:59 must be valid"))
}

/// `day` shifted by `n` calendar days. Rolls over month and year
/// boundaries; `n` may be negative.
pub fn add_days(day: NaiveDate, n: i64) -> NaiveDate {
    day + Duration::days(n)
}

/// Whole calendar days from `a` to `b`, sign-preserving. Day-granular by
/// construction, so time of day never enters the computation.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    b.signed_duration_since(a).num_days()
}

/// Number of days in the given month (handles leap years).
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("first of month must be valid");
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("first of month must be valid");
    next.signed_duration_since(first).num_days() as u32
}

/// Format a date as the persisted `YYYY-MM-DD` form.
pub fn format_iso_date(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Strict inverse of [`format_iso_date`]; the round-trip is the identity.
pub fn parse_iso_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|err| {
        AppError::validation_with_details(
            "invalid date format",
            json!({"value": value, "error": err.to_string()}),
        )
    })
}

pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| {
            AppError::validation_with_details(
                "invalid timestamp format",
                json!({"value": value, "error": err.to_string()}),
            )
        })
}

pub fn parse_optional_timestamp(value: Option<&String>) -> AppResult<Option<DateTime<Utc>>> {
    match value {
        Some(raw) => Ok(Some(parse_timestamp(raw)?)),
        Option::None => Ok(Option::None),
    }
}
