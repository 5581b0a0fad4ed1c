use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::services::date_utils;

/// A Monday-through-Sunday history page: `start` is Monday 00:00:00 and
/// `end` is the following Sunday 23:59:59, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl WeekRange {
    /// The same week shifted by `delta_weeks` (negative for earlier
    /// weeks, 0 for the identity).
    pub fn shift(&self, delta_weeks: i64) -> WeekRange {
        let days = delta_weeks * 7;
        WeekRange {
            start: self.start + chrono::Duration::days(days),
            end: self.end + chrono::Duration::days(days),
        }
    }

    /// The seven calendar days of the week, Monday first.
    pub fn days(&self) -> Vec<NaiveDate> {
        let first = self.start.date_naive();
        (0..7).map(|offset| date_utils::add_days(first, offset)).collect()
    }

    pub fn contains(&self, dt: DateTime<Utc>) -> bool {
        self.start <= dt && dt <= self.end
    }
}

/// The ISO week containing `ref_date`: the Monday at or before it, even
/// when `ref_date` is a Sunday (which is the last day of its week, not
/// the first).
pub fn week_range_containing(ref_date: NaiveDate) -> WeekRange {
    let back = ref_date.weekday().num_days_from_monday() as i64;
    let monday = date_utils::add_days(ref_date, -back);
    let sunday = date_utils::add_days(monday, 6);
    WeekRange {
        start: date_utils::day_start(monday),
        end: date_utils::day_end(sunday),
    }
}
