use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::impulse::{Impulse, ImpulseKind};
use crate::services::date_utils;

/// Derived judgment of a single impulse: acting on a positive urge or
/// resisting a negative one is good; everything else is bad. There is no
/// third state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Good,
    Bad,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTotals {
    pub good: u32,
    pub bad: u32,
}

/// One calendar day's counts within a queried range. Emitted densely:
/// days with no impulses still get a zero bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBucket {
    pub day: NaiveDate,
    pub good: u32,
    pub bad: u32,
}

pub fn classify(kind: ImpulseKind, acted_on: bool) -> Outcome {
    let aligned = match kind {
        ImpulseKind::Positive => acted_on,
        ImpulseKind::Negative => !acted_on,
    };
    if aligned {
        Outcome::Good
    } else {
        Outcome::Bad
    }
}

/// Good/bad counts over the whole collection; order-independent.
pub fn score(impulses: &[Impulse]) -> ScoreTotals {
    let mut totals = ScoreTotals::default();
    for impulse in impulses {
        match classify(impulse.kind, impulse.acted_on) {
            Outcome::Good => totals.good += 1,
            Outcome::Bad => totals.bad += 1,
        }
    }
    totals
}

/// One bucket per calendar day from `start_day` to `end_day` inclusive,
/// ascending. An impulse counts toward the day whose
/// `[midnight, midnight + 1 day)` window contains its timestamp, so the
/// result feeds a fixed-width chart with no gap-filling downstream.
pub fn bucket_by_day(
    impulses: &[Impulse],
    start_day: NaiveDate,
    end_day: NaiveDate,
) -> Vec<DailyBucket> {
    let mut buckets = Vec::new();
    let mut day = start_day;
    while day <= end_day {
        let window_start = date_utils::day_start(day);
        let window_end = window_start + Duration::days(1);

        let mut bucket = DailyBucket { day, good: 0, bad: 0 };
        for impulse in impulses {
            if impulse.created_at >= window_start && impulse.created_at < window_end {
                match classify(impulse.kind, impulse.acted_on) {
                    Outcome::Good => bucket.good += 1,
                    Outcome::Bad => bucket.bad += 1,
                }
            }
        }
        buckets.push(bucket);
        day = date_utils::add_days(day, 1);
    }
    buckets
}

/// Largest single good or bad count across the buckets, floored at 1 so
/// an all-zero range still yields a usable chart scale denominator.
pub fn max_daily_count(buckets: &[DailyBucket]) -> u32 {
    buckets
        .iter()
        .map(|bucket| bucket.good.max(bucket.bad))
        .max()
        .unwrap_or(0)
        .max(1)
}
