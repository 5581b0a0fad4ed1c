use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::budget::BudgetPeriod;
use crate::services::date_utils;

const FORTNIGHT_DAYS: i64 = 14;
const FOUR_WEEK_DAYS: i64 = 28;

/// The budget cycle containing a given day. Inclusive on both ends:
/// `end` is always the day before `next_renewal`, and the window always
/// contains the day it was computed for. Never stored — re-derived from
/// the anchor on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub next_renewal: NaiveDate,
}

/// How a user expresses a new renewal target when (re)configuring a
/// budget: a weekday for weekly periods, an explicit cycle start date for
/// fortnightly / 4-weekly periods, or "from today" for monthly periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorInput {
    Weekday(u8),
    StartDate(NaiveDate),
    Today,
}

/// Resolve a weekday (0=Sunday..6=Saturday) to an anchor date: today if
/// today matches, otherwise the most recent earlier date with that
/// weekday. Backward-only, so repeated calls on different days produce
/// anchors that are equivalent modulo 7 days.
pub fn resolve_anchor_for_weekday(target_weekday: u8, today: NaiveDate) -> AppResult<NaiveDate> {
    if target_weekday > 6 {
        return Err(AppError::validation(format!(
            "Weekday must be between 0 and 6: {}",
            target_weekday
        )));
    }

    let today_weekday = today.weekday().num_days_from_sunday() as i64;
    let offset = (today_weekday - target_weekday as i64).rem_euclid(7);
    Ok(date_utils::add_days(today, -offset))
}

/// Compute the cycle window containing `now` for the given period and
/// anchor. All period-type branching lives here.
pub fn current_cycle_window(
    period: BudgetPeriod,
    anchor: NaiveDate,
    now: NaiveDate,
) -> CycleWindow {
    match period {
        BudgetPeriod::Weekly => {
            // The anchor date itself is informational; only its weekday
            // matters.
            let renewal_weekday = anchor.weekday().num_days_from_sunday() as i64;
            let now_weekday = now.weekday().num_days_from_sunday() as i64;
            let offset = (now_weekday - renewal_weekday).rem_euclid(7);
            fixed_window(date_utils::add_days(now, -offset), 7)
        }
        BudgetPeriod::Fortnightly => phase_window(anchor, now, FORTNIGHT_DAYS),
        BudgetPeriod::FourWeekly => phase_window(anchor, now, FOUR_WEEK_DAYS),
        BudgetPeriod::Monthly => monthly_window(anchor.day(), now),
    }
}

/// Compute a fresh anchor for a period change. Weekly delegates to
/// [`resolve_anchor_for_weekday`]; fortnightly / 4-weekly take the
/// supplied start date verbatim; monthly anchors on today, whose
/// day-of-month becomes the renewal day.
pub fn retarget_anchor(
    period: BudgetPeriod,
    input: AnchorInput,
    today: NaiveDate,
) -> AppResult<NaiveDate> {
    match (period, input) {
        (BudgetPeriod::Weekly, AnchorInput::Weekday(weekday)) => {
            resolve_anchor_for_weekday(weekday, today)
        }
        (BudgetPeriod::Fortnightly | BudgetPeriod::FourWeekly, AnchorInput::StartDate(day)) => {
            Ok(day)
        }
        (BudgetPeriod::Monthly, AnchorInput::Today) => Ok(today),
        (period, _) => Err(AppError::validation(format!(
            "Anchor input does not match period: {}",
            period
        ))),
    }
}

fn fixed_window(start: NaiveDate, length_days: i64) -> CycleWindow {
    let next_renewal = date_utils::add_days(start, length_days);
    CycleWindow {
        start,
        end: date_utils::add_days(next_renewal, -1),
        next_renewal,
    }
}

/// Fixed-length cycle phased off the anchor: the anchor is a permanent
/// phase reference, so moving `now` never desynchronizes the boundaries.
fn phase_window(anchor: NaiveDate, now: NaiveDate, length_days: i64) -> CycleWindow {
    let offset = date_utils::days_between(anchor, now).rem_euclid(length_days);
    fixed_window(date_utils::add_days(now, -offset), length_days)
}

/// Monthly cycle renewing on the anchor's day-of-month, clamped to the
/// last day of any shorter month it is applied to.
fn monthly_window(renewal_day: u32, now: NaiveDate) -> CycleWindow {
    let candidate = clamped_date(now.year(), now.month(), renewal_day);
    let start = if candidate <= now {
        candidate
    } else {
        let (year, month) = previous_month(now.year(), now.month());
        clamped_date(year, month, renewal_day)
    };

    let (year, month) = next_month(start.year(), start.month());
    let next_renewal = clamped_date(year, month, renewal_day);
    CycleWindow {
        start,
        end: date_utils::add_days(next_renewal, -1),
        next_renewal,
    }
}

fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.min(date_utils::days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).expect("clamped day must be valid")
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}
