//! Calendar arithmetic shared by the scheduler and the activity views.
//!
//! Everything here is timezone naive: callers convert to local wall-clock time
//! before handing dates in.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Adds `days` calendar days to `date`. Returns `None` when the result falls
/// outside the range chrono can represent.
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_days(days)?)
}

/// Whole days from `from` to `to`, rounded up toward the later instant.
///
/// The result is negative when `to` precedes `from`. Because the ceiling of a
/// negative span rounds toward zero, a due date that passed 2.4 days ago
/// reports `-2`, and one due in 6.1 days reports `7`.
pub fn days_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    let millis = (to - from).num_milliseconds();
    let whole = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) == 0 {
        whole
    } else {
        whole + 1
    }
}

pub fn is_same_calendar_day(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date()
}

pub fn start_of_day(at: NaiveDateTime) -> NaiveDateTime {
    at.date().and_time(NaiveTime::MIN)
}

/// Midnight at the start of `date`.
pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}
