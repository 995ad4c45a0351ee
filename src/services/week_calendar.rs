use std::fmt;
use std::iter;

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

const WEEK: Days = Days::new(7);

/// Monday of the week containing `date`. Dates near the start of the
/// calendar clamp to `NaiveDate::MIN`.
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    let offset = Days::new(u64::from(date.weekday().num_days_from_monday()));
    date.checked_sub_days(offset).unwrap_or(NaiveDate::MIN)
}

/// Last day (inclusive) of the 7-day window starting at `week_start`.
pub fn week_end_of(week_start: NaiveDate) -> NaiveDate {
    week_start
        .checked_add_days(Days::new(6))
        .unwrap_or(NaiveDate::MAX)
}

pub fn previous_week_start(week_start: NaiveDate) -> NaiveDate {
    week_start.checked_sub_days(WEEK).unwrap_or(NaiveDate::MIN)
}

/// Mondays of the current week and the `count - 1` weeks before it, newest
/// first. The list ends early at the start of the calendar.
pub fn recent_week_starts(today: NaiveDate, count: usize) -> Vec<NaiveDate> {
    iter::successors(Some(week_start_of(today)), |week| {
        week.checked_sub_days(WEEK)
    })
    .take(count)
    .collect()
}

/// ISO 8601 week: weeks start on Monday and week 1 holds the year's first
/// Thursday, so early January days can belong to the previous year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct IsoWeekKey {
    pub year: i32,
    pub week: u32,
}

impl IsoWeekKey {
    pub fn of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }
}

impl fmt::Display for IsoWeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{}", self.year, self.week)
    }
}
