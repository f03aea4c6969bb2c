//! Date and time planning for a booking run.
//!
//! Everything in this module is pure: callers pass "now" in and get
//! calendar facts back, so it all tests without a clock or any I/O.

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::BookingConfig;

/// Day of week, ordered the way the schedule grid orders its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// Column index on the schedule grid: 0 = Sunday .. 6 = Saturday.
    pub fn index(self) -> usize {
        match self {
            Weekday::Sunday => 0,
            Weekday::Monday => 1,
            Weekday::Tuesday => 2,
            Weekday::Wednesday => 3,
            Weekday::Thursday => 4,
            Weekday::Friday => 5,
            Weekday::Saturday => 6,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weekday::Sunday => "sunday",
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
        };
        f.write_str(name)
    }
}

/// The three instants that shape one run.
///
/// `open_at` is always `class_date` minus the configured open-day offset
/// at the configured wall-clock time; `ready_at` precedes `open_at` by the
/// configured lead. Planned once from "now", never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    pub class_date: NaiveDate,
    pub open_at: NaiveDateTime,
    pub ready_at: NaiveDateTime,
}

impl BookingWindow {
    /// Plan a run from the booking settings and a reference instant.
    pub fn plan(booking: &BookingConfig, now: NaiveDateTime) -> Self {
        let class_date = target_class_date(booking.weekday, now.date());
        let open_at = open_time_for_class(
            class_date,
            booking.open_time,
            booking.opens_days_before,
        );
        let ready_at = open_at - Duration::minutes(i64::from(booking.ready_lead_minutes));
        Self {
            class_date,
            open_at,
            ready_at,
        }
    }
}

/// First occurrence of `weekday` on or after `base`.
pub fn next_weekday_on_or_after(base: NaiveDate, weekday: Weekday) -> NaiveDate {
    let ahead =
        (weekday.index() as i64 - i64::from(base.weekday().num_days_from_sunday())).rem_euclid(7);
    base + Days::new(ahead as u64)
}

/// Target class date: the first `weekday` on or after `today + 7` days.
///
/// Always lands 7 to 13 days out. Landing exactly on `today + 7` (base
/// already on the target weekday) is a valid result, not a skipped case.
pub fn target_class_date(weekday: Weekday, today: NaiveDate) -> NaiveDate {
    next_weekday_on_or_after(today + Days::new(7), weekday)
}

/// The instant bookings open for a class: `opens_days_before` days ahead
/// of the class date, at `open_time` with sub-second precision zeroed.
pub fn open_time_for_class(
    class_date: NaiveDate,
    open_time: NaiveTime,
    opens_days_before: u32,
) -> NaiveDateTime {
    let time = open_time.with_nanosecond(0).unwrap_or(open_time);
    (class_date - Days::new(u64::from(opens_days_before))).and_time(time)
}

/// `YYYY-MM-DD`, zero padded, as the schedule URL expects it.
pub fn to_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Whether a run starting at `now` should do any work at all.
///
/// True iff `open_at` is at most `horizon` ahead of `now`, and `now` is at
/// most `grace` past `open_at`. A run that starts slightly late can still
/// win the slot, so lateness up to the poll budget stays in the window.
pub fn within_window(
    now: NaiveDateTime,
    open_at: NaiveDateTime,
    horizon: Duration,
    grace: Duration,
) -> bool {
    let until_open = open_at.signed_duration_since(now);
    until_open <= horizon && -until_open <= grace
}
