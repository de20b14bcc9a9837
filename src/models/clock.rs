//! Time sources and calendar-day arithmetic.
//!
//! Scheduling code never reads the wall clock itself; callers pass "now"
//! explicitly, usually taken from one of the [`Clock`] implementations here.

use chrono::{DateTime, Days, Duration, Local, TimeZone, Utc};

pub trait Clock {
    type Tz: TimeZone;

    fn now(&self) -> DateTime<Self::Tz>;
}

/// The local wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Tz = Local;

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock frozen at a given instant. Only moves when told to.
#[derive(Clone, Debug)]
pub struct FixedClock<Tz: TimeZone> {
    now: DateTime<Tz>,
}

impl<Tz: TimeZone> FixedClock<Tz> {
    pub fn new(now: DateTime<Tz>) -> Self {
        Self { now }
    }

    pub fn set(&mut self, now: DateTime<Tz>) {
        self.now = now;
    }

    pub fn advance_days(&mut self, days: u32) {
        self.now = add_calendar_days(&self.now, days);
    }
}

impl<Tz: TimeZone> Clock for FixedClock<Tz> {
    type Tz = Tz;

    fn now(&self) -> DateTime<Tz> {
        self.now.clone()
    }
}

/// Local wall clock shifted forward by whole days.
///
/// Lets a user fast-forward through a schedule ("Next Day") without touching
/// stored data.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimulatedClock {
    offset_days: u32,
}

impl SimulatedClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_day(&mut self) {
        self.offset_days = self.offset_days.saturating_add(1);
    }

    pub fn offset_days(&self) -> u32 {
        self.offset_days
    }

    pub fn reset(&mut self) {
        self.offset_days = 0;
    }
}

impl Clock for SimulatedClock {
    type Tz = Local;

    fn now(&self) -> DateTime<Local> {
        add_calendar_days(&Local::now(), self.offset_days)
    }
}

/// Adds whole calendar days in the timezone of `at`.
///
/// The wall-clock time is kept across DST changes. When the shifted local
/// time does not exist or is out of range, falls back to 24h steps and
/// finally to `at` itself, so this never panics.
pub fn add_calendar_days<Tz: TimeZone>(at: &DateTime<Tz>, days: u32) -> DateTime<Tz> {
    at.clone()
        .checked_add_days(Days::new(u64::from(days)))
        .or_else(|| at.clone().checked_add_signed(Duration::days(i64::from(days))))
        .unwrap_or_else(|| at.clone())
}

/// Subtracts whole calendar days, with the same fallbacks as [`add_calendar_days`].
pub fn sub_calendar_days<Tz: TimeZone>(at: &DateTime<Tz>, days: u32) -> DateTime<Tz> {
    at.clone()
        .checked_sub_days(Days::new(u64::from(days)))
        .or_else(|| at.clone().checked_sub_signed(Duration::days(i64::from(days))))
        .unwrap_or_else(|| at.clone())
}

/// Short human label for `date` relative to `now`, compared by calendar day
/// in `now`'s timezone: "today", "tomorrow", "in 3 days", "2 days ago", ...
/// Anything a week or more away is printed as `dd/mm/yyyy`.
pub fn relative_day_label<Tz: TimeZone>(date: &DateTime<Utc>, now: &DateTime<Tz>) -> String {
    let today = now.date_naive();
    let target = date.with_timezone(&now.timezone()).date_naive();
    let diff_days = (today - target).num_days();

    match diff_days {
        -1 => "tomorrow".to_string(),
        d if d < 0 && d > -7 => format!("in {} days", -d),
        0 => "today".to_string(),
        1 => "yesterday".to_string(),
        d if d > 0 && d < 7 => format!("{} days ago", d),
        _ => target.format("%d/%m/%Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use chrono_tz::Europe::Paris;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_add_calendar_days_crosses_month() {
        let start = at(2024, 1, 31, 9);
        assert_eq!(add_calendar_days(&start, 1), at(2024, 2, 1, 9));
        assert_eq!(add_calendar_days(&start, 14), at(2024, 2, 14, 9));
    }

    #[test]
    fn test_add_calendar_days_leap_year() {
        assert_eq!(add_calendar_days(&at(2024, 2, 28, 0), 1), at(2024, 2, 29, 0));
        assert_eq!(add_calendar_days(&at(2023, 2, 28, 0), 1), at(2023, 3, 1, 0));
    }

    #[test]
    fn test_add_zero_days_is_identity() {
        let start = at(2024, 6, 1, 12);
        assert_eq!(add_calendar_days(&start, 0), start);
    }

    #[test]
    fn test_add_calendar_days_keeps_offset() {
        let utc_plus_one = FixedOffset::east_opt(3600).unwrap();
        let start = utc_plus_one.with_ymd_and_hms(2024, 3, 30, 23, 30, 0).unwrap();
        let next = add_calendar_days(&start, 2);
        assert_eq!(next, utc_plus_one.with_ymd_and_hms(2024, 4, 1, 23, 30, 0).unwrap());
    }

    #[test]
    fn test_add_calendar_days_across_spring_forward() {
        let start = Paris.with_ymd_and_hms(2024, 3, 29, 9, 0, 0).unwrap();
        let next = add_calendar_days(&start, 5);

        assert_eq!(next, Paris.with_ymd_and_hms(2024, 4, 3, 9, 0, 0).unwrap());
        // The night of 31 March is an hour short.
        assert_eq!(next - start, Duration::days(5) - Duration::hours(1));
    }

    #[test]
    fn test_add_calendar_days_across_fall_back() {
        let start = Paris.with_ymd_and_hms(2024, 10, 26, 9, 0, 0).unwrap();
        let next = add_calendar_days(&start, 1);

        assert_eq!(next, Paris.with_ymd_and_hms(2024, 10, 27, 9, 0, 0).unwrap());
        assert_eq!(next - start, Duration::hours(25));
    }

    #[test]
    fn test_add_calendar_days_into_missing_hour() {
        // 02:30 on 31 March 2024 does not exist in Paris; falls back to 24h.
        let start = Paris.with_ymd_and_hms(2024, 3, 30, 2, 30, 0).unwrap();
        let next = add_calendar_days(&start, 1);

        assert_eq!(next, Paris.with_ymd_and_hms(2024, 3, 31, 3, 30, 0).unwrap());
        assert_eq!(next - start, Duration::hours(24));
    }

    #[test]
    fn test_sub_calendar_days() {
        assert_eq!(sub_calendar_days(&at(2024, 3, 1, 8), 7), at(2024, 2, 23, 8));
    }

    #[test]
    fn test_fixed_clock_advances() {
        let mut clock = FixedClock::new(at(2024, 5, 10, 8));
        assert_eq!(clock.now(), at(2024, 5, 10, 8));
        clock.advance_days(3);
        assert_eq!(clock.now(), at(2024, 5, 13, 8));
        clock.set(at(2025, 1, 1, 0));
        assert_eq!(clock.now(), at(2025, 1, 1, 0));
    }

    #[test]
    fn test_simulated_clock_offset() {
        let mut clock = SimulatedClock::new();
        clock.advance_day();
        clock.advance_day();
        assert_eq!(clock.offset_days(), 2);
        assert!(clock.now() > SystemClock.now() + Duration::days(1));
        clock.reset();
        assert_eq!(clock.offset_days(), 0);
    }

    #[test]
    fn test_relative_day_label() {
        let now = at(2024, 5, 10, 12);
        assert_eq!(relative_day_label(&at(2024, 5, 10, 1), &now), "today");
        assert_eq!(relative_day_label(&at(2024, 5, 11, 23), &now), "tomorrow");
        assert_eq!(relative_day_label(&at(2024, 5, 9, 0), &now), "yesterday");
        assert_eq!(relative_day_label(&at(2024, 5, 15, 0), &now), "in 5 days");
        assert_eq!(relative_day_label(&at(2024, 5, 7, 0), &now), "3 days ago");
        assert_eq!(relative_day_label(&at(2024, 5, 24, 0), &now), "24/05/2024");
        assert_eq!(relative_day_label(&at(2024, 4, 1, 0), &now), "01/04/2024");
    }
}
