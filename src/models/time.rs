//! Time handling for resolved duty windows.
//!
//! All timestamps are naive local datetimes, matching the stored assignment
//! format: a slot is a time-of-day range that only becomes an absolute
//! interval once combined with a concrete calendar day.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// A resolved absolute time interval, half-open: `[start, end)`.
///
/// Invariant: `start < end` for every window produced by slot resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Window {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Resolve a slot's time-of-day range against a concrete day.
    /// If `end <= start` the slot is overnight and the end rolls to the next
    /// calendar day.
    pub fn resolve(day: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        let start = day.and_time(start_time);
        let mut end = day.and_time(end_time);
        if end <= start {
            end += Duration::days(1); // overnight
        }
        Self { start, end }
    }

    /// The `[00:00, 00:00 next day)` bounds of a calendar day.
    pub fn day_bounds(day: NaiveDate) -> Self {
        let start = day.and_time(NaiveTime::MIN);
        Self {
            start,
            end: start + Duration::days(1),
        }
    }

    /// Check if this interval overlaps with another (half-open semantics).
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check if a given instant lies inside this interval
    /// (inclusive start, exclusive end).
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t < self.end
    }

    /// Length of the interval.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Length of the intersection with `other`; zero when disjoint.
    pub fn overlap_with(&self, other: &Self) -> Duration {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            end - start
        } else {
            Duration::zero()
        }
    }

    /// True if the window starts on the given calendar day.
    pub fn starts_on(&self, day: NaiveDate) -> bool {
        self.start.date() == day
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M")
        )
    }
}

/// Time-of-day bucket of a duty window, keyed by its start hour.
///
/// Used by the fairness scorer to rotate people out of always drawing the
/// same part of the day.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeBucket {
    Morning,
    Evening,
    Night,
}

/// Bucket boundaries, in hours: Morning [06,14), Evening [14,22),
/// Night [22,06).
const MORNING_START_HOUR: u32 = 6;
const EVENING_START_HOUR: u32 = 14;
const NIGHT_START_HOUR: u32 = 22;

impl TimeBucket {
    /// All buckets, in reporting order.
    pub const ALL: [TimeBucket; 3] = [TimeBucket::Morning, TimeBucket::Evening, TimeBucket::Night];

    /// Classify a window by its start hour.
    pub fn of(window: &Window) -> Self {
        let hour = window.start.hour();
        if (MORNING_START_HOUR..EVENING_START_HOUR).contains(&hour) {
            TimeBucket::Morning
        } else if (EVENING_START_HOUR..NIGHT_START_HOUR).contains(&hour) {
            TimeBucket::Evening
        } else {
            TimeBucket::Night
        }
    }
}

/// Convert a duration to fractional hours.
pub fn hours(d: Duration) -> f64 {
    d.num_seconds() as f64 / 3600.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_resolve_same_day() {
        let w = Window::resolve(date(2025, 3, 10), time(8, 0), time(12, 0));
        assert_eq!(w.start, date(2025, 3, 10).and_time(time(8, 0)));
        assert_eq!(w.end, date(2025, 3, 10).and_time(time(12, 0)));
        assert!(w.start < w.end);
    }

    #[test]
    fn test_resolve_overnight_rolls_end() {
        let w = Window::resolve(date(2025, 3, 10), time(22, 0), time(6, 0));
        assert_eq!(w.start, date(2025, 3, 10).and_time(time(22, 0)));
        assert_eq!(w.end, date(2025, 3, 11).and_time(time(6, 0)));
    }

    #[test]
    fn test_resolve_equal_times_is_full_day() {
        let w = Window::resolve(date(2025, 3, 10), time(8, 0), time(8, 0));
        assert_eq!(w.duration(), Duration::days(1));
    }

    #[test]
    fn test_overlap_half_open() {
        let a = Window::resolve(date(2025, 3, 10), time(8, 0), time(12, 0));
        let b = Window::resolve(date(2025, 3, 10), time(12, 0), time(16, 0));
        let c = Window::resolve(date(2025, 3, 10), time(11, 0), time(13, 0));
        assert!(!a.overlaps(&b)); // touching is not overlapping
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
    }

    #[test]
    fn test_overlap_with_length() {
        let a = Window::resolve(date(2025, 3, 10), time(8, 0), time(12, 0));
        let c = Window::resolve(date(2025, 3, 10), time(11, 0), time(13, 0));
        assert_eq!(a.overlap_with(&c), Duration::hours(1));
        let b = Window::resolve(date(2025, 3, 10), time(12, 0), time(16, 0));
        assert_eq!(a.overlap_with(&b), Duration::zero());
    }

    #[test]
    fn test_day_bounds() {
        let d = Window::day_bounds(date(2025, 3, 10));
        assert_eq!(d.duration(), Duration::days(1));
        assert!(d.contains(date(2025, 3, 10).and_time(time(23, 59))));
        assert!(!d.contains(date(2025, 3, 11).and_time(NaiveTime::MIN)));
    }

    #[test]
    fn test_time_buckets() {
        let morning = Window::resolve(date(2025, 3, 10), time(6, 0), time(14, 0));
        let evening = Window::resolve(date(2025, 3, 10), time(14, 0), time(22, 0));
        let night = Window::resolve(date(2025, 3, 10), time(22, 0), time(6, 0));
        let small_hours = Window::resolve(date(2025, 3, 10), time(2, 0), time(6, 0));
        assert_eq!(TimeBucket::of(&morning), TimeBucket::Morning);
        assert_eq!(TimeBucket::of(&evening), TimeBucket::Evening);
        assert_eq!(TimeBucket::of(&night), TimeBucket::Night);
        assert_eq!(TimeBucket::of(&small_hours), TimeBucket::Night);
    }

    #[test]
    fn test_hours_conversion() {
        assert_eq!(hours(Duration::minutes(90)), 1.5);
    }
}
