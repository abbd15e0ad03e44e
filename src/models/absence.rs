//! Vacation ranges resolved into absolute blocked intervals.
//!
//! A vacation blocks time with half-day boundary semantics: days strictly
//! inside the range are fully blocked, the first day only from the cut-over
//! hour onward and the last day only until the cut-over hour (the soldier
//! leaves mid-day and returns mid-day). A single-day vacation is the union of
//! both boundary rules, i.e. the whole day.

use std::collections::HashMap;

use chrono::{Duration, NaiveTime};

use crate::api::{SoldierId, Vacation};
use crate::models::time::Window;

/// Resolve one vacation range into its absolute blocked interval.
pub fn blocked_window(vacation: &Vacation, cutover: NaiveTime) -> Window {
    if vacation.start_date == vacation.end_date {
        return Window::day_bounds(vacation.start_date);
    }
    Window::new(
        vacation.start_date.and_time(cutover),
        vacation.end_date.and_time(cutover),
    )
}

/// Pre-resolved absence blocks for a run, indexed by soldier.
///
/// Built once from the vacation table before filling or auditing; lookups
/// during the placement loop are pure map reads.
#[derive(Debug, Default, Clone)]
pub struct AbsenceCalendar {
    blocks: HashMap<SoldierId, Vec<Window>>,
}

impl AbsenceCalendar {
    /// Resolve all vacations into per-soldier blocked intervals.
    pub fn resolve(vacations: &[Vacation], cutover: NaiveTime) -> Self {
        let mut blocks: HashMap<SoldierId, Vec<Window>> = HashMap::new();
        for v in vacations {
            if v.end_date < v.start_date {
                // Inverted ranges cannot block anything; skip rather than fail.
                log::warn!(
                    "ignoring inverted vacation {} for soldier {}",
                    v.id,
                    v.soldier_id
                );
                continue;
            }
            blocks
                .entry(v.soldier_id)
                .or_default()
                .push(blocked_window(v, cutover));
        }
        for windows in blocks.values_mut() {
            windows.sort_by_key(|w| (w.start, w.end));
        }
        Self { blocks }
    }

    /// True if any blocked interval of the soldier overlaps the window.
    pub fn is_blocked(&self, soldier_id: SoldierId, window: &Window) -> bool {
        self.blocks
            .get(&soldier_id)
            .is_some_and(|ws| ws.iter().any(|w| w.overlaps(window)))
    }

    /// Total blocked time of the soldier inside the given interval.
    ///
    /// Used to discount absence from rest gaps: time spent on leave does not
    /// count as rest.
    pub fn blocked_overlap(&self, soldier_id: SoldierId, window: &Window) -> Duration {
        self.blocks
            .get(&soldier_id)
            .map(|ws| {
                ws.iter()
                    .fold(Duration::zero(), |acc, w| acc + w.overlap_with(window))
            })
            .unwrap_or_else(Duration::zero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::VacationId;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn vacation(soldier: i64, start: NaiveDate, end: NaiveDate) -> Vacation {
        Vacation {
            id: VacationId::new(1),
            soldier_id: SoldierId::new(soldier),
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn test_multi_day_blocks_cutover_to_cutover() {
        let v = vacation(1, date(2025, 3, 10), date(2025, 3, 12));
        let w = blocked_window(&v, time(12, 0));
        assert_eq!(w.start, date(2025, 3, 10).and_time(time(12, 0)));
        assert_eq!(w.end, date(2025, 3, 12).and_time(time(12, 0)));
    }

    #[test]
    fn test_single_day_blocks_whole_day() {
        let v = vacation(1, date(2025, 3, 10), date(2025, 3, 10));
        let w = blocked_window(&v, time(12, 0));
        assert_eq!(w, Window::day_bounds(date(2025, 3, 10)));
    }

    #[test]
    fn test_boundary_day_half_free() {
        let cal = AbsenceCalendar::resolve(
            &[vacation(1, date(2025, 3, 10), date(2025, 3, 12))],
            time(12, 0),
        );
        let sid = SoldierId::new(1);

        // Morning of the first day is still free.
        let morning = Window::resolve(date(2025, 3, 10), time(6, 0), time(11, 0));
        assert!(!cal.is_blocked(sid, &morning));

        // Afternoon of the first day is blocked.
        let afternoon = Window::resolve(date(2025, 3, 10), time(13, 0), time(18, 0));
        assert!(cal.is_blocked(sid, &afternoon));

        // Afternoon of the last day is free again.
        let return_shift = Window::resolve(date(2025, 3, 12), time(14, 0), time(20, 0));
        assert!(!cal.is_blocked(sid, &return_shift));

        // A day strictly inside is fully blocked.
        let inside = Window::resolve(date(2025, 3, 11), time(2, 0), time(4, 0));
        assert!(cal.is_blocked(sid, &inside));
    }

    #[test]
    fn test_blocked_overlap_discount() {
        let cal = AbsenceCalendar::resolve(
            &[vacation(1, date(2025, 3, 10), date(2025, 3, 10))],
            time(12, 0),
        );
        // Gap spanning the evening of the 10th and the morning of the 11th:
        // only the part inside the 10th counts as blocked.
        let gap = Window::new(
            date(2025, 3, 10).and_time(time(20, 0)),
            date(2025, 3, 11).and_time(time(8, 0)),
        );
        assert_eq!(
            cal.blocked_overlap(SoldierId::new(1), &gap),
            Duration::hours(4)
        );
        assert_eq!(
            cal.blocked_overlap(SoldierId::new(2), &gap),
            Duration::zero()
        );
    }

    #[test]
    fn test_inverted_range_is_ignored() {
        let cal = AbsenceCalendar::resolve(
            &[vacation(1, date(2025, 3, 12), date(2025, 3, 10))],
            time(12, 0),
        );
        let w = Window::day_bounds(date(2025, 3, 11));
        assert!(!cal.is_blocked(SoldierId::new(1), &w));
    }
}
