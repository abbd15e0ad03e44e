//! Hard eligibility constraints for one candidate against one seat window.
//!
//! Pure functions of the supplied state; the filter never mutates anything.
//! A candidate must clear every check: mission restriction, temporal
//! conflict, absence block and (in strict mode) the minimum-rest floor on
//! both sides of the window.

use chrono::Duration;

use crate::api::{Mission, Soldier, SoldierId};
use crate::config::PlannerConfig;
use crate::models::absence::AbsenceCalendar;
use crate::models::time::Window;
use crate::planner::context::{Occupancy, RestrictionIndex};

/// Rest gap between the previous occupied interval and the window, with
/// absence time discounted: time spent on leave does not count as rest.
/// `None` when the soldier has no prior occupied interval.
pub fn rested_gap_before(
    soldier_id: SoldierId,
    window: &Window,
    occupancy: &Occupancy,
    absences: &AbsenceCalendar,
) -> Option<Duration> {
    let prev_end = occupancy.prev_end(soldier_id, window)?;
    let raw = window.start - prev_end;
    if raw <= Duration::zero() {
        return Some(raw);
    }
    let gap = Window::new(prev_end, window.start);
    Some(raw - absences.blocked_overlap(soldier_id, &gap))
}

/// Rest gap between the window and the next occupied interval, absence time
/// discounted. `None` when nothing follows.
pub fn rested_gap_after(
    soldier_id: SoldierId,
    window: &Window,
    occupancy: &Occupancy,
    absences: &AbsenceCalendar,
) -> Option<Duration> {
    let next_start = occupancy.next_start(soldier_id, window)?;
    let raw = next_start - window.end;
    if raw <= Duration::zero() {
        return Some(raw);
    }
    let gap = Window::new(window.end, next_start);
    Some(raw - absences.blocked_overlap(soldier_id, &gap))
}

/// Decide whether a candidate may take a seat in the given window.
#[allow(clippy::too_many_arguments)]
pub fn is_eligible(
    soldier: &Soldier,
    mission: &Mission,
    window: &Window,
    occupancy: &Occupancy,
    absences: &AbsenceCalendar,
    restrictions: &RestrictionIndex,
    strict_rest: bool,
    config: &PlannerConfig,
) -> bool {
    if restrictions.is_restricted(soldier, mission) {
        return false;
    }
    if occupancy.overlaps(soldier.id, window) {
        return false;
    }
    if absences.is_blocked(soldier.id, window) {
        return false;
    }
    if strict_rest {
        let min_rest = config.min_rest();
        if let Some(gap) = rested_gap_before(soldier.id, window, occupancy, absences) {
            if gap < min_rest {
                return false;
            }
        }
        if let Some(gap) = rested_gap_after(soldier.id, window, occupancy, absences) {
            if gap < min_rest {
                return false;
            }
        }
    }
    true
}
