//! Soft fairness cost for one candidate against one seat window.
//!
//! Lower score = more preferable, the convention dispatching rules use. The
//! scorer is a weighted sum; every term is monotonic in its documented
//! direction and the weights live in [`crate::config::ScoreWeights`].

use crate::api::{MissionId, SoldierId};
use crate::config::PlannerConfig;
use crate::models::absence::AbsenceCalendar;
use crate::models::time::{hours, TimeBucket, Window};
use crate::planner::context::Occupancy;
use crate::planner::eligibility::{rested_gap_after, rested_gap_before};
use crate::planner::stats::FairnessStats;

/// Compute the fairness cost of placing `soldier_id` into `window` for
/// `mission_id`, given their statistics and everyone already placed in the
/// same window during this run.
#[allow(clippy::too_many_arguments)]
pub fn score(
    soldier_id: SoldierId,
    mission_id: MissionId,
    window: &Window,
    occupancy: &Occupancy,
    absences: &AbsenceCalendar,
    stats: Option<&FairnessStats>,
    already_placed: &[SoldierId],
    config: &PlannerConfig,
) -> f64 {
    let w = &config.weights;
    let min_rest = config.min_rest_hours;
    let mut total = 0.0;

    // Rest term. Scored defensively even for gaps the filter would reject:
    // in non-strict mode short-rest candidates are ranked, not excluded.
    match rested_gap_before(soldier_id, window, occupancy, absences) {
        None => {
            // Never worked before: well-rested by default.
            total -= w.no_history_bonus;
        }
        Some(gap) => {
            let gap_hours = hours(gap);
            if gap_hours < 0.0 {
                total += w.overlap_penalty_per_hour * -gap_hours;
            } else if gap_hours < min_rest {
                total += w.rest_shortfall_per_hour * (min_rest - gap_hours);
            } else {
                total -= w.rest_surplus_bonus_per_hour * (gap_hours - min_rest);
            }
            // Max-min rest nudge: favor the currently most-rested candidate.
            total -= w.rested_bonus_per_hour * gap_hours.max(0.0);
        }
    }

    // Avoid boxing in an already-planned later shift.
    if let Some(gap_after) = rested_gap_after(soldier_id, window, occupancy, absences) {
        let gap_hours = hours(gap_after);
        if gap_hours < min_rest {
            total += w.boxed_in_penalty_per_hour * (min_rest - gap_hours);
        }
    }

    let Some(stats) = stats else {
        return total;
    };

    // Mission rotation: repeating the same duty inside the lookback window.
    let repeats = stats.mission_count(mission_id);
    if repeats > 0 {
        total += w.repeat_mission_flat + w.repeat_mission_per_count * repeats as f64;
    }

    // Time-of-day rotation: stop handing the same person every night shift.
    total += w.bucket_repeat_per_count * stats.bucket_count(TimeBucket::of(window)) as f64;

    // Same-crew repetition against everyone already placed in this window.
    for &other in already_placed {
        if other != soldier_id {
            total += w.pair_repeat_per_count * stats.pair_count(other) as f64;
        }
    }

    // Intra-day load and rolling workload balance.
    total += w.same_day_load_per_count * stats.day_count as f64;
    total += w.workload_per_hour * stats.worked_hours;

    total
}
