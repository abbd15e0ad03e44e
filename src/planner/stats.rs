//! Fairness statistics derived from assignment history.
//!
//! Statistics are scoped to the fairness lookback window (default 14 days
//! before the target day) and updated incrementally as the orchestrator
//! commits seats, so later seats in the same run see the effects of earlier
//! placements.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::api::{Assignment, MissionId, SoldierId};
use crate::models::time::{hours, TimeBucket, Window};

/// Per-soldier aggregates over the lookback window.
#[derive(Debug, Default, Clone)]
pub struct FairnessStats {
    /// Assignments overlapping the target day.
    pub day_count: u32,
    /// Worked hours clipped to the lookback window.
    pub worked_hours: f64,
    /// Assignment count per mission inside the window.
    pub mission_counts: HashMap<MissionId, u32>,
    /// Duty count per time-of-day bucket.
    pub bucket_counts: HashMap<TimeBucket, u32>,
    /// Times this soldier shared a mission window with each other soldier.
    pub pair_counts: HashMap<SoldierId, u32>,
}

impl FairnessStats {
    pub fn mission_count(&self, mission_id: MissionId) -> u32 {
        self.mission_counts.get(&mission_id).copied().unwrap_or(0)
    }

    pub fn worked_mission_recently(&self, mission_id: MissionId) -> bool {
        self.mission_count(mission_id) > 0
    }

    pub fn bucket_count(&self, bucket: TimeBucket) -> u32 {
        self.bucket_counts.get(&bucket).copied().unwrap_or(0)
    }

    pub fn pair_count(&self, other: SoldierId) -> u32 {
        self.pair_counts.get(&other).copied().unwrap_or(0)
    }

    /// Fold one duty window into the aggregates.
    pub fn record(&mut self, mission_id: MissionId, window: &Window, day: NaiveDate, lookback: &Window) {
        if window.overlaps(&Window::day_bounds(day)) {
            self.day_count += 1;
        }
        self.worked_hours += hours(window.overlap_with(lookback));
        *self.mission_counts.entry(mission_id).or_insert(0) += 1;
        *self.bucket_counts.entry(TimeBucket::of(window)).or_insert(0) += 1;
    }
}

/// Build per-soldier statistics from assignment history.
///
/// `history` is every stored assignment overlapping the lookback window;
/// co-assignment pairs are derived from identical (mission, window) groups,
/// the same grouping the legacy mission-history view used.
pub fn build_stats(
    history: &[Assignment],
    day: NaiveDate,
    lookback: &Window,
) -> HashMap<SoldierId, FairnessStats> {
    let mut stats: HashMap<SoldierId, FairnessStats> = HashMap::new();

    for a in history {
        let Some(soldier_id) = a.soldier_id else {
            continue; // open seats carry no fairness weight
        };
        let window = a.window();
        if !window.overlaps(lookback) {
            continue;
        }
        stats
            .entry(soldier_id)
            .or_default()
            .record(a.mission_id, &window, day, lookback);
    }

    // Pairwise co-assignment counts: soldiers sharing the exact same
    // (mission, window) crewed together once.
    let mut crews: HashMap<(MissionId, Window), Vec<SoldierId>> = HashMap::new();
    for a in history {
        let Some(soldier_id) = a.soldier_id else {
            continue;
        };
        let window = a.window();
        if !window.overlaps(lookback) {
            continue;
        }
        crews.entry((a.mission_id, window)).or_default().push(soldier_id);
    }
    for crew in crews.values() {
        for (i, &left) in crew.iter().enumerate() {
            for &right in &crew[i + 1..] {
                if left == right {
                    continue;
                }
                *stats.entry(left).or_default().pair_counts.entry(right).or_insert(0) += 1;
                *stats.entry(right).or_default().pair_counts.entry(left).or_insert(0) += 1;
            }
        }
    }

    stats
}
