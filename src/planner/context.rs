//! Mutable run state and precomputed index maps for a fill run.
//!
//! The run's working set is immutable except for the explicit occupancy and
//! statistics tables the orchestrator updates. Round-robin cursors and the
//! RNG live here as well, so repeated or concurrent runs stay isolated and
//! reproducible instead of sharing process-wide state.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::api::{Assignment, Mission, MissionId, Role, RoleClass, RoleId, Soldier, SoldierId};
use crate::models::time::Window;

/// Per-soldier occupied intervals for the run: assignment history near the
/// target day plus everything committed so far in this run.
#[derive(Debug, Default, Clone)]
pub struct Occupancy {
    windows: HashMap<SoldierId, Vec<Window>>,
}

impl Occupancy {
    /// Seed occupancy from stored assignments (history and locked rows).
    pub fn from_assignments(assignments: &[Assignment]) -> Self {
        let mut occ = Self::default();
        for a in assignments {
            if let Some(soldier_id) = a.soldier_id {
                occ.add(soldier_id, a.window());
            }
        }
        occ
    }

    /// Record a window as occupied, keeping the soldier's list sorted.
    pub fn add(&mut self, soldier_id: SoldierId, window: Window) {
        let windows = self.windows.entry(soldier_id).or_default();
        let at = windows.partition_point(|w| (w.start, w.end) <= (window.start, window.end));
        windows.insert(at, window);
    }

    /// True if the soldier already occupies time inside the window.
    pub fn overlaps(&self, soldier_id: SoldierId, window: &Window) -> bool {
        self.windows
            .get(&soldier_id)
            .is_some_and(|ws| ws.iter().any(|w| w.overlaps(window)))
    }

    /// End of the latest occupied interval starting before `window`.
    pub fn prev_end(&self, soldier_id: SoldierId, window: &Window) -> Option<NaiveDateTime> {
        self.windows.get(&soldier_id).and_then(|ws| {
            ws.iter()
                .filter(|w| w.start < window.start)
                .map(|w| w.end)
                .max()
        })
    }

    /// Start of the earliest occupied interval after `window` begins.
    pub fn next_start(&self, soldier_id: SoldierId, window: &Window) -> Option<NaiveDateTime> {
        self.windows.get(&soldier_id).and_then(|ws| {
            ws.iter()
                .filter(|w| w.start >= window.start)
                .map(|w| w.start)
                .min()
        })
    }

    /// Gap between the previous occupied interval and the window start.
    /// Negative when they collide.
    pub fn gap_before(&self, soldier_id: SoldierId, window: &Window) -> Option<Duration> {
        self.prev_end(soldier_id, window)
            .map(|prev_end| window.start - prev_end)
    }

    /// Gap between the window end and the next occupied interval.
    /// Negative when they collide.
    pub fn gap_after(&self, soldier_id: SoldierId, window: &Window) -> Option<Duration> {
        self.next_start(soldier_id, window)
            .map(|next_start| next_start - window.end)
    }
}

/// Explicit and free-text mission restrictions, indexed for O(1) pair checks.
#[derive(Debug, Default, Clone)]
pub struct RestrictionIndex {
    pairs: HashSet<(SoldierId, MissionId)>,
}

impl RestrictionIndex {
    pub fn new(pairs: impl IntoIterator<Item = (SoldierId, MissionId)>) -> Self {
        Self {
            pairs: pairs.into_iter().collect(),
        }
    }

    /// True if the soldier is barred from the mission, either by an explicit
    /// pair or by a case-insensitive token match against the mission name.
    pub fn is_restricted(&self, soldier: &Soldier, mission: &Mission) -> bool {
        self.pairs.contains(&(soldier.id, mission.id))
            || soldier.restricted_by_token(&mission.name)
    }
}

/// Index maps over the roster, built once per run.
///
/// Role membership is precomputed into role-id -> holder lists so seat loops
/// never walk the full roster; lists stay sorted by soldier id for
/// deterministic round-robin ordering.
#[derive(Debug, Default)]
pub struct RosterIndex {
    pub soldiers: HashMap<SoldierId, Soldier>,
    /// All soldier ids, sorted. The phase-B (generic seat) pool.
    pub all_ids: Vec<SoldierId>,
    /// Role id -> sorted ids of soldiers holding the role.
    pub role_holders: HashMap<RoleId, Vec<SoldierId>>,
    /// Role id -> role definition, for deterministic requirement ordering.
    pub roles: HashMap<RoleId, Role>,
}

impl RosterIndex {
    pub fn build(soldiers: Vec<Soldier>, roles: &[Role]) -> Self {
        let mut index = Self {
            roles: roles.iter().map(|r| (r.id, r.clone())).collect(),
            ..Self::default()
        };
        let mut all_ids: Vec<SoldierId> = soldiers.iter().map(|s| s.id).collect();
        all_ids.sort();
        index.all_ids = all_ids;

        for soldier in soldiers {
            for role_id in &soldier.role_ids {
                index.role_holders.entry(*role_id).or_default().push(soldier.id);
            }
            index.soldiers.insert(soldier.id, soldier);
        }
        for holders in index.role_holders.values_mut() {
            holders.sort();
        }
        index
    }

    pub fn soldier(&self, id: SoldierId) -> Option<&Soldier> {
        self.soldiers.get(&id)
    }

    /// The candidate pool for a role seat, or the whole roster for a generic
    /// seat. Always sorted by soldier id.
    pub fn pool(&self, role_id: Option<RoleId>) -> &[SoldierId] {
        match role_id {
            Some(role_id) => self
                .role_holders
                .get(&role_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
            None => &self.all_ids,
        }
    }

    pub fn role_name(&self, role_id: RoleId) -> &str {
        self.roles
            .get(&role_id)
            .map(|r| r.name.as_str())
            .unwrap_or("")
    }

    /// Capability class of a role; unknown ids classify as `General`.
    pub fn role_class(&self, role_id: RoleId) -> RoleClass {
        self.roles
            .get(&role_id)
            .map(|r| r.class)
            .unwrap_or(RoleClass::General)
    }
}

/// Mutable state threaded through one fill run.
pub struct PlannerContext {
    pub occupancy: Occupancy,
    pub stats: HashMap<SoldierId, super::stats::FairnessStats>,
    /// Round-robin cursor per role; `None` keys the generic-seat cursor.
    cursors: HashMap<Option<RoleId>, usize>,
    /// Present only in shuffle mode.
    pub rng: Option<StdRng>,
}

impl PlannerContext {
    pub fn new(
        occupancy: Occupancy,
        stats: HashMap<SoldierId, super::stats::FairnessStats>,
        shuffle: bool,
        seed: Option<u64>,
    ) -> Self {
        let rng = if shuffle {
            Some(match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            })
        } else {
            None
        };
        Self {
            occupancy,
            stats,
            cursors: HashMap::new(),
            rng,
        }
    }

    pub fn cursor(&self, role_id: Option<RoleId>) -> usize {
        self.cursors.get(&role_id).copied().unwrap_or(0)
    }

    /// Advance the cursor to the position after the last winner.
    pub fn advance_cursor(&mut self, role_id: Option<RoleId>, winner_index: usize, pool_len: usize) {
        if pool_len == 0 {
            return;
        }
        self.cursors.insert(role_id, (winner_index + 1) % pool_len);
    }

    /// Commit a placement: mark the window occupied and fold it into the
    /// winner's fairness statistics, including pair counts against everyone
    /// already in the same window.
    pub fn commit(
        &mut self,
        soldier_id: SoldierId,
        mission_id: MissionId,
        window: &Window,
        day: NaiveDate,
        lookback: &Window,
        fellows: &[SoldierId],
    ) {
        self.occupancy.add(soldier_id, *window);
        self.stats
            .entry(soldier_id)
            .or_default()
            .record(mission_id, window, day, lookback);
        for &fellow in fellows {
            if fellow == soldier_id {
                continue;
            }
            *self
                .stats
                .entry(soldier_id)
                .or_default()
                .pair_counts
                .entry(fellow)
                .or_insert(0) += 1;
            *self
                .stats
                .entry(fellow)
                .or_default()
                .pair_counts
                .entry(soldier_id)
                .or_insert(0) += 1;
        }
    }

    pub fn stats_for(&self, soldier_id: SoldierId) -> Option<&super::stats::FairnessStats> {
        self.stats.get(&soldier_id)
    }
}
