//! The fill engine.
//!
//! A greedy, constraint-aware, score-ranked allocator that assigns people to
//! duty seats for one calendar day:
//!
//! - [`eligibility`]: hard pass/fail constraints (restrictions, temporal
//!   conflicts, absence, minimum rest).
//! - [`scoring`]: soft fairness cost; lower is preferred.
//! - [`ranking`]: composes filter and scorer over a candidate pool with a
//!   round-robin tie-break and an optional seeded shuffle pick.
//! - [`fill`]: the per-mission orchestrator (explicit role seats first, then
//!   generic seats up to the total headcount).
//! - [`stats`] / [`context`]: fairness statistics and the mutable run state
//!   (occupancy, cursors, RNG) threaded through a run explicitly.
//!
//! The engine is a single-threaded batch computation: all inputs are fetched
//! up front and the placement loop performs no I/O. Infeasible seats are left
//! empty; there is no backtracking.

pub mod context;
pub mod eligibility;
pub mod fill;
pub mod ranking;
pub mod scoring;
pub mod stats;


pub use context::{Occupancy, PlannerContext, RestrictionIndex, RosterIndex};
pub use fill::{fill_mission, FillOptions};
pub use ranking::{pick, rank, RankedCandidate};
pub use stats::{build_stats, FairnessStats};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::{Assignment, AssignmentId, MissionId, RoleId};
use crate::models::time::Window;

/// Identifies one seat of a resolved slot so that re-running a fill with the
/// same exclusions reproducibly skips the same seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatKey {
    pub mission_id: MissionId,
    /// `None` marks a generic (role-less) seat.
    pub role_id: Option<RoleId>,
    pub window: Window,
    /// Ordinal of the seat within its (mission, role, window) group.
    pub position: u32,
}

/// Fill request for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillRequest {
    pub day: NaiveDate,
    /// Optional mission subset; `None` fills every mission.
    #[serde(default)]
    pub mission_ids: Option<Vec<MissionId>>,
    /// Clear the day's scope (minus locked assignments) before filling.
    #[serde(default = "default_true")]
    pub replace: bool,
    /// Exclude candidates that would land below the minimum-rest floor.
    #[serde(default = "default_true")]
    pub strict_rest: bool,
    /// Draw winners from the top slice instead of always taking the best.
    #[serde(default)]
    pub shuffle: bool,
    /// RNG seed for reproducible shuffle picks.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Seats to leave empty.
    #[serde(default)]
    pub excluded_seats: Vec<SeatKey>,
    /// Assignments that survive a replace run and are never re-chosen.
    #[serde(default)]
    pub locked_assignment_ids: Vec<AssignmentId>,
}

fn default_true() -> bool {
    true
}

impl FillRequest {
    /// A plain replace-mode request for one day with default flags.
    pub fn for_day(day: NaiveDate) -> Self {
        Self {
            day,
            mission_ids: None,
            replace: true,
            strict_rest: true,
            shuffle: false,
            seed: None,
            excluded_seats: Vec::new(),
            locked_assignment_ids: Vec::new(),
        }
    }
}

/// Mission identity echoed in fill results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionBrief {
    pub id: MissionId,
    pub name: String,
}

/// Per-mission outcome of a fill run. A mission either reports how many
/// assignments were created or an error string; failures never abort the
/// rest of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionFillResult {
    pub mission: MissionBrief,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Complete outcome of a fill run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillReport {
    pub day: NaiveDate,
    pub results: Vec<MissionFillResult>,
    /// The newly created assignment records across all missions.
    pub created: Vec<Assignment>,
}
