//! Public API surface for the roster backend.
//!
//! This file consolidates the domain entities and DTO types shared by the
//! planner, the audit engine and the HTTP layer.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::audit::{Finding, FindingKind, Severity};
pub use crate::planner::{FillReport, FillRequest, MissionBrief, MissionFillResult, SeatKey};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Mission identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MissionId(pub i64);

/// Mission slot identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotId(pub i64);

/// Role identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoleId(pub i64);

/// Soldier identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SoldierId(pub i64);

/// Vacation identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VacationId(pub i64);

/// Assignment identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssignmentId(pub i64);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            pub fn new(value: i64) -> Self {
                $name(value)
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

impl_id!(MissionId);
impl_id!(SlotId);
impl_id!(RoleId);
impl_id!(SoldierId);
impl_id!(VacationId);
impl_id!(AssignmentId);

pub use crate::models::time::{TimeBucket, Window};

/// Capability class of a role, resolved once when the roster is loaded.
///
/// The legacy system bucketed requirements by comparing role *names*; here the
/// name is classified into an enumerated tag up front. The variant order is
/// also the priority order used when reporting legacy bucket counts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleClass {
    Commander,
    Officer,
    Driver,
    General,
}

impl RoleClass {
    /// Classify a role by its display name (case-insensitive substring).
    /// Unrecognized names fall back to `General`.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("commander") {
            RoleClass::Commander
        } else if lower.contains("officer") {
            RoleClass::Officer
        } else if lower.contains("driver") {
            RoleClass::Driver
        } else {
            RoleClass::General
        }
    }
}

/// A role a soldier can hold (e.g. "Commander", "Driver", "Medic").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub class: RoleClass,
}

impl Role {
    pub fn new(id: RoleId, name: impl Into<String>) -> Self {
        let name = name.into();
        let class = RoleClass::from_name(&name);
        Self { id, name, class }
    }
}

/// A required number of seats for a specific role within each slot of a
/// mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRequirement {
    pub role_id: RoleId,
    pub count: u32,
}

/// A recurring time-of-day window within a mission.
///
/// If `end_time <= start_time` the slot is overnight and rolls into the next
/// calendar day when resolved against a concrete date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionSlot {
    pub id: SlotId,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// A recurring duty with time slots, per-role seat requirements and an
/// optional total headcount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub name: String,
    #[serde(default)]
    pub slots: Vec<MissionSlot>,
    #[serde(default)]
    pub requirements: Vec<RoleRequirement>,
    /// Total seats per slot, explicit role seats included. `None` (or a value
    /// below the sum of role requirements) means no generic seats.
    pub total_needed: Option<u32>,
}

impl Mission {
    /// Sum of explicit role-tagged seats per slot.
    pub fn role_seat_total(&self) -> u32 {
        self.requirements.iter().map(|r| r.count).sum()
    }

    /// Generic seats per slot beyond the explicit role seats.
    pub fn generic_seat_total(&self) -> u32 {
        let total = self.total_needed.unwrap_or(0);
        total.saturating_sub(self.role_seat_total())
    }
}

/// A member of the personnel pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Soldier {
    pub id: SoldierId,
    pub name: String,
    #[serde(default)]
    pub role_ids: Vec<RoleId>,
    /// Free-text restriction list; comma/semicolon separated mission-name
    /// tokens.
    #[serde(default)]
    pub restrictions: String,
}

impl Soldier {
    /// Split the free-text restriction field into trimmed, non-empty tokens.
    pub fn restriction_tokens(&self) -> Vec<&str> {
        self.restrictions
            .split([',', ';'])
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// True if the free-text restriction list names this mission
    /// (case-insensitive token match).
    pub fn restricted_by_token(&self, mission_name: &str) -> bool {
        let mission = mission_name.trim().to_lowercase();
        self.restriction_tokens()
            .iter()
            .any(|t| t.to_lowercase() == mission)
    }

    pub fn has_role(&self, role_id: RoleId) -> bool {
        self.role_ids.contains(&role_id)
    }
}

/// An absence period. Date boundaries carry half-day semantics, resolved in
/// `models::absence`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vacation {
    pub id: VacationId,
    pub soldier_id: SoldierId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// One placement of a soldier (or an open seat) into a resolved mission
/// window. Never mutated in place; a re-fill replaces the affected scope
/// wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub mission_id: MissionId,
    pub soldier_id: Option<SoldierId>,
    pub role_id: Option<RoleId>,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

impl Assignment {
    /// The resolved absolute window of this assignment.
    pub fn window(&self) -> Window {
        Window::new(self.start_at, self.end_at)
    }
}
