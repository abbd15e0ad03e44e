//! Request/response types specific to the HTTP surface.
//!
//! Engine-level types (`FillRequest`, `FillReport`, `Finding`) serialize
//! directly; the DTOs here cover the endpoints that enrich raw rows with
//! display names.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::api::{Assignment, AssignmentId, MissionId, RoleId, SoldierId};

/// GET /health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Query for GET /v1/plan/audit.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditQuery {
    pub day: NaiveDate,
}

/// Query for GET /v1/assignments/roster.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterQuery {
    pub day: NaiveDate,
    #[serde(default)]
    pub mission_id: Option<i64>,
}

/// Mission identity embedded in roster rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterMission {
    pub id: MissionId,
    pub name: String,
}

/// One roster row with display names resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterItem {
    pub id: AssignmentId,
    pub mission: RosterMission,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<RoleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soldier_id: Option<SoldierId>,
    pub soldier_name: String,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
}

/// GET /v1/assignments/roster response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterResponse {
    pub day: NaiveDate,
    pub items: Vec<RosterItem>,
}

impl RosterItem {
    /// Assemble a row from a stored assignment and resolved display names.
    pub fn from_assignment(
        a: &Assignment,
        mission_name: String,
        role_name: Option<String>,
        soldier_name: String,
    ) -> Self {
        Self {
            id: a.id,
            mission: RosterMission {
                id: a.mission_id,
                name: mission_name,
            },
            role: role_name,
            role_id: a.role_id,
            soldier_id: a.soldier_id,
            soldier_name,
            start_at: a.start_at,
            end_at: a.end_at,
        }
    }
}
