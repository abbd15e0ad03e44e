//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer for business logic.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    Json,
};

use super::dto::{AuditQuery, HealthResponse, RosterItem, RosterQuery, RosterResponse};
use super::error::AppError;
use super::state::AppState;
use crate::api::{Finding, FillReport, FillRequest, MissionId};
use crate::services::plan_service;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the repository
/// is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Planning
// =============================================================================

/// POST /v1/plan/fill
///
/// Run the fill engine for one day. Returns per-mission results plus the
/// newly created assignment records.
pub async fn fill_plan(
    State(state): State<AppState>,
    Json(request): Json<FillRequest>,
) -> HandlerResult<FillReport> {
    let report = plan_service::fill_plan(state.repository.as_ref(), &state.config, request).await?;
    Ok(Json(report))
}

/// GET /v1/plan/audit?day=YYYY-MM-DD
///
/// Audit a finalized day's roster and return the classified findings.
pub async fn audit_plan(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> HandlerResult<Vec<Finding>> {
    let findings =
        plan_service::audit_plan(state.repository.as_ref(), &state.config, query.day).await?;
    Ok(Json(findings))
}

// =============================================================================
// Roster
// =============================================================================

/// GET /v1/assignments/roster?day=YYYY-MM-DD&mission_id=N
///
/// List the day's assignments with display names resolved.
pub async fn roster(
    State(state): State<AppState>,
    Query(query): Query<RosterQuery>,
) -> HandlerResult<RosterResponse> {
    let repo = state.repository.as_ref();
    let mission_id = query.mission_id.map(MissionId::new);
    let rows = plan_service::day_roster(repo, query.day, mission_id).await?;

    let missions: HashMap<_, _> = repo
        .list_missions()
        .await?
        .into_iter()
        .map(|m| (m.id, m.name))
        .collect();
    let soldiers: HashMap<_, _> = repo
        .list_soldiers()
        .await?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();
    let roles: HashMap<_, _> = repo
        .list_roles()
        .await?
        .into_iter()
        .map(|r| (r.id, r.name))
        .collect();

    let items = rows
        .iter()
        .map(|a| {
            RosterItem::from_assignment(
                a,
                missions
                    .get(&a.mission_id)
                    .cloned()
                    .unwrap_or_else(|| format!("Mission {}", a.mission_id)),
                a.role_id.and_then(|r| roles.get(&r).cloned()),
                a.soldier_id
                    .and_then(|s| soldiers.get(&s).cloned())
                    .unwrap_or_default(),
            )
        })
        .collect();

    Ok(Json(RosterResponse {
        day: query.day,
        items,
    }))
}
