//! HTTP-surface tests: handler behavior and wire-format stability.

#![cfg(feature = "http-server")]

mod support;

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;

use roster_rust::api::{FillRequest, MissionId, SoldierId};
use roster_rust::config::PlannerConfig;
use roster_rust::db::repository::FullRepository;
use roster_rust::db::LocalRepository;
use roster_rust::http::dto::{AuditQuery, RosterQuery};
use roster_rust::http::{create_router, handlers, AppError, AppState};

use support::*;

fn state_with(repo: LocalRepository) -> AppState {
    AppState::new(
        Arc::new(repo) as Arc<dyn FullRepository>,
        PlannerConfig::default(),
    )
}

#[test]
fn test_router_builds_with_all_routes() {
    let _router = create_router(state_with(LocalRepository::new()));
}

#[tokio::test]
async fn test_health_reports_connected() {
    let Json(health) = handlers::health_check(State(state_with(LocalRepository::new())))
        .await
        .unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.database, "connected");
}

#[tokio::test]
async fn test_fill_endpoint_round_trip() {
    let repo = garrison_repo();
    repo.upsert_mission(mission(
        1,
        "Gate",
        vec![slot(1, t(8, 0), t(12, 0))],
        vec![requirement(1, 1)],
        Some(2),
    ));
    let state = state_with(repo);

    // The request wire format: day plus defaults.
    let request: FillRequest =
        serde_json::from_str(r#"{"day": "2025-03-10"}"#).unwrap();
    assert!(request.replace);
    assert!(request.strict_rest);
    assert!(!request.shuffle);

    let Json(report) = handlers::fill_plan(State(state), Json(request)).await.unwrap();
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].created_count, Some(2));

    // Error-less results serialize without an "error" key.
    let json = serde_json::to_value(&report).unwrap();
    assert!(json["results"][0].get("error").is_none());
}

#[tokio::test]
async fn test_fill_unknown_mission_maps_to_bad_request() {
    let state = state_with(LocalRepository::new());
    let mut request = FillRequest::for_day(date(2025, 3, 10));
    request.mission_ids = Some(vec![MissionId::new(9)]);

    let err = handlers::fill_plan(State(state), Json(request)).await.unwrap_err();
    let response = axum::response::IntoResponse::into_response(err);
    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_audit_endpoint_serializes_findings() {
    let repo = LocalRepository::new();
    repo.upsert_mission(mission(10, "Gate", vec![], vec![], None));
    repo.upsert_soldier(soldier(1, "Adam", vec![], "gate"));
    repo.store_assignment(stored_assignment(
        1,
        10,
        Some(1),
        None,
        at(date(2025, 3, 10), 8, 0),
        at(date(2025, 3, 10), 12, 0),
    ));
    let state = state_with(repo);

    let Json(findings) = handlers::audit_plan(
        State(state),
        Query(AuditQuery {
            day: date(2025, 3, 10),
        }),
    )
    .await
    .unwrap();

    assert_eq!(findings.len(), 1);
    let json = serde_json::to_value(&findings).unwrap();
    assert_eq!(json[0]["kind"], "RESTRICTED");
    assert_eq!(json[0]["severity"], "ORANGE");
    assert_eq!(json[0]["soldier_name"], "Adam");
}

#[tokio::test]
async fn test_roster_endpoint_resolves_names() {
    let repo = garrison_repo();
    repo.upsert_mission(mission(1, "Gate", vec![], vec![], None));
    repo.store_assignment(stored_assignment(
        1,
        1,
        Some(1),
        Some(1),
        at(date(2025, 3, 10), 8, 0),
        at(date(2025, 3, 10), 12, 0),
    ));
    let state = state_with(repo);

    let Json(roster) = handlers::roster(
        State(state),
        Query(RosterQuery {
            day: date(2025, 3, 10),
            mission_id: None,
        }),
    )
    .await
    .unwrap();

    assert_eq!(roster.items.len(), 1);
    let item = &roster.items[0];
    assert_eq!(item.mission.name, "Gate");
    assert_eq!(item.soldier_name, "Soldier 1");
    assert_eq!(item.role.as_deref(), Some("Commander"));
    assert_eq!(item.soldier_id, Some(SoldierId::new(1)));
}

#[tokio::test]
async fn test_roster_unknown_mission_maps_to_not_found() {
    let state = state_with(LocalRepository::new());
    let err = handlers::roster(
        State(state),
        Query(RosterQuery {
            day: date(2025, 3, 10),
            mission_id: Some(7),
        }),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Repository(_)));
    let response = axum::response::IntoResponse::into_response(err);
    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}
