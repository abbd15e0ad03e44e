//! End-to-end fill runs against the in-memory repository, checking the
//! engine's hard invariants and run-level behaviors (determinism, seat
//! exclusion, locked assignments, per-mission failure isolation).

mod support;

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};

use roster_rust::api::{
    Assignment, AssignmentId, Mission, MissionId, Role, RoleId, Soldier, SoldierId, Vacation,
    Window,
};
use roster_rust::config::PlannerConfig;
use roster_rust::db::repository::{
    AssignmentRepository, NewAssignment, RepositoryError, RepositoryResult, RosterRepository,
};
use roster_rust::db::LocalRepository;
use roster_rust::planner::{FillRequest, SeatKey};
use roster_rust::services::fill_plan;

use support::*;

fn day() -> NaiveDate {
    date(2025, 3, 10)
}

fn config() -> PlannerConfig {
    PlannerConfig::default()
}

/// Gate runs three back-to-back shifts needing a commander plus one generic
/// seat; Patrol needs one driver for a morning window.
fn seed_garrison_plan(repo: &LocalRepository) {
    repo.upsert_mission(mission(
        1,
        "Gate",
        vec![
            slot(1, t(6, 0), t(14, 0)),
            slot(2, t(14, 0), t(22, 0)),
            slot(3, t(22, 0), t(6, 0)),
        ],
        vec![requirement(1, 1)],
        Some(2),
    ));
    repo.upsert_mission(mission(
        2,
        "Patrol",
        vec![slot(4, t(8, 0), t(12, 0))],
        vec![requirement(2, 1)],
        Some(1),
    ));
    // Soldier 6 is on leave, soldier 7 is token-restricted from Gate, and
    // driver 4 is pair-restricted from Patrol.
    repo.upsert_vacation(vacation(1, 6, day(), day()));
    repo.upsert_soldier(soldier(7, "Soldier 7", vec![], "gate"));
    repo.add_restriction_pair(SoldierId::new(4), MissionId::new(2));
}

fn windows_by_soldier(assignments: &[Assignment]) -> HashMap<SoldierId, Vec<Window>> {
    let mut map: HashMap<SoldierId, Vec<Window>> = HashMap::new();
    for a in assignments {
        if let Some(sid) = a.soldier_id {
            map.entry(sid).or_default().push(a.window());
        }
    }
    map
}

#[tokio::test]
async fn test_fill_respects_all_hard_invariants() {
    let repo = garrison_repo();
    seed_garrison_plan(&repo);

    let report = fill_plan(&repo, &config(), FillRequest::for_day(day()))
        .await
        .unwrap();

    assert!(report.results.iter().all(|r| r.error.is_none()));
    let gate = &report.results[0];
    let patrol = &report.results[1];
    assert_eq!(gate.created_count, Some(6), "all six Gate seats should fill");
    assert_eq!(patrol.created_count, Some(1));

    // No soldier holds two overlapping windows, and in strict mode every
    // neighboring pair of duties is at least the minimum rest apart.
    for (sid, windows) in windows_by_soldier(&report.created) {
        for (i, a) in windows.iter().enumerate() {
            for b in &windows[i + 1..] {
                assert!(!a.overlaps(b), "soldier {} double-booked", sid);
                let gap = if a.start < b.start {
                    b.start - a.end
                } else {
                    a.start - b.end
                };
                assert!(
                    gap >= Duration::hours(8),
                    "soldier {} rests only {:?}",
                    sid,
                    gap
                );
            }
        }
    }

    // Vacationer and restricted soldiers never appear where they must not.
    for a in &report.created {
        assert_ne!(a.soldier_id, Some(SoldierId::new(6)), "vacationer assigned");
        if a.mission_id == MissionId::new(1) {
            assert_ne!(a.soldier_id, Some(SoldierId::new(7)), "token restriction ignored");
        }
        if a.mission_id == MissionId::new(2) {
            assert_ne!(a.soldier_id, Some(SoldierId::new(4)), "pair restriction ignored");
        }
    }

    // Role seats carry the role tag, generic seats do not.
    let gate_roles = report
        .created
        .iter()
        .filter(|a| a.mission_id == MissionId::new(1) && a.role_id.is_some())
        .count();
    assert_eq!(gate_roles, 3, "one commander per Gate shift");
}

#[tokio::test]
async fn test_role_seats_then_generic_headcount() {
    let repo = LocalRepository::new();
    repo.upsert_role(Role::new(RoleId::new(1), "Commander"));
    for i in 1..=2i64 {
        repo.upsert_soldier(soldier(i, &format!("Commander {}", i), vec![1], ""));
    }
    for i in 3..=7i64 {
        repo.upsert_soldier(soldier(i, &format!("Soldier {}", i), vec![], ""));
    }
    repo.upsert_mission(mission(
        1,
        "Outpost",
        vec![slot(1, t(8, 0), t(16, 0))],
        vec![requirement(1, 2)],
        Some(3),
    ));

    let report = fill_plan(&repo, &config(), FillRequest::for_day(day()))
        .await
        .unwrap();

    assert_eq!(report.results[0].created_count, Some(3));
    let tagged: HashSet<_> = report
        .created
        .iter()
        .filter(|a| a.role_id == Some(RoleId::new(1)))
        .filter_map(|a| a.soldier_id)
        .collect();
    assert_eq!(tagged, [SoldierId::new(1), SoldierId::new(2)].into());
    assert_eq!(
        report.created.iter().filter(|a| a.role_id.is_none()).count(),
        1
    );
}

#[tokio::test]
async fn test_replace_with_fixed_seed_is_deterministic() {
    let repo = garrison_repo();
    seed_garrison_plan(&repo);

    let request = || {
        let mut r = FillRequest::for_day(day());
        r.shuffle = true;
        r.seed = Some(42);
        r
    };

    let first = fill_plan(&repo, &config(), request()).await.unwrap();
    let second = fill_plan(&repo, &config(), request()).await.unwrap();

    let key = |a: &Assignment| (a.mission_id, a.soldier_id, a.role_id, a.start_at, a.end_at);
    let mut first_keys: Vec<_> = first.created.iter().map(key).collect();
    let mut second_keys: Vec<_> = second.created.iter().map(key).collect();
    first_keys.sort();
    second_keys.sort();
    assert_eq!(first_keys, second_keys);

    // The second run replaced the first wholesale.
    assert_eq!(repo.assignment_count(), second.created.len());
}

#[tokio::test]
async fn test_shuffle_still_satisfies_constraints() {
    let repo = garrison_repo();
    seed_garrison_plan(&repo);

    let mut request = FillRequest::for_day(day());
    request.shuffle = true;
    request.seed = Some(7);
    let report = fill_plan(&repo, &config(), request).await.unwrap();

    for (sid, windows) in windows_by_soldier(&report.created) {
        for (i, a) in windows.iter().enumerate() {
            for b in &windows[i + 1..] {
                assert!(!a.overlaps(b), "soldier {} double-booked in shuffle mode", sid);
            }
        }
    }
}

#[tokio::test]
async fn test_excluded_seat_is_reproducibly_skipped() {
    let repo = garrison_repo();
    repo.upsert_mission(mission(
        1,
        "Watchtower",
        vec![slot(1, t(8, 0), t(12, 0))],
        vec![],
        Some(2),
    ));

    let window = Window::resolve(day(), t(8, 0), t(12, 0));
    let excluded = SeatKey {
        mission_id: MissionId::new(1),
        role_id: None,
        window,
        position: 1,
    };

    let mut request = FillRequest::for_day(day());
    request.excluded_seats = vec![excluded];
    let report = fill_plan(&repo, &config(), request.clone()).await.unwrap();
    assert_eq!(report.results[0].created_count, Some(1));

    // Re-running with the same exclusion skips the same seat again.
    let again = fill_plan(&repo, &config(), request).await.unwrap();
    assert_eq!(again.results[0].created_count, Some(1));

    // Without the exclusion both seats fill.
    let full = fill_plan(&repo, &config(), FillRequest::for_day(day()))
        .await
        .unwrap();
    assert_eq!(full.results[0].created_count, Some(2));
}

#[tokio::test]
async fn test_locked_assignment_survives_replace_and_blocks_rechoice() {
    let repo = garrison_repo();
    repo.upsert_mission(mission(
        1,
        "Gate",
        vec![slot(1, t(8, 0), t(12, 0))],
        vec![requirement(1, 1)],
        Some(2),
    ));
    let window = Window::resolve(day(), t(8, 0), t(12, 0));
    repo.store_assignment(stored_assignment(
        100,
        1,
        Some(1),
        Some(1),
        window.start,
        window.end,
    ));

    let mut request = FillRequest::for_day(day());
    request.locked_assignment_ids = vec![AssignmentId::new(100)];
    let report = fill_plan(&repo, &config(), request).await.unwrap();

    // The locked commander seat is preserved; only the generic seat fills.
    assert_eq!(report.results[0].created_count, Some(1));
    assert!(report.created.iter().all(|a| a.id != AssignmentId::new(100)));
    assert!(report
        .created
        .iter()
        .all(|a| a.soldier_id != Some(SoldierId::new(1))));

    let locked = repo.fetch_assignment(AssignmentId::new(100)).await.unwrap();
    assert_eq!(locked.soldier_id, Some(SoldierId::new(1)));
    assert_eq!(repo.assignment_count(), 2);
}

#[tokio::test]
async fn test_vacation_boundary_half_day() {
    let repo = garrison_repo();
    repo.upsert_mission(mission(
        1,
        "Gate",
        vec![slot(1, t(6, 0), t(10, 0)), slot(2, t(14, 0), t(18, 0))],
        vec![],
        Some(1),
    ));
    // Everyone but soldier 8 is away; soldier 8's own leave starts today at
    // the cut-over, so the morning slot is workable and the afternoon is not.
    for i in 1..=7i64 {
        repo.upsert_vacation(vacation(i, i, day() - Duration::days(1), day() + Duration::days(1)));
    }
    repo.upsert_vacation(vacation(8, 8, day(), day() + Duration::days(2)));

    let report = fill_plan(&repo, &config(), FillRequest::for_day(day()))
        .await
        .unwrap();

    let morning: Vec<_> = report
        .created
        .iter()
        .filter(|a| a.start_at == day().and_time(t(6, 0)))
        .collect();
    let afternoon: Vec<_> = report
        .created
        .iter()
        .filter(|a| a.start_at == day().and_time(t(14, 0)))
        .collect();
    assert_eq!(morning.len(), 1);
    assert_eq!(morning[0].soldier_id, Some(SoldierId::new(8)));
    assert!(afternoon.is_empty(), "cut-over half-day must stay blocked");
}

/// Repository wrapper whose assignment inserts fail for one mission,
/// simulating a constraint violation caught at persist time.
struct FlakyRepo {
    inner: LocalRepository,
    failing_mission: MissionId,
}

#[async_trait]
impl RosterRepository for FlakyRepo {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.inner.health_check().await
    }
    async fn list_missions(&self) -> RepositoryResult<Vec<Mission>> {
        self.inner.list_missions().await
    }
    async fn fetch_mission(&self, id: MissionId) -> RepositoryResult<Mission> {
        self.inner.fetch_mission(id).await
    }
    async fn list_soldiers(&self) -> RepositoryResult<Vec<Soldier>> {
        self.inner.list_soldiers().await
    }
    async fn list_roles(&self) -> RepositoryResult<Vec<Role>> {
        self.inner.list_roles().await
    }
    async fn list_vacations(&self) -> RepositoryResult<Vec<Vacation>> {
        self.inner.list_vacations().await
    }
    async fn list_restriction_pairs(&self) -> RepositoryResult<Vec<(SoldierId, MissionId)>> {
        self.inner.list_restriction_pairs().await
    }
}

#[async_trait]
impl AssignmentRepository for FlakyRepo {
    async fn list_assignments_overlapping(
        &self,
        window: Window,
    ) -> RepositoryResult<Vec<Assignment>> {
        self.inner.list_assignments_overlapping(window).await
    }
    async fn list_assignments_starting_on(
        &self,
        day: NaiveDate,
    ) -> RepositoryResult<Vec<Assignment>> {
        self.inner.list_assignments_starting_on(day).await
    }
    async fn fetch_assignment(&self, id: AssignmentId) -> RepositoryResult<Assignment> {
        self.inner.fetch_assignment(id).await
    }
    async fn clear_day(
        &self,
        day: NaiveDate,
        mission_ids: Option<&[MissionId]>,
        locked_ids: &[AssignmentId],
    ) -> RepositoryResult<usize> {
        self.inner.clear_day(day, mission_ids, locked_ids).await
    }
    async fn insert_assignments(
        &self,
        rows: Vec<NewAssignment>,
    ) -> RepositoryResult<Vec<Assignment>> {
        if rows.iter().any(|r| r.mission_id == self.failing_mission) {
            return Err(RepositoryError::conflict(
                "Duplicate assignment blocked by constraints",
            ));
        }
        self.inner.insert_assignments(rows).await
    }
}

#[tokio::test]
async fn test_mission_failure_is_isolated() {
    let inner = garrison_repo();
    inner.upsert_mission(mission(1, "Gate", vec![slot(1, t(8, 0), t(12, 0))], vec![], Some(1)));
    inner.upsert_mission(mission(2, "Patrol", vec![slot(2, t(14, 0), t(18, 0))], vec![], Some(1)));
    let repo = FlakyRepo {
        inner,
        failing_mission: MissionId::new(2),
    };

    let report = fill_plan(&repo, &config(), FillRequest::for_day(day()))
        .await
        .unwrap();

    let gate = &report.results[0];
    let patrol = &report.results[1];
    assert_eq!(gate.created_count, Some(1));
    assert!(gate.error.is_none());
    assert!(patrol.created_count.is_none());
    assert!(patrol.error.as_deref().unwrap_or("").contains("Duplicate"));
    // Only Gate's rows were persisted.
    assert!(report.created.iter().all(|a| a.mission_id == MissionId::new(1)));
}
