//! In-memory repository backend.
//!
//! Holds the whole roster behind a single `parking_lot::RwLock`, which also
//! gives fill runs the write-exclusivity §5-style single-writer semantics
//! require: a batch insert takes the write lock once and is therefore atomic
//! with respect to every other operation.
//!
//! Reference data enters through the `upsert_*` seed methods (entity CRUD is
//! owned by external collaborators); assignments enter through the
//! [`AssignmentRepository`] write operations.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;

use crate::api::{
    Assignment, AssignmentId, Mission, MissionId, Role, Soldier, SoldierId, Vacation,
};
use crate::db::repository::error::{ErrorContext, RepositoryError, RepositoryResult};
use crate::db::repository::{AssignmentRepository, NewAssignment, RosterRepository};
use crate::models::time::Window;

#[derive(Default)]
struct Inner {
    missions: BTreeMap<i64, Mission>,
    soldiers: BTreeMap<i64, Soldier>,
    roles: BTreeMap<i64, Role>,
    vacations: BTreeMap<i64, Vacation>,
    restriction_pairs: HashSet<(SoldierId, MissionId)>,
    assignments: BTreeMap<i64, Assignment>,
    next_assignment_id: i64,
}

/// In-memory repository for testing, local development and embedding.
#[derive(Default)]
pub struct LocalRepository {
    inner: RwLock<Inner>,
}

impl LocalRepository {
    /// Create a new, empty repository.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_assignment_id: 1,
                ..Default::default()
            }),
        }
    }

    /// Insert or replace a mission definition.
    pub fn upsert_mission(&self, mission: Mission) {
        self.inner.write().missions.insert(mission.id.value(), mission);
    }

    /// Insert or replace a soldier.
    pub fn upsert_soldier(&self, soldier: Soldier) {
        self.inner.write().soldiers.insert(soldier.id.value(), soldier);
    }

    /// Insert or replace a role.
    pub fn upsert_role(&self, role: Role) {
        self.inner.write().roles.insert(role.id.value(), role);
    }

    /// Insert or replace a vacation range.
    pub fn upsert_vacation(&self, vacation: Vacation) {
        self.inner.write().vacations.insert(vacation.id.value(), vacation);
    }

    /// Record an explicit (soldier, mission) restriction pair.
    pub fn add_restriction_pair(&self, soldier_id: SoldierId, mission_id: MissionId) {
        self.inner.write().restriction_pairs.insert((soldier_id, mission_id));
    }

    /// Store an assignment verbatim, keeping its id (used to seed stored
    /// plans, e.g. manually edited rosters for audit scenarios).
    pub fn store_assignment(&self, assignment: Assignment) {
        let mut inner = self.inner.write();
        inner.next_assignment_id = inner.next_assignment_id.max(assignment.id.value() + 1);
        inner.assignments.insert(assignment.id.value(), assignment);
    }

    /// Number of stored assignments.
    pub fn assignment_count(&self) -> usize {
        self.inner.read().assignments.len()
    }
}

/// Ordering key matching the legacy roster listing: mission, start time,
/// role-tagged rows before generic ones.
fn roster_order(a: &Assignment) -> (i64, chrono::NaiveDateTime, bool, i64) {
    (
        a.mission_id.value(),
        a.start_at,
        a.role_id.is_none(),
        a.role_id.map(|r| r.value()).unwrap_or(i64::MAX),
    )
}

#[async_trait]
impl RosterRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }

    async fn list_missions(&self) -> RepositoryResult<Vec<Mission>> {
        Ok(self.inner.read().missions.values().cloned().collect())
    }

    async fn fetch_mission(&self, id: MissionId) -> RepositoryResult<Mission> {
        self.inner.read().missions.get(&id.value()).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Mission {} does not exist", id),
                ErrorContext::new("fetch_mission")
                    .with_entity("mission")
                    .with_entity_id(id),
            )
        })
    }

    async fn list_soldiers(&self) -> RepositoryResult<Vec<Soldier>> {
        Ok(self.inner.read().soldiers.values().cloned().collect())
    }

    async fn list_roles(&self) -> RepositoryResult<Vec<Role>> {
        Ok(self.inner.read().roles.values().cloned().collect())
    }

    async fn list_vacations(&self) -> RepositoryResult<Vec<Vacation>> {
        Ok(self.inner.read().vacations.values().cloned().collect())
    }

    async fn list_restriction_pairs(&self) -> RepositoryResult<Vec<(SoldierId, MissionId)>> {
        let mut pairs: Vec<_> = self.inner.read().restriction_pairs.iter().copied().collect();
        pairs.sort();
        Ok(pairs)
    }
}

#[async_trait]
impl AssignmentRepository for LocalRepository {
    async fn list_assignments_overlapping(
        &self,
        window: Window,
    ) -> RepositoryResult<Vec<Assignment>> {
        let mut rows: Vec<Assignment> = self
            .inner
            .read()
            .assignments
            .values()
            .filter(|a| a.window().overlaps(&window))
            .cloned()
            .collect();
        rows.sort_by_key(roster_order);
        Ok(rows)
    }

    async fn list_assignments_starting_on(
        &self,
        day: NaiveDate,
    ) -> RepositoryResult<Vec<Assignment>> {
        let bounds = Window::day_bounds(day);
        let mut rows: Vec<Assignment> = self
            .inner
            .read()
            .assignments
            .values()
            .filter(|a| bounds.contains(a.start_at))
            .cloned()
            .collect();
        rows.sort_by_key(roster_order);
        Ok(rows)
    }

    async fn fetch_assignment(&self, id: AssignmentId) -> RepositoryResult<Assignment> {
        self.inner.read().assignments.get(&id.value()).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Assignment {} does not exist", id),
                ErrorContext::new("fetch_assignment")
                    .with_entity("assignment")
                    .with_entity_id(id),
            )
        })
    }

    async fn clear_day(
        &self,
        day: NaiveDate,
        mission_ids: Option<&[MissionId]>,
        locked_ids: &[AssignmentId],
    ) -> RepositoryResult<usize> {
        let bounds = Window::day_bounds(day);
        let mut inner = self.inner.write();
        let doomed: Vec<i64> = inner
            .assignments
            .values()
            .filter(|a| bounds.contains(a.start_at))
            .filter(|a| mission_ids.is_none_or(|ids| ids.contains(&a.mission_id)))
            .filter(|a| !locked_ids.contains(&a.id))
            .map(|a| a.id.value())
            .collect();
        for id in &doomed {
            inner.assignments.remove(id);
        }
        Ok(doomed.len())
    }

    async fn insert_assignments(
        &self,
        rows: Vec<NewAssignment>,
    ) -> RepositoryResult<Vec<Assignment>> {
        let mut inner = self.inner.write();

        // Validate the whole batch before touching the store so the insert
        // stays all-or-nothing.
        for row in &rows {
            if row.window.start >= row.window.end {
                return Err(RepositoryError::validation_with_context(
                    format!("Assignment window is inverted: {}", row.window),
                    ErrorContext::new("insert_assignments").with_entity("assignment"),
                ));
            }
        }
        for (i, row) in rows.iter().enumerate() {
            let Some(soldier_id) = row.soldier_id else {
                continue;
            };
            let duplicate_stored = inner.assignments.values().any(|a| {
                a.soldier_id == Some(soldier_id)
                    && a.start_at == row.window.start
                    && a.end_at == row.window.end
            });
            let duplicate_in_batch = rows[..i].iter().any(|other| {
                other.soldier_id == Some(soldier_id) && other.window == row.window
            });
            if duplicate_stored || duplicate_in_batch {
                return Err(RepositoryError::conflict_with_context(
                    format!(
                        "Soldier {} already assigned for window {}",
                        soldier_id, row.window
                    ),
                    ErrorContext::new("insert_assignments")
                        .with_entity("assignment")
                        .with_details("duplicate soldier/window"),
                ));
            }
        }

        let created_at = chrono::Utc::now().naive_utc();
        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let id = inner.next_assignment_id;
            inner.next_assignment_id += 1;
            let assignment = Assignment {
                id: AssignmentId::new(id),
                mission_id: row.mission_id,
                soldier_id: row.soldier_id,
                role_id: row.role_id,
                start_at: row.window.start,
                end_at: row.window.end,
                created_at,
            };
            inner.assignments.insert(id, assignment.clone());
            stored.push(assignment);
        }
        Ok(stored)
    }
}
