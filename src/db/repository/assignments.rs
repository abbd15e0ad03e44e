//! Assignment repository trait.
//!
//! Assignments are the only entities this system writes. A fill run replaces
//! its scope wholesale (honoring locked ids) and inserts each mission's new
//! rows as one atomic batch; nothing is ever mutated in place.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::api::{Assignment, AssignmentId, MissionId, RoleId, SoldierId};
use crate::models::time::Window;

/// A row to insert; the backend allocates the id and creation timestamp.
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub mission_id: MissionId,
    pub soldier_id: Option<SoldierId>,
    pub role_id: Option<RoleId>,
    pub window: Window,
}

/// Repository trait for assignment reads and writes.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// All assignments whose window overlaps the given interval, ordered by
    /// (mission, start, role with generics last).
    async fn list_assignments_overlapping(
        &self,
        window: Window,
    ) -> RepositoryResult<Vec<Assignment>>;

    /// All assignments that *start* on the given calendar day, same ordering.
    async fn list_assignments_starting_on(
        &self,
        day: NaiveDate,
    ) -> RepositoryResult<Vec<Assignment>>;

    /// Fetch a single assignment.
    async fn fetch_assignment(&self, id: AssignmentId) -> RepositoryResult<Assignment>;

    /// Delete the assignments starting on `day`, optionally limited to a
    /// mission subset, always excluding the locked ids.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows deleted
    async fn clear_day(
        &self,
        day: NaiveDate,
        mission_ids: Option<&[MissionId]>,
        locked_ids: &[AssignmentId],
    ) -> RepositoryResult<usize>;

    /// Insert a batch of assignments atomically: either every row is stored
    /// or none is.
    ///
    /// # Returns
    /// * `Ok(Vec<Assignment>)` - The stored rows with allocated ids
    /// * `Err(RepositoryError::Conflict)` - If any row duplicates an existing
    ///   (soldier, window) pair; no row is stored in that case
    async fn insert_assignments(
        &self,
        rows: Vec<NewAssignment>,
    ) -> RepositoryResult<Vec<Assignment>>;
}
