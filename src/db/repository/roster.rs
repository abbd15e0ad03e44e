//! Roster repository trait for long-lived reference data.
//!
//! Missions, soldiers, roles, vacations and restriction pairs are owned by
//! external collaborators; the planner only ever reads them, once, at the
//! start of a run.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{Mission, MissionId, Role, Soldier, SoldierId, Vacation};

/// Repository trait for reference-data reads.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Check that the backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// All missions with their slots and role requirements, ordered by id.
    async fn list_missions(&self) -> RepositoryResult<Vec<Mission>>;

    /// Fetch a single mission.
    ///
    /// # Returns
    /// * `Ok(Mission)` - The mission
    /// * `Err(RepositoryError::NotFound)` - If no such mission exists
    async fn fetch_mission(&self, id: MissionId) -> RepositoryResult<Mission>;

    /// The full personnel roster, ordered by id.
    async fn list_soldiers(&self) -> RepositoryResult<Vec<Soldier>>;

    /// All known roles.
    async fn list_roles(&self) -> RepositoryResult<Vec<Role>>;

    /// All vacation ranges.
    async fn list_vacations(&self) -> RepositoryResult<Vec<Vacation>>;

    /// All explicit (soldier, mission) restriction pairs.
    async fn list_restriction_pairs(&self) -> RepositoryResult<Vec<(SoldierId, MissionId)>>;
}
