//! Fill and audit orchestration over a repository.
//!
//! A fill run is a single-threaded batch: validate the scope, optionally
//! clear the day (minus locked rows), fetch the roster and assignment history
//! once, then fill mission by mission. Each mission persists as one atomic
//! batch; a failed mission reports an error string and the run moves on.
//! Nothing is retried automatically - a replace-mode run is idempotent, so
//! the caller may simply re-invoke.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate, NaiveTime};
use log::{info, warn};

use crate::api::{Assignment, Finding, Mission, MissionId};
use crate::audit;
use crate::config::PlannerConfig;
use crate::db::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::models::absence::AbsenceCalendar;
use crate::models::time::Window;
use crate::planner::context::{Occupancy, PlannerContext, RestrictionIndex, RosterIndex};
use crate::planner::fill::{fill_mission, FillOptions};
use crate::planner::stats::build_stats;
use crate::planner::{FillReport, FillRequest, MissionBrief, MissionFillResult};

/// History the audit engine needs around the target day to know each
/// soldier's previous duty: any older previous assignment produces a gap far
/// outside every band.
const AUDIT_LOOKBACK_DAYS: i64 = 2;

/// Run the fill engine for one day and persist the outcome.
///
/// Mission subsets are validated up front; an unknown mission id rejects the
/// whole request before any work begins. Per-mission persistence failures are
/// isolated: the mission reports an error string and the rest of the run
/// proceeds.
pub async fn fill_plan(
    repo: &dyn FullRepository,
    config: &PlannerConfig,
    request: FillRequest,
) -> RepositoryResult<FillReport> {
    let day = request.day;
    let missions = scope_missions(repo, request.mission_ids.as_deref()).await?;

    if request.replace {
        let deleted = repo
            .clear_day(day, request.mission_ids.as_deref(), &request.locked_assignment_ids)
            .await?;
        info!("fill {}: cleared {} previous assignments", day, deleted);
    }

    // Fetch everything the run needs in one pass: lookback history for
    // fairness statistics plus a little forward context for gap-after checks.
    let day_start = day.and_time(NaiveTime::MIN);
    let lookback = Window::new(
        day_start - Duration::days(config.lookback_days),
        day_start + Duration::days(1),
    );
    let horizon = Window::new(lookback.start, day_start + Duration::days(2));
    let history = repo.list_assignments_overlapping(horizon).await?;

    let soldiers = repo.list_soldiers().await?;
    let roles = repo.list_roles().await?;
    let vacations = repo.list_vacations().await?;
    let pairs = repo.list_restriction_pairs().await?;

    let roster = RosterIndex::build(soldiers, &roles);
    let absences = AbsenceCalendar::resolve(&vacations, config.cutover_time());
    let restrictions = RestrictionIndex::new(pairs);

    let mut ctx = PlannerContext::new(
        Occupancy::from_assignments(&history),
        build_stats(&history, day, &lookback),
        request.shuffle,
        request.seed,
    );
    let options = FillOptions {
        day,
        strict_rest: request.strict_rest,
        excluded_seats: request.excluded_seats.iter().copied().collect(),
        lookback,
    };

    let mut results = Vec::with_capacity(missions.len());
    let mut created = Vec::new();

    for mission in &missions {
        let brief = MissionBrief {
            id: mission.id,
            name: mission.name.clone(),
        };
        let planned = fill_mission(
            mission,
            &history,
            &roster,
            &absences,
            &restrictions,
            &mut ctx,
            &options,
            config,
        );

        if planned.is_empty() {
            results.push(MissionFillResult {
                mission: brief,
                created_count: Some(0),
                error: None,
            });
            continue;
        }

        match repo.insert_assignments(planned).await {
            Ok(stored) => {
                results.push(MissionFillResult {
                    mission: brief,
                    created_count: Some(stored.len()),
                    error: None,
                });
                created.extend(stored);
            }
            Err(e) => {
                // This mission's batch was rejected wholesale; its windows
                // stay marked occupied in the run context, which only makes
                // later missions more conservative.
                warn!("fill {}: mission {} failed: {}", day, mission.id, e);
                results.push(MissionFillResult {
                    mission: brief,
                    created_count: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    info!(
        "fill {}: created {} assignments across {} missions",
        day,
        created.len(),
        missions.len()
    );
    Ok(FillReport {
        day,
        results,
        created,
    })
}

/// Resolve and validate the mission scope of a request.
async fn scope_missions(
    repo: &dyn FullRepository,
    mission_ids: Option<&[MissionId]>,
) -> RepositoryResult<Vec<Mission>> {
    let all = repo.list_missions().await?;
    let Some(requested) = mission_ids else {
        return Ok(all);
    };

    let known: HashSet<MissionId> = all.iter().map(|m| m.id).collect();
    for id in requested {
        if !known.contains(id) {
            return Err(RepositoryError::validation(format!(
                "Unknown mission id in requested subset: {}",
                id
            )));
        }
    }
    Ok(all
        .into_iter()
        .filter(|m| requested.contains(&m.id))
        .collect())
}

/// Audit a finalized day's roster and classify conflicts.
pub async fn audit_plan(
    repo: &dyn FullRepository,
    config: &PlannerConfig,
    day: NaiveDate,
) -> RepositoryResult<Vec<Finding>> {
    let day_start = day.and_time(NaiveTime::MIN);
    let horizon = Window::new(
        day_start - Duration::days(AUDIT_LOOKBACK_DAYS),
        day_start + Duration::days(2),
    );
    let assignments = repo.list_assignments_overlapping(horizon).await?;

    let soldiers: HashMap<_, _> = repo
        .list_soldiers()
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();
    let missions: HashMap<_, _> = repo
        .list_missions()
        .await?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();
    let restrictions = RestrictionIndex::new(repo.list_restriction_pairs().await?);

    audit::audit_day(day, &assignments, &soldiers, &missions, &restrictions, config)
        .map_err(|e| RepositoryError::validation(e.to_string()))
}

/// Read-only listing of the assignments starting on a day, optionally
/// limited to one mission.
pub async fn day_roster(
    repo: &dyn FullRepository,
    day: NaiveDate,
    mission_id: Option<MissionId>,
) -> RepositoryResult<Vec<Assignment>> {
    if let Some(id) = mission_id {
        // Surface unknown missions as NotFound instead of an empty list.
        repo.fetch_mission(id).await?;
    }
    let rows = repo.list_assignments_starting_on(day).await?;
    Ok(match mission_id {
        Some(id) => rows.into_iter().filter(|a| a.mission_id == id).collect(),
        None => rows,
    })
}
