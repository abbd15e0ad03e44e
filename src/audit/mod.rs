//! The audit engine.
//!
//! A post-hoc scanner over a finalized day's stored assignments. It enforces
//! nothing: the fill engine's invariants can still be violated in stored data
//! (manual edits, ignored warnings), and this engine's job is to detect and
//! classify those violations by severity. The legacy implementation expressed
//! the "previous row" logic as SQL window functions; here it is an explicit
//! per-soldier sort-and-scan carrying previous and previous-previous cursors.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::api::{Assignment, AssignmentId, Mission, MissionId, Soldier, SoldierId};
use crate::config::PlannerConfig;
use crate::models::time::Window;
use crate::planner::context::RestrictionIndex;

/// Severity of a finding.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Red,
    Orange,
}

/// Kind of scheduling conflict. Variant order matches the legacy report
/// ordering (alphabetical by type name).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FindingKind {
    Overlap,
    Rest,
    Restricted,
}

/// One classified conflict in a day's roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    pub soldier_id: SoldierId,
    pub soldier_name: String,
    pub mission_id: MissionId,
    pub mission_name: String,
    pub window: Window,
    /// Human-readable explanation.
    pub details: String,
    /// The assignment this finding is anchored to.
    pub assignment_id: AssignmentId,
}

/// Error for inputs the engine refuses to scan. Unclassifiable but
/// well-formed data never errors; it simply produces no finding.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("assignment {id} has an inverted window: {start} >= {end}")]
    InvalidWindow {
        id: AssignmentId,
        start: chrono::NaiveDateTime,
        end: chrono::NaiveDateTime,
    },
}

fn format_gap(gap: Duration) -> String {
    let minutes = gap.num_minutes();
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Scan a day's assignments (plus enough history to know each soldier's
/// previous duty) and classify conflicts.
///
/// Findings are only raised for assignments *starting* on the target day;
/// older rows in `assignments` serve as the previous-duty context. Output is
/// ordered by (kind, soldier name, start descending), matching the legacy
/// report.
pub fn audit_day(
    day: NaiveDate,
    assignments: &[Assignment],
    soldiers: &HashMap<SoldierId, Soldier>,
    missions: &HashMap<MissionId, Mission>,
    restrictions: &RestrictionIndex,
    config: &PlannerConfig,
) -> Result<Vec<Finding>, AuditError> {
    for a in assignments {
        if a.start_at >= a.end_at {
            return Err(AuditError::InvalidWindow {
                id: a.id,
                start: a.start_at,
                end: a.end_at,
            });
        }
    }

    let min_rest = config.min_rest();
    let band_top = min_rest + config.rest_tolerance();
    let in_band = |gap: Duration| gap >= min_rest && gap <= band_top;

    let soldier_name = |id: SoldierId| {
        soldiers
            .get(&id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| format!("Soldier {}", id))
    };
    let mission_name = |id: MissionId| {
        missions
            .get(&id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| format!("Mission {}", id))
    };

    let mut findings = Vec::new();

    // RESTRICTED: membership checks only, no temporal computation.
    for a in assignments {
        let Some(soldier_id) = a.soldier_id else {
            continue;
        };
        if !a.window().starts_on(day) {
            continue;
        }
        let restricted = match (soldiers.get(&soldier_id), missions.get(&a.mission_id)) {
            (Some(soldier), Some(mission)) => restrictions.is_restricted(soldier, mission),
            _ => false,
        };
        if restricted {
            findings.push(Finding {
                kind: FindingKind::Restricted,
                severity: Severity::Orange,
                soldier_id,
                soldier_name: soldier_name(soldier_id),
                mission_id: a.mission_id,
                mission_name: mission_name(a.mission_id),
                window: a.window(),
                details: "Soldier is restricted from this mission".to_string(),
                assignment_id: a.id,
            });
        }
    }

    // OVERLAP and REST: per-soldier ordered scan with previous and
    // previous-previous gap cursors.
    let mut per_soldier: HashMap<SoldierId, Vec<&Assignment>> = HashMap::new();
    for a in assignments {
        if let Some(soldier_id) = a.soldier_id {
            per_soldier.entry(soldier_id).or_default().push(a);
        }
    }

    for (soldier_id, mut rows) in per_soldier {
        rows.sort_by_key(|a| (a.start_at, a.end_at));

        for i in 1..rows.len() {
            let current = rows[i];
            if !current.window().starts_on(day) {
                continue;
            }
            let prev = rows[i - 1];
            let gap = current.start_at - prev.end_at;
            let prev_gap = (i >= 2).then(|| prev.start_at - rows[i - 2].end_at);

            let finding = if gap < Duration::zero() {
                Some((
                    FindingKind::Overlap,
                    Severity::Red,
                    format!(
                        "Overlaps with previous assignment ending at {}",
                        prev.end_at.format("%Y-%m-%d %H:%M")
                    ),
                ))
            } else if gap < min_rest {
                Some((
                    FindingKind::Overlap,
                    Severity::Orange,
                    format!("Rest between missions is {}", format_gap(gap)),
                ))
            } else if in_band(gap) {
                match prev_gap.filter(|g| in_band(*g)) {
                    Some(previous) => Some((
                        FindingKind::Rest,
                        Severity::Red,
                        format!(
                            "Rest of {} barely above the minimum, after a previous rest of {}",
                            format_gap(gap),
                            format_gap(previous)
                        ),
                    )),
                    None => Some((
                        FindingKind::Rest,
                        Severity::Orange,
                        format!("Rest between missions is {}", format_gap(gap)),
                    )),
                }
            } else {
                None
            };

            if let Some((kind, severity, details)) = finding {
                findings.push(Finding {
                    kind,
                    severity,
                    soldier_id,
                    soldier_name: soldier_name(soldier_id),
                    mission_id: current.mission_id,
                    mission_name: mission_name(current.mission_id),
                    window: current.window(),
                    details,
                    assignment_id: current.id,
                });
            }
        }
    }

    findings.sort_by(|a, b| {
        a.kind
            .cmp(&b.kind)
            .then_with(|| a.soldier_name.cmp(&b.soldier_name))
            .then_with(|| b.window.start.cmp(&a.window.start))
    });
    Ok(findings)
}
