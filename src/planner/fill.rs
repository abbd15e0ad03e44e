//! The fill orchestrator: seats one mission's slots for a target day.
//!
//! Explicit role-tagged seats are filled first (requirements ordered by role
//! name), then generic seats up to the mission's total headcount. Placements
//! commit into the run context immediately, so later seats in the same run
//! see the occupancy and fairness effects of earlier ones. Seats with no
//! eligible candidate are silently left unfilled; there is no backtracking.

use std::collections::HashSet;

use chrono::NaiveDate;
use log::debug;

use crate::api::{Assignment, Mission, MissionSlot, RoleId, SoldierId};
use crate::config::PlannerConfig;
use crate::db::repository::NewAssignment;
use crate::models::absence::AbsenceCalendar;
use crate::models::time::Window;
use crate::planner::context::{PlannerContext, RestrictionIndex, RosterIndex};
use crate::planner::ranking::{pick, rank};
use crate::planner::SeatKey;

/// Per-run fill parameters shared by every mission in scope.
#[derive(Debug, Clone)]
pub struct FillOptions {
    pub day: NaiveDate,
    pub strict_rest: bool,
    /// Seats to leave empty, identified by their reproducible key.
    pub excluded_seats: HashSet<SeatKey>,
    /// The fairness lookback window around the target day.
    pub lookback: Window,
}

/// Fill one mission's slots, committing winners into `ctx` and returning the
/// rows to persist.
///
/// `existing` is every assignment still stored near the target day after the
/// optional clear: locked rows and out-of-scope history. Rows matching a
/// slot's exact window count toward that window's seat totals and are never
/// re-chosen.
pub fn fill_mission(
    mission: &Mission,
    existing: &[Assignment],
    roster: &RosterIndex,
    absences: &AbsenceCalendar,
    restrictions: &RestrictionIndex,
    ctx: &mut PlannerContext,
    options: &FillOptions,
    config: &PlannerConfig,
) -> Vec<NewAssignment> {
    let mut created = Vec::new();

    let mut slots: Vec<&MissionSlot> = mission.slots.iter().collect();
    slots.sort_by_key(|s| (s.start_time, s.end_time, s.id));

    for slot in slots {
        let window = Window::resolve(options.day, slot.start_time, slot.end_time);
        fill_slot(
            mission,
            &window,
            existing,
            roster,
            absences,
            restrictions,
            ctx,
            options,
            config,
            &mut created,
        );
    }

    debug!(
        "mission {} ({}): planned {} assignments for {}",
        mission.id,
        mission.name,
        created.len(),
        options.day
    );
    created
}

#[allow(clippy::too_many_arguments)]
fn fill_slot(
    mission: &Mission,
    window: &Window,
    existing: &[Assignment],
    roster: &RosterIndex,
    absences: &AbsenceCalendar,
    restrictions: &RestrictionIndex,
    ctx: &mut PlannerContext,
    options: &FillOptions,
    config: &PlannerConfig,
    created: &mut Vec<NewAssignment>,
) {
    // Rows already stored for this exact (mission, window): locked survivors
    // of a replace run, or everything when replace was off.
    let existing_here: Vec<&Assignment> = existing
        .iter()
        .filter(|a| {
            a.mission_id == mission.id
                && a.start_at == window.start
                && a.end_at == window.end
        })
        .collect();

    let mut already_placed: HashSet<SoldierId> =
        existing_here.iter().filter_map(|a| a.soldier_id).collect();

    // Phase A: explicit role seats, requirements ordered by capability
    // priority (commanders first), then role name.
    let mut requirements: Vec<_> = mission.requirements.iter().collect();
    requirements.sort_by_key(|r| {
        (
            roster.role_class(r.role_id),
            roster.role_name(r.role_id).to_string(),
            r.role_id,
        )
    });

    for req in requirements {
        let taken = existing_here
            .iter()
            .filter(|a| a.role_id == Some(req.role_id))
            .count() as u32;
        for position in taken..req.count {
            fill_seat(
                mission,
                window,
                Some(req.role_id),
                position,
                roster,
                absences,
                restrictions,
                ctx,
                options,
                config,
                &mut already_placed,
                created,
            );
        }
    }

    // Phase B: generic seats up to the total headcount, locked generic rows
    // counted toward the total.
    let generic_total = mission.generic_seat_total();
    if generic_total > 0 {
        let taken = existing_here.iter().filter(|a| a.role_id.is_none()).count() as u32;
        for position in taken..generic_total {
            fill_seat(
                mission,
                window,
                None,
                position,
                roster,
                absences,
                restrictions,
                ctx,
                options,
                config,
                &mut already_placed,
                created,
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn fill_seat(
    mission: &Mission,
    window: &Window,
    role_id: Option<RoleId>,
    position: u32,
    roster: &RosterIndex,
    absences: &AbsenceCalendar,
    restrictions: &RestrictionIndex,
    ctx: &mut PlannerContext,
    options: &FillOptions,
    config: &PlannerConfig,
    already_placed: &mut HashSet<SoldierId>,
    created: &mut Vec<NewAssignment>,
) {
    let key = SeatKey {
        mission_id: mission.id,
        role_id,
        window: *window,
        position,
    };
    if options.excluded_seats.contains(&key) {
        debug!("seat {:?} excluded, leaving empty", key);
        return;
    }

    let pool = roster.pool(role_id);
    let ranked = rank(
        pool,
        mission,
        window,
        roster,
        absences,
        restrictions,
        ctx,
        already_placed,
        options.strict_rest,
        ctx.cursor(role_id),
        config,
    );
    let Some(winner) = pick(&ranked, ctx.rng.as_mut()) else {
        // Empty eligible pool: not an error, the seat stays open.
        return;
    };
    let (soldier_id, pool_index) = (winner.soldier_id, winner.pool_index);

    let fellows: Vec<SoldierId> = already_placed.iter().copied().collect();
    ctx.commit(
        soldier_id,
        mission.id,
        window,
        options.day,
        &options.lookback,
        &fellows,
    );
    ctx.advance_cursor(role_id, pool_index, pool.len());
    already_placed.insert(soldier_id);

    created.push(NewAssignment {
        mission_id: mission.id,
        soldier_id: Some(soldier_id),
        role_id,
        window: *window,
    });
}
