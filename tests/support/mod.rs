//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use roster_rust::api::{
    Assignment, AssignmentId, Mission, MissionId, MissionSlot, Role, RoleId, RoleRequirement,
    SlotId, Soldier, SoldierId, Vacation, VacationId,
};
use roster_rust::db::LocalRepository;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn at(day: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
    day.and_time(t(h, m))
}

pub fn slot(id: i64, from: NaiveTime, to: NaiveTime) -> MissionSlot {
    MissionSlot {
        id: SlotId::new(id),
        start_time: from,
        end_time: to,
    }
}

pub fn requirement(role: i64, count: u32) -> RoleRequirement {
    RoleRequirement {
        role_id: RoleId::new(role),
        count,
    }
}

pub fn mission(
    id: i64,
    name: &str,
    slots: Vec<MissionSlot>,
    requirements: Vec<RoleRequirement>,
    total_needed: Option<u32>,
) -> Mission {
    Mission {
        id: MissionId::new(id),
        name: name.to_string(),
        slots,
        requirements,
        total_needed,
    }
}

pub fn soldier(id: i64, name: &str, roles: Vec<i64>, restrictions: &str) -> Soldier {
    Soldier {
        id: SoldierId::new(id),
        name: name.to_string(),
        role_ids: roles.into_iter().map(RoleId::new).collect(),
        restrictions: restrictions.to_string(),
    }
}

pub fn vacation(id: i64, soldier: i64, start: NaiveDate, end: NaiveDate) -> Vacation {
    Vacation {
        id: VacationId::new(id),
        soldier_id: SoldierId::new(soldier),
        start_date: start,
        end_date: end,
    }
}

pub fn stored_assignment(
    id: i64,
    mission: i64,
    soldier: Option<i64>,
    role: Option<i64>,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Assignment {
    Assignment {
        id: AssignmentId::new(id),
        mission_id: MissionId::new(mission),
        soldier_id: soldier.map(SoldierId::new),
        role_id: role.map(RoleId::new),
        start_at: start,
        end_at: end,
        created_at: start,
    }
}

/// A small garrison: two roles, eight soldiers (1-3 commanders, 4-5 drivers,
/// 6-8 unqualified), no vacations or restrictions.
pub fn garrison_repo() -> LocalRepository {
    let repo = LocalRepository::new();
    repo.upsert_role(Role::new(RoleId::new(1), "Commander"));
    repo.upsert_role(Role::new(RoleId::new(2), "Driver"));
    for i in 1..=8i64 {
        let roles = match i {
            1..=3 => vec![1],
            4..=5 => vec![2],
            _ => vec![],
        };
        repo.upsert_soldier(soldier(i, &format!("Soldier {}", i), roles, ""));
    }
    repo
}
