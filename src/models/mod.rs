//! Core value types shared by the planner and the audit engine.
//!
//! - [`time`]: absolute windows, slot resolution onto a calendar day
//!   (including overnight roll-over) and time-of-day buckets.
//! - [`absence`]: vacation ranges resolved into absolute blocked intervals
//!   with half-day boundary semantics.

pub mod absence;
pub mod time;

pub use absence::AbsenceCalendar;
pub use time::{TimeBucket, Window};
