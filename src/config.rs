//! Planner configuration file support.
//!
//! This module provides the tunable surface shared by the fill and audit
//! engines: the minimum-rest floor, the fairness lookback window, the
//! near-minimum-rest tolerance band, the vacation cut-over hour and the
//! fairness scorer's weight table. Values load from a TOML configuration
//! file, with serde defaults for every field.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

/// Planner and audit configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Minimum rest between two duties, in hours.
    #[serde(default = "default_min_rest_hours")]
    pub min_rest_hours: f64,
    /// Trailing window over which fairness statistics are aggregated, in days.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,
    /// Width of the "just barely legal" rest band above the floor, in minutes.
    #[serde(default = "default_rest_tolerance_minutes")]
    pub rest_tolerance_minutes: i64,
    /// Local hour at which a vacation boundary day switches between free and
    /// blocked.
    #[serde(default = "default_vacation_cutover_hour")]
    pub vacation_cutover_hour: u32,
    #[serde(default)]
    pub weights: ScoreWeights,
}

fn default_min_rest_hours() -> f64 {
    8.0
}

fn default_lookback_days() -> i64 {
    14
}

fn default_rest_tolerance_minutes() -> i64 {
    10
}

fn default_vacation_cutover_hour() -> u32 {
    12
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_rest_hours: default_min_rest_hours(),
            lookback_days: default_lookback_days(),
            rest_tolerance_minutes: default_rest_tolerance_minutes(),
            vacation_cutover_hour: default_vacation_cutover_hour(),
            weights: ScoreWeights::default(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file {}", path.as_ref().display())
        })?;
        let config: PlannerConfig =
            toml::from_str(&content).context("Failed to parse planner config file")?;
        Ok(config)
    }

    /// Load configuration from the default locations, falling back to the
    /// built-in defaults when no file is found.
    ///
    /// Searches for `roster.toml` in:
    /// 1. Current directory
    /// 2. `config/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self> {
        let search_paths = vec![
            PathBuf::from("roster.toml"),
            PathBuf::from("config/roster.toml"),
            PathBuf::from("../roster.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        log::info!("no roster.toml found, using default planner configuration");
        Ok(Self::default())
    }

    /// The minimum-rest floor as a duration.
    pub fn min_rest(&self) -> Duration {
        Duration::seconds((self.min_rest_hours * 3600.0) as i64)
    }

    /// The near-minimum tolerance band width as a duration.
    pub fn rest_tolerance(&self) -> Duration {
        Duration::minutes(self.rest_tolerance_minutes)
    }

    /// The vacation cut-over as a time of day.
    pub fn cutover_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.vacation_cutover_hour.min(23), 0, 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

/// Weight table for the fairness scorer. Lower total score = more preferable
/// candidate.
///
/// Relative signs and magnitudes matter more than exact values: each weight
/// must keep its term monotonic in the documented direction. All values are
/// tunable via the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Penalty per hour of negative gap (window starts before the previous
    /// duty ends; defensive, the filter normally rejects these).
    #[serde(default = "default_overlap_penalty_per_hour")]
    pub overlap_penalty_per_hour: f64,
    /// Penalty per missing hour below the minimum-rest floor.
    #[serde(default = "default_rest_shortfall_per_hour")]
    pub rest_shortfall_per_hour: f64,
    /// Bonus (subtracted) per hour of rest beyond the floor.
    #[serde(default = "default_rest_surplus_bonus_per_hour")]
    pub rest_surplus_bonus_per_hour: f64,
    /// Fixed bonus (subtracted) when the soldier has no prior duty at all.
    #[serde(default = "default_no_history_bonus")]
    pub no_history_bonus: f64,
    /// Flat penalty for having worked this exact mission inside the lookback
    /// window.
    #[serde(default = "default_repeat_mission_flat")]
    pub repeat_mission_flat: f64,
    /// Additional penalty per repetition of this mission.
    #[serde(default = "default_repeat_mission_per_count")]
    pub repeat_mission_per_count: f64,
    /// Penalty per recent duty in the same time-of-day bucket.
    #[serde(default = "default_bucket_repeat_per_count")]
    pub bucket_repeat_per_count: f64,
    /// Penalty per previous co-assignment with each person already placed in
    /// the same window.
    #[serde(default = "default_pair_repeat_per_count")]
    pub pair_repeat_per_count: f64,
    /// Penalty per assignment the soldier already holds on the target day.
    #[serde(default = "default_same_day_load_per_count")]
    pub same_day_load_per_count: f64,
    /// Penalty per worked hour inside the lookback window.
    #[serde(default = "default_workload_per_hour")]
    pub workload_per_hour: f64,
    /// Max-min rest nudge: bonus (subtracted) per hour of gap before the
    /// window, favoring the currently most-rested candidate.
    #[serde(default = "default_rested_bonus_per_hour")]
    pub rested_bonus_per_hour: f64,
    /// Max-min rest nudge: penalty per hour the resulting gap after the
    /// window falls below the floor, avoiding boxing in a later shift.
    #[serde(default = "default_boxed_in_penalty_per_hour")]
    pub boxed_in_penalty_per_hour: f64,
}

fn default_overlap_penalty_per_hour() -> f64 {
    50.0
}

fn default_rest_shortfall_per_hour() -> f64 {
    6.0
}

fn default_rest_surplus_bonus_per_hour() -> f64 {
    0.5
}

fn default_no_history_bonus() -> f64 {
    4.0
}

fn default_repeat_mission_flat() -> f64 {
    3.0
}

fn default_repeat_mission_per_count() -> f64 {
    1.5
}

fn default_bucket_repeat_per_count() -> f64 {
    1.0
}

fn default_pair_repeat_per_count() -> f64 {
    0.75
}

fn default_same_day_load_per_count() -> f64 {
    2.5
}

fn default_workload_per_hour() -> f64 {
    0.1
}

fn default_rested_bonus_per_hour() -> f64 {
    0.05
}

fn default_boxed_in_penalty_per_hour() -> f64 {
    1.0
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            overlap_penalty_per_hour: default_overlap_penalty_per_hour(),
            rest_shortfall_per_hour: default_rest_shortfall_per_hour(),
            rest_surplus_bonus_per_hour: default_rest_surplus_bonus_per_hour(),
            no_history_bonus: default_no_history_bonus(),
            repeat_mission_flat: default_repeat_mission_flat(),
            repeat_mission_per_count: default_repeat_mission_per_count(),
            bucket_repeat_per_count: default_bucket_repeat_per_count(),
            pair_repeat_per_count: default_pair_repeat_per_count(),
            same_day_load_per_count: default_same_day_load_per_count(),
            workload_per_hour: default_workload_per_hour(),
            rested_bonus_per_hour: default_rested_bonus_per_hour(),
            boxed_in_penalty_per_hour: default_boxed_in_penalty_per_hour(),
        }
    }
}
