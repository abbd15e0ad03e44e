//! # Roster Rust Backend
//!
//! Duty roster allocation and audit engine.
//!
//! This crate assigns qualified personnel to recurring time-boxed duty slots
//! for a given calendar day, subject to hard eligibility rules (absence,
//! temporal conflicts, mission restrictions, minimum rest) and soft fairness
//! objectives (rest adequacy, rotation, load balance, crew variety). A
//! separate audit engine scans a finalized day's roster and classifies rule
//! violations by severity. The backend exposes a REST API via Axum.
//!
//! ## Features
//!
//! - **Fill Engine**: greedy, constraint-aware, score-ranked seat allocation
//! - **Audit Engine**: post-hoc conflict detection with severity levels
//! - **Fairness Statistics**: lookback-window aggregates driving the scorer
//! - **Reproducibility**: seeded shuffle mode and explicit run context
//! - **HTTP API**: RESTful endpoints for the planning frontend
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Domain entities and DTO types
//! - [`models`]: Time windows, buckets and absence resolution
//! - [`config`]: Tunable planner configuration (TOML)
//! - [`db`]: Repository pattern and the in-memory backend
//! - [`planner`]: The fill engine
//! - [`audit`]: The audit engine
//! - [`services`]: Orchestration between repository and engines
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;
pub mod audit;
pub mod config;
pub mod db;
pub mod models;
pub mod planner;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
