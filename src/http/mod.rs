//! Axum-based HTTP server exposing the fill and audit engines.
//!
//! This module is gated behind the `http-server` feature. It provides:
//! - [`router`]: route configuration and middleware
//! - [`handlers`]: request handlers delegating to the service layer
//! - [`dto`]: request/response types specific to the HTTP surface
//! - [`error`]: error-to-response mapping
//! - [`state`]: shared application state

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, AppError};
pub use router::create_router;
pub use state::AppState;
