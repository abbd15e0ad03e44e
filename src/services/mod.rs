//! High-level business logic over the repository and the two engines.
//!
//! Service functions take `&dyn FullRepository`, fetch everything a run needs
//! up front, invoke the pure engines and persist the outcome. The HTTP layer
//! and embedding code should call these rather than the engines directly.

pub mod plan_service;

pub use plan_service::{audit_plan, day_roster, fill_plan};
