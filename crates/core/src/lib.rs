//! Pure domain logic for the crewpath boarding platform.
//!
//! This crate has zero internal dependencies so it can be used by the
//! repository layer, the API layer, and any future CLI tooling. It holds
//! the journey and step state machines, derived-metric computations
//! (progress, overdue), permission resolution, and the error taxonomy.
//! Nothing in here touches the database.

pub mod error;
pub mod journey;
pub mod password;
pub mod permission;
pub mod step;
pub mod types;
