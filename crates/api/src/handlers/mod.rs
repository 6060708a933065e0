//! HTTP handler modules, one per resource.

pub mod accounts;
pub mod job_titles;
pub mod journeys;
pub mod permissions;
pub mod roles;
pub mod step_instances;
pub mod templates;
pub mod users;
