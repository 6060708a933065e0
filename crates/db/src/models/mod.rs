//! Entity models: `FromRow` row structs plus Create/Update DTOs.

pub mod account;
pub mod job_title;
pub mod journey;
pub mod permission;
pub mod role;
pub mod step;
pub mod step_instance;
pub mod template;
pub mod user;
