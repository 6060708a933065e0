//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Plain CRUD returns
//! `Result<_, sqlx::Error>`; operations that enforce domain invariants
//! return [`crate::DbResult`] so constraint violations surface as typed
//! core errors.

pub mod account_repo;
pub mod job_title_repo;
pub mod journey_repo;
pub mod permission_repo;
pub mod role_repo;
pub mod step_instance_repo;
pub mod template_repo;
pub mod user_repo;

pub use account_repo::AccountRepo;
pub use job_title_repo::JobTitleRepo;
pub use journey_repo::JourneyRepo;
pub use permission_repo::PermissionRepo;
pub use role_repo::RoleRepo;
pub use step_instance_repo::StepInstanceRepo;
pub use template_repo::TemplateRepo;
pub use user_repo::UserRepo;
