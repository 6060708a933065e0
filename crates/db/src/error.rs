//! Error type for repository operations that enforce domain invariants.
//!
//! Plain CRUD methods return `Result<_, sqlx::Error>` directly. Engine
//! operations (template create, journey start, step completion, ...)
//! return [`DbResult`] so domain violations surface as typed
//! [`CoreError`]s with their constraint names intact.

use crewpath_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A domain invariant was violated; no writes took place.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// The violated unique-constraint name for a PostgreSQL 23505 error,
    /// if this error is one.
    pub fn unique_constraint(&self) -> Option<String> {
        match self {
            DbError::Sqlx(err) => unique_constraint(err),
            DbError::Core(_) => None,
        }
    }
}

/// Extract the constraint name from a PostgreSQL unique violation (23505).
pub fn unique_constraint(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            db_err.constraint().map(str::to_string)
        }
        _ => None,
    }
}
