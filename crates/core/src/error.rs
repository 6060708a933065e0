use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constraint names
// ---------------------------------------------------------------------------
// Every Validation/Conflict error names the violated constraint so callers
// (and tests) can match on it without parsing the message.

/// At most one default template per (account, journey_type, job_title).
pub const CONSTRAINT_UNIQUE_DEFAULT: &str = "unique-default";

/// At most one role system-wide may be the default role.
pub const CONSTRAINT_UNIQUE_DEFAULT_ROLE: &str = "unique-default-role";

/// A step's due offset must not exceed its template's estimated duration.
pub const CONSTRAINT_DURATION_EXCEEDED: &str = "duration-exceeded";

/// (account, journey_type, job_title, title) must be unique for templates.
pub const CONSTRAINT_DUPLICATE_TEMPLATE: &str = "duplicate-template";

/// A user cannot have two instances of the same template.
pub const CONSTRAINT_DUPLICATE_INSTANCE: &str = "duplicate-instance";

/// (role, permission) pairs are unique in role_permissions.
pub const CONSTRAINT_DUPLICATE_ROLE_PERMISSION: &str = "duplicate-role-permission";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed ({constraint}): {message}")]
    Validation {
        constraint: &'static str,
        message: String,
    },

    #[error("Conflict ({constraint}): {message}")]
    Conflict {
        constraint: &'static str,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a validation failure against a named constraint.
    pub fn validation(constraint: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            constraint,
            message: message.into(),
        }
    }

    /// Shorthand for a state-dependent conflict against a named constraint.
    pub fn conflict(constraint: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            constraint,
            message: message.into(),
        }
    }

    /// The violated constraint name, if this error carries one.
    pub fn constraint(&self) -> Option<&'static str> {
        match self {
            Self::Validation { constraint, .. } | Self::Conflict { constraint, .. } => {
                Some(constraint)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_accessor_returns_name() {
        let err = CoreError::validation(CONSTRAINT_DURATION_EXCEEDED, "21 > 14");
        assert_eq!(err.constraint(), Some(CONSTRAINT_DURATION_EXCEEDED));
    }

    #[test]
    fn not_found_has_no_constraint() {
        let err = CoreError::NotFound {
            entity: "journey_template",
            id: 42,
        };
        assert_eq!(err.constraint(), None);
    }

    #[test]
    fn messages_include_constraint_name() {
        let err = CoreError::conflict(CONSTRAINT_UNIQUE_DEFAULT, "default already exists");
        assert!(err.to_string().contains("unique-default"));
    }
}
