//! Permission taxonomy and pure permission resolution.
//!
//! Resolution collapses the scattered "has permission" checks into one
//! place: a role contributes its granted (not denied) permission
//! codenames, a user additionally contributes directly-assigned custom
//! permissions, and the effective set is the union of the two. A
//! role-level deny does NOT revoke a direct grant; the two sources are
//! independent. The caller loads both sets from the database and passes
//! them in.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

pub const CATEGORY_USER_MANAGEMENT: &str = "user_management";
pub const CATEGORY_ACCOUNT_MANAGEMENT: &str = "account_management";
pub const CATEGORY_ROLE_MANAGEMENT: &str = "role_management";
pub const CATEGORY_SYSTEM_ADMIN: &str = "system_admin";
pub const CATEGORY_REPORTING: &str = "reporting";
pub const CATEGORY_ONBOARDING: &str = "onboarding";
pub const CATEGORY_OFFBOARDING: &str = "offboarding";

/// All valid permission category strings.
pub const VALID_CATEGORIES: &[&str] = &[
    CATEGORY_USER_MANAGEMENT,
    CATEGORY_ACCOUNT_MANAGEMENT,
    CATEGORY_ROLE_MANAGEMENT,
    CATEGORY_SYSTEM_ADMIN,
    CATEGORY_REPORTING,
    CATEGORY_ONBOARDING,
    CATEGORY_OFFBOARDING,
];

/// Validate that a category string is one of the fixed set.
pub fn validate_category(category: &str) -> Result<(), String> {
    if VALID_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(format!(
            "Invalid permission category '{category}'. Must be one of: {}",
            VALID_CATEGORIES.join(", ")
        ))
    }
}

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------

pub const LEVEL_VIEW: &str = "view";
pub const LEVEL_CREATE: &str = "create";
pub const LEVEL_EDIT: &str = "edit";
pub const LEVEL_DELETE: &str = "delete";
pub const LEVEL_ADMIN: &str = "admin";

/// All valid permission level strings.
pub const VALID_LEVELS: &[&str] = &[LEVEL_VIEW, LEVEL_CREATE, LEVEL_EDIT, LEVEL_DELETE, LEVEL_ADMIN];

/// Validate that a permission level string is one of the fixed set.
pub fn validate_level(level: &str) -> Result<(), String> {
    if VALID_LEVELS.contains(&level) {
        Ok(())
    } else {
        Err(format!(
            "Invalid permission level '{level}'. Must be one of: {}",
            VALID_LEVELS.join(", ")
        ))
    }
}

// ---------------------------------------------------------------------------
// Role hierarchy levels
// ---------------------------------------------------------------------------
// Lower numbers mean higher authority.

pub const ROLE_LEVEL_SUPER_ADMIN: i32 = 1;
pub const ROLE_LEVEL_ACCOUNT_ADMIN: i32 = 2;
pub const ROLE_LEVEL_MANAGER: i32 = 3;
pub const ROLE_LEVEL_STAFF: i32 = 4;
pub const ROLE_LEVEL_READ_ONLY: i32 = 5;

/// Human-readable label for a role hierarchy level.
pub fn role_level_label(level: i32) -> &'static str {
    match level {
        ROLE_LEVEL_SUPER_ADMIN => "Super Admin",
        ROLE_LEVEL_ACCOUNT_ADMIN => "Account Admin",
        ROLE_LEVEL_MANAGER => "Manager",
        ROLE_LEVEL_STAFF => "Staff",
        ROLE_LEVEL_READ_ONLY => "Read Only",
        _ => "Unknown",
    }
}

/// Validate that a role hierarchy level is within the defined range.
pub fn validate_role_level(level: i32) -> Result<(), String> {
    if (ROLE_LEVEL_SUPER_ADMIN..=ROLE_LEVEL_READ_ONLY).contains(&level) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role level {level}. Must be between {ROLE_LEVEL_SUPER_ADMIN} \
             (Super Admin) and {ROLE_LEVEL_READ_ONLY} (Read Only)"
        ))
    }
}

// ---------------------------------------------------------------------------
// Codename derivation
// ---------------------------------------------------------------------------

/// Derive a machine-readable codename from a permission name when the
/// caller did not supply one (lowercased, spaces become underscores).
pub fn derive_codename(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// A role-level grant or deny row, as loaded from `role_permissions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleGrant {
    pub codename: String,
    pub is_granted: bool,
}

/// True iff the role has an explicit grant for `codename`.
///
/// A deny row or a missing row both resolve to false.
pub fn role_has(grants: &[RoleGrant], codename: &str) -> bool {
    grants.iter().any(|g| g.is_granted && g.codename == codename)
}

/// Resolve a user's effective permission codenames.
///
/// Union of the role's granted codenames (denied rows excluded) and the
/// user's directly-assigned custom permissions. Direct grants are not
/// revoked by a role-level deny.
pub fn effective_permissions<I, S>(role_grants: &[RoleGrant], direct_grants: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut effective: BTreeSet<String> = role_grants
        .iter()
        .filter(|g| g.is_granted)
        .map(|g| g.codename.clone())
        .collect();
    effective.extend(direct_grants.into_iter().map(Into::into));
    effective
}

/// Group a role's granted permissions by category for display.
///
/// Input pairs are `(category, permission)`; only the caller-filtered
/// granted rows should be passed. Returns a map ordered by category name.
pub fn group_by_category<T>(permissions: Vec<(String, T)>) -> BTreeMap<String, Vec<T>> {
    let mut grouped: BTreeMap<String, Vec<T>> = BTreeMap::new();
    for (category, permission) in permissions {
        grouped.entry(category).or_default().push(permission);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(codename: &str, is_granted: bool) -> RoleGrant {
        RoleGrant {
            codename: codename.to_string(),
            is_granted,
        }
    }

    #[test]
    fn all_seven_categories_accepted() {
        assert_eq!(VALID_CATEGORIES.len(), 7);
        for c in VALID_CATEGORIES {
            assert!(validate_category(c).is_ok());
        }
        assert!(validate_category("billing").is_err());
    }

    #[test]
    fn all_five_levels_accepted() {
        for l in VALID_LEVELS {
            assert!(validate_level(l).is_ok());
        }
        assert!(validate_level("superuser").is_err());
    }

    #[test]
    fn role_level_labels() {
        assert_eq!(role_level_label(1), "Super Admin");
        assert_eq!(role_level_label(5), "Read Only");
        assert_eq!(role_level_label(9), "Unknown");
        assert!(validate_role_level(3).is_ok());
        assert!(validate_role_level(0).is_err());
        assert!(validate_role_level(6).is_err());
    }

    #[test]
    fn codename_derivation_lowercases_and_underscores() {
        assert_eq!(derive_codename("Can View Users"), "can_view_users");
        assert_eq!(derive_codename("edit_accounts"), "edit_accounts");
    }

    #[test]
    fn role_has_requires_explicit_grant() {
        let grants = vec![grant("view_users", true), grant("edit_users", false)];
        assert!(role_has(&grants, "view_users"));
        assert!(!role_has(&grants, "edit_users"));
        assert!(!role_has(&grants, "delete_users"));
    }

    #[test]
    fn effective_is_union_of_role_and_direct() {
        let grants = vec![grant("view_users", true), grant("view_reports", true)];
        let effective = effective_permissions(&grants, vec!["edit_accounts"]);
        assert_eq!(effective.len(), 3);
        assert!(effective.contains("view_users"));
        assert!(effective.contains("view_reports"));
        assert!(effective.contains("edit_accounts"));
    }

    #[test]
    fn role_deny_excluded_from_effective() {
        let grants = vec![grant("view_users", true), grant("delete_users", false)];
        let effective = effective_permissions(&grants, Vec::<String>::new());
        assert!(!effective.contains("delete_users"));
    }

    #[test]
    fn direct_grant_survives_role_level_deny() {
        // Observed source behaviour: a deny at the role level does not
        // revoke a direct grant of the same permission.
        let grants = vec![grant("manage_roles", false)];
        let effective = effective_permissions(&grants, vec!["manage_roles"]);
        assert!(effective.contains("manage_roles"));
    }

    #[test]
    fn duplicate_sources_collapse() {
        let grants = vec![grant("view_users", true)];
        let effective = effective_permissions(&grants, vec!["view_users"]);
        assert_eq!(effective.len(), 1);
    }

    #[test]
    fn grouping_preserves_all_entries() {
        let rows = vec![
            ("onboarding".to_string(), "start_journeys"),
            ("user_management".to_string(), "view_users"),
            ("onboarding".to_string(), "edit_templates"),
        ];
        let grouped = group_by_category(rows);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["onboarding"].len(), 2);
        assert_eq!(grouped["user_management"], vec!["view_users"]);
    }
}
