//! Permission catalog and resolution integration tests.

mod common;

use assert_matches::assert_matches;
use crewpath_core::error::{
    CoreError, CONSTRAINT_DUPLICATE_ROLE_PERMISSION, CONSTRAINT_UNIQUE_DEFAULT_ROLE,
};
use crewpath_db::models::permission::{AssignRolePermission, CreatePermission};
use crewpath_db::models::role::CreateRole;
use crewpath_db::models::user::CreateUser;
use crewpath_db::repositories::{PermissionRepo, RoleRepo, UserRepo};
use crewpath_db::DbError;
use sqlx::PgPool;

use common::{seed_account, seed_user};

fn permission_input(name: &str, category: &str) -> CreatePermission {
    CreatePermission {
        name: name.to_string(),
        codename: None,
        description: None,
        category: category.to_string(),
        level: None,
    }
}

fn grant(permission_id: i64, is_granted: bool) -> AssignRolePermission {
    AssignRolePermission {
        permission_id,
        is_granted: Some(is_granted),
        constraints: None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn permission_codename_derived_from_name(pool: PgPool) {
    let created = PermissionRepo::create(&pool, &permission_input("Can View Users", "user_management"))
        .await
        .unwrap();
    assert_eq!(created.codename, "can_view_users");
    assert_eq!(created.level, "view");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_category_and_level_rejected(pool: PgPool) {
    let err = PermissionRepo::create(&pool, &permission_input("View Invoices", "billing"))
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation { .. }));

    let mut input = permission_input("View Users", "user_management");
    input.level = Some("superuser".to_string());
    let err = PermissionRepo::create(&pool, &input).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation { .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn assign_upserts_existing_pair(pool: PgPool) {
    let role = RoleRepo::find_by_name(&pool, "manager").await.unwrap().unwrap();
    let perm = PermissionRepo::create(&pool, &permission_input("Delete Users", "user_management"))
        .await
        .unwrap();

    let first = PermissionRepo::assign_to_role(&pool, role.id, &grant(perm.id, true))
        .await
        .unwrap();
    assert!(first.is_granted);

    // Re-assigning the same pair flips the flag in place.
    let second = PermissionRepo::assign_to_role(&pool, role.id, &grant(perm.id, false))
        .await
        .unwrap();
    assert_eq!(second.id, first.id);
    assert!(!second.is_granted);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn strict_add_rejects_existing_pair(pool: PgPool) {
    let role = RoleRepo::find_by_name(&pool, "manager").await.unwrap().unwrap();
    let perm = PermissionRepo::create(&pool, &permission_input("Delete Users", "user_management"))
        .await
        .unwrap();
    PermissionRepo::add_to_role(&pool, role.id, &grant(perm.id, true))
        .await
        .unwrap();

    let err = PermissionRepo::add_to_role(&pool, role.id, &grant(perm.id, false))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        DbError::Core(CoreError::Validation {
            constraint: CONSTRAINT_DUPLICATE_ROLE_PERMISSION,
            ..
        })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn role_has_requires_explicit_grant(pool: PgPool) {
    let role = RoleRepo::find_by_name(&pool, "manager").await.unwrap().unwrap();
    let view = PermissionRepo::create(&pool, &permission_input("View Users", "user_management"))
        .await
        .unwrap();
    let delete = PermissionRepo::create(&pool, &permission_input("Delete Users", "user_management"))
        .await
        .unwrap();
    PermissionRepo::assign_to_role(&pool, role.id, &grant(view.id, true))
        .await
        .unwrap();
    PermissionRepo::assign_to_role(&pool, role.id, &grant(delete.id, false))
        .await
        .unwrap();

    assert!(PermissionRepo::role_has(&pool, role.id, "view_users").await.unwrap());
    // A deny row and a missing row both resolve to false.
    assert!(!PermissionRepo::role_has(&pool, role.id, "delete_users").await.unwrap());
    assert!(!PermissionRepo::role_has(&pool, role.id, "manage_roles").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn effective_permissions_union_role_and_direct(pool: PgPool) {
    let account = seed_account(&pool, "Acme").await;
    let role = RoleRepo::find_by_name(&pool, "manager").await.unwrap().unwrap();
    let user = UserRepo::create(
        &pool,
        &CreateUser {
            username: "dolsen".to_string(),
            email: "dolsen@example.com".to_string(),
            first_name: None,
            last_name: None,
            account_id: Some(account.id),
            role_id: Some(role.id),
            job_title_id: None,
            department: None,
            created_by: None,
        },
    )
    .await
    .unwrap();

    let view = PermissionRepo::create(&pool, &permission_input("View Users", "user_management"))
        .await
        .unwrap();
    let delete = PermissionRepo::create(&pool, &permission_input("Delete Users", "user_management"))
        .await
        .unwrap();
    let manage = PermissionRepo::create(&pool, &permission_input("Manage Roles", "role_management"))
        .await
        .unwrap();
    PermissionRepo::assign_to_role(&pool, role.id, &grant(view.id, true))
        .await
        .unwrap();
    PermissionRepo::assign_to_role(&pool, role.id, &grant(delete.id, false))
        .await
        .unwrap();
    PermissionRepo::grant_direct(&pool, user.id, manage.id).await.unwrap();
    // Directly granted despite the role-level deny.
    PermissionRepo::grant_direct(&pool, user.id, delete.id).await.unwrap();

    let effective = PermissionRepo::effective_permissions(&pool, user.id)
        .await
        .unwrap();
    assert!(effective.contains("view_users"));
    assert!(effective.contains("manage_roles"));
    // A role-level deny does not revoke a direct grant.
    assert!(effective.contains("delete_users"));
    assert_eq!(effective.len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_without_role_keeps_direct_grants(pool: PgPool) {
    let perm = PermissionRepo::create(&pool, &permission_input("View Reports", "reporting"))
        .await
        .unwrap();
    let user = UserRepo::create(
        &pool,
        &CreateUser {
            username: "contractor".to_string(),
            email: "contractor@example.com".to_string(),
            first_name: None,
            last_name: None,
            account_id: None,
            role_id: None,
            job_title_id: None,
            department: None,
            created_by: None,
        },
    )
    .await
    .unwrap();
    // Default role fallback applies; strip it to simulate a roleless user.
    sqlx::query("UPDATE users SET role_id = NULL WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();
    PermissionRepo::grant_direct(&pool, user.id, perm.id).await.unwrap();

    let effective = PermissionRepo::effective_permissions(&pool, user.id)
        .await
        .unwrap();
    assert_eq!(effective.len(), 1);
    assert!(effective.contains("view_reports"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn revoking_direct_grant_removes_it(pool: PgPool) {
    let account = seed_account(&pool, "Acme").await;
    let user = seed_user(&pool, account.id, "dolsen").await;
    let perm = PermissionRepo::create(&pool, &permission_input("View Reports", "reporting"))
        .await
        .unwrap();

    PermissionRepo::grant_direct(&pool, user.id, perm.id).await.unwrap();
    // Granting twice is idempotent.
    PermissionRepo::grant_direct(&pool, user.id, perm.id).await.unwrap();
    assert!(PermissionRepo::revoke_direct(&pool, user.id, perm.id).await.unwrap());
    assert!(!PermissionRepo::revoke_direct(&pool, user.id, perm.id).await.unwrap());

    let effective = PermissionRepo::effective_permissions(&pool, user.id)
        .await
        .unwrap();
    assert!(!effective.contains("view_reports"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_default_role_conflicts(pool: PgPool) {
    // The seed data already designates a default role.
    let err = RoleRepo::create(
        &pool,
        &CreateRole {
            name: "intern".to_string(),
            display_name: "Intern".to_string(),
            description: None,
            level: None,
            is_default: Some(true),
        },
    )
    .await
    .unwrap_err();
    assert_matches!(
        err,
        DbError::Core(CoreError::Conflict {
            constraint: CONSTRAINT_UNIQUE_DEFAULT_ROLE,
            ..
        })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn set_default_moves_the_flag(pool: PgPool) {
    let read_only = RoleRepo::find_by_name(&pool, "read_only").await.unwrap().unwrap();
    let previous = RoleRepo::default_role(&pool).await.unwrap().unwrap();
    assert_ne!(previous.id, read_only.id);

    RoleRepo::set_default(&pool, read_only.id).await.unwrap();
    let current = RoleRepo::default_role(&pool).await.unwrap().unwrap();
    assert_eq!(current.id, read_only.id);

    let previous = RoleRepo::find_by_id(&pool, previous.id).await.unwrap().unwrap();
    assert!(!previous.is_default);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn new_users_fall_back_to_default_role(pool: PgPool) {
    let account = seed_account(&pool, "Acme").await;
    let user = seed_user(&pool, account.id, "newhire").await;
    let default_role = RoleRepo::default_role(&pool).await.unwrap().unwrap();
    assert_eq!(user.role_id, Some(default_role.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_role_level_rejected(pool: PgPool) {
    let err = RoleRepo::create(
        &pool,
        &CreateRole {
            name: "overlord".to_string(),
            display_name: "Overlord".to_string(),
            description: None,
            level: Some(0),
            is_default: None,
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation { .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn granted_permissions_grouped_by_category(pool: PgPool) {
    let role = RoleRepo::find_by_name(&pool, "manager").await.unwrap().unwrap();
    let view = PermissionRepo::create(&pool, &permission_input("View Users", "user_management"))
        .await
        .unwrap();
    let start = PermissionRepo::create(&pool, &permission_input("Start Journeys", "onboarding"))
        .await
        .unwrap();
    let edit = PermissionRepo::create(&pool, &permission_input("Edit Templates", "onboarding"))
        .await
        .unwrap();
    for perm in [&view, &start, &edit] {
        PermissionRepo::assign_to_role(&pool, role.id, &grant(perm.id, true))
            .await
            .unwrap();
    }

    let grouped = PermissionRepo::role_permissions_by_category(&pool, role.id)
        .await
        .unwrap();
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped["onboarding"].len(), 2);
    assert_eq!(grouped["user_management"].len(), 1);
}
