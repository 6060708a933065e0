//! Shared fixtures for the database integration tests.

use crewpath_db::models::account::{Account, CreateAccount};
use crewpath_db::models::journey::{CreateJourneyInstance, JourneyInstance};
use crewpath_db::models::step::{CreateJourneyStep, JourneyStep};
use crewpath_db::models::template::{CreateJourneyTemplate, JourneyTemplate};
use crewpath_db::models::user::{CreateUser, User};
use crewpath_db::repositories::{AccountRepo, JourneyRepo, TemplateRepo, UserRepo};
use sqlx::PgPool;

pub async fn seed_account(pool: &PgPool, name: &str) -> Account {
    AccountRepo::create(
        pool,
        &CreateAccount {
            name: name.to_string(),
            timezone: None,
            contact_email: None,
            max_users: None,
        },
    )
    .await
    .unwrap()
}

pub async fn seed_user(pool: &PgPool, account_id: i64, username: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: Some("Test".to_string()),
            last_name: Some("User".to_string()),
            account_id: Some(account_id),
            role_id: None,
            job_title_id: None,
            department: None,
            created_by: None,
        },
    )
    .await
    .unwrap()
}

pub fn template_input(account_id: i64, title: &str, duration_days: i32) -> CreateJourneyTemplate {
    CreateJourneyTemplate {
        account_id,
        journey_type: "onboarding".to_string(),
        title: title.to_string(),
        description: None,
        job_title_id: None,
        department: None,
        business_unit: None,
        estimated_duration_days: duration_days,
        is_default: None,
        created_by: None,
    }
}

pub async fn seed_template(
    pool: &PgPool,
    account_id: i64,
    title: &str,
    duration_days: i32,
) -> JourneyTemplate {
    TemplateRepo::create(pool, &template_input(account_id, title, duration_days))
        .await
        .unwrap()
}

pub fn step_input(title: &str, due_days: i32) -> CreateJourneyStep {
    CreateJourneyStep {
        title: title.to_string(),
        description: None,
        step_type: "documentation".to_string(),
        responsible_party_id: None,
        responsible_role: None,
        due_days_from_start: due_days,
        estimated_duration_hours: None,
        step_order: None,
        is_mandatory: None,
        is_blocking: None,
        requires_approval: None,
        auto_assign: None,
        notes: None,
    }
}

pub async fn seed_step(
    pool: &PgPool,
    template_id: i64,
    title: &str,
    due_days: i32,
) -> JourneyStep {
    TemplateRepo::add_step(pool, template_id, &step_input(title, due_days))
        .await
        .unwrap()
}

pub async fn seed_journey(pool: &PgPool, template_id: i64, user_id: i64) -> JourneyInstance {
    JourneyRepo::create(
        pool,
        &CreateJourneyInstance {
            template_id,
            user_id,
            notes: None,
            created_by: None,
        },
    )
    .await
    .unwrap()
}
