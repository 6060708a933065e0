//! End-to-end journey flow through the HTTP API: catalog setup, user
//! creation, journey start, step completion cascade, and error mapping.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, post_expecting, send_json};
use serde_json::json;
use sqlx::PgPool;

async fn create_account(app: &axum::Router) -> i64 {
    let json = post_expecting(
        app.clone(),
        "/api/v1/accounts",
        json!({ "name": "Acme" }),
        StatusCode::CREATED,
    )
    .await;
    json["data"]["id"].as_i64().unwrap()
}

async fn create_template(app: &axum::Router, account_id: i64, title: &str) -> i64 {
    let json = post_expecting(
        app.clone(),
        "/api/v1/templates",
        json!({
            "account_id": account_id,
            "journey_type": "onboarding",
            "title": title,
            "estimated_duration_days": 14,
        }),
        StatusCode::CREATED,
    )
    .await;
    json["data"]["id"].as_i64().unwrap()
}

async fn add_step(app: &axum::Router, template_id: i64, title: &str, due_days: i32) {
    post_expecting(
        app.clone(),
        &format!("/api/v1/templates/{template_id}/steps"),
        json!({
            "title": title,
            "step_type": "documentation",
            "due_days_from_start": due_days,
        }),
        StatusCode::CREATED,
    )
    .await;
}

async fn create_user(app: &axum::Router, account_id: i64, username: &str) -> i64 {
    let json = post_expecting(
        app.clone(),
        "/api/v1/users",
        json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "account_id": account_id,
        }),
        StatusCode::CREATED,
    )
    .await;
    // Creation returns the temporary password exactly once.
    assert!(json["data"]["initial_password"].is_string());
    json["data"]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn full_onboarding_flow(pool: PgPool) {
    let app = build_test_app(pool);

    let account_id = create_account(&app).await;
    let template_id = create_template(&app, account_id, "Engineering Onboarding").await;
    add_step(&app, template_id, "Collect documents", 1).await;
    add_step(&app, template_id, "Provision laptop", 2).await;
    let user_id = create_user(&app, account_id, "newhire").await;

    // Create and start the journey.
    let created = post_expecting(
        app.clone(),
        "/api/v1/journeys",
        json!({ "template_id": template_id, "user_id": user_id }),
        StatusCode::CREATED,
    )
    .await;
    let journey_id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["status"], "not_started");
    assert_eq!(created["data"]["progress_percentage"], 0.0);

    let started = post_expecting(
        app.clone(),
        &format!("/api/v1/journeys/{journey_id}/start"),
        json!({}),
        StatusCode::OK,
    )
    .await;
    assert_eq!(started["data"]["transitioned"], true);

    // Starting twice is a reported no-op.
    let restarted = post_expecting(
        app.clone(),
        &format!("/api/v1/journeys/{journey_id}/start"),
        json!({}),
        StatusCode::OK,
    )
    .await;
    assert_eq!(restarted["data"]["transitioned"], false);

    // Both step instances materialized.
    let steps = body_json(get(app.clone(), &format!("/api/v1/journeys/{journey_id}/steps")).await)
        .await;
    let step_ids: Vec<i64> = steps["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect();
    assert_eq!(step_ids.len(), 2);

    // Completing both steps auto-completes the journey.
    for step_id in &step_ids {
        post_expecting(
            app.clone(),
            &format!("/api/v1/steps/{step_id}/complete"),
            json!({}),
            StatusCode::OK,
        )
        .await;
    }

    let journey = body_json(get(app.clone(), &format!("/api/v1/journeys/{journey_id}")).await).await;
    assert_eq!(journey["data"]["status"], "completed");
    assert_eq!(journey["data"]["progress_percentage"], 100.0);
    assert_eq!(journey["data"]["completed_steps"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn validation_errors_map_to_http_statuses(pool: PgPool) {
    let app = build_test_app(pool);

    let account_id = create_account(&app).await;
    let template_id = create_template(&app, account_id, "Engineering Onboarding").await;

    // Duplicate title in scope -> 400 VALIDATION_ERROR.
    let response = send_json(
        app.clone(),
        "POST",
        "/api/v1/templates",
        json!({
            "account_id": account_id,
            "journey_type": "onboarding",
            "title": "Engineering Onboarding",
            "estimated_duration_days": 30,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    // Step due past the template duration -> 400.
    let response = send_json(
        app.clone(),
        "POST",
        &format!("/api/v1/templates/{template_id}/steps"),
        json!({
            "title": "Late step",
            "step_type": "documentation",
            "due_days_from_start": 15,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Missing template -> 404.
    let response = get(app.clone(), "/api/v1/templates/99999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_default_template_conflicts(pool: PgPool) {
    let app = build_test_app(pool);
    let account_id = create_account(&app).await;

    post_expecting(
        app.clone(),
        "/api/v1/templates",
        json!({
            "account_id": account_id,
            "journey_type": "onboarding",
            "title": "Standard Onboarding",
            "estimated_duration_days": 14,
            "is_default": true,
        }),
        StatusCode::CREATED,
    )
    .await;

    let response = send_json(
        app.clone(),
        "POST",
        "/api/v1/templates",
        json!({
            "account_id": account_id,
            "journey_type": "onboarding",
            "title": "Alternate Onboarding",
            "estimated_duration_days": 14,
            "is_default": true,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn effective_permissions_endpoint_resolves_union(pool: PgPool) {
    let app = build_test_app(pool);
    let account_id = create_account(&app).await;
    let user_id = create_user(&app, account_id, "dolsen").await;

    // Seeded default role is "staff"; grant it one permission and give
    // the user one direct grant.
    let roles = body_json(get(app.clone(), "/api/v1/roles").await).await;
    let staff_id = roles["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == "staff")
        .unwrap()["id"]
        .as_i64()
        .unwrap();

    let view = post_expecting(
        app.clone(),
        "/api/v1/permissions",
        json!({ "name": "View Users", "category": "user_management" }),
        StatusCode::CREATED,
    )
    .await;
    let manage = post_expecting(
        app.clone(),
        "/api/v1/permissions",
        json!({ "name": "Manage Roles", "category": "role_management" }),
        StatusCode::CREATED,
    )
    .await;
    let view_id = view["data"]["id"].as_i64().unwrap();
    let manage_id = manage["data"]["id"].as_i64().unwrap();

    post_expecting(
        app.clone(),
        &format!("/api/v1/roles/{staff_id}/permissions"),
        json!({ "permission_id": view_id }),
        StatusCode::OK,
    )
    .await;
    let response = send_json(
        app.clone(),
        "POST",
        &format!("/api/v1/users/{user_id}/permissions/{manage_id}"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let effective =
        body_json(get(app.clone(), &format!("/api/v1/users/{user_id}/permissions")).await).await;
    let codenames: Vec<&str> = effective["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(codenames, vec!["manage_roles", "view_users"]);
}
