pub mod health;

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /accounts                                 list, create
/// /accounts/{id}                            get
/// /accounts/{id}/users                      account directory
/// /accounts/{id}/templates                  template catalog (?journey_type=)
/// /accounts/{id}/journeys                   account journeys (?status=)
///
/// /job-titles                               list, create
///
/// /roles                                    list, create
/// /roles/{id}                               get
/// /roles/{id}/default                       make default (PUT)
/// /roles/{id}/permissions                   grouped grants, assign (POST)
/// /roles/{id}/permissions/{permission_id}   remove (DELETE)
///
/// /permissions                              list, create
///
/// /users                                    create
/// /users/{id}                               get
/// /users/{id}/permissions                   effective set
/// /users/{id}/permissions/{permission_id}   direct grant (POST), revoke (DELETE)
/// /users/{id}/journeys                      user journeys
/// /users/{id}/steps                         open assigned steps
///
/// /templates                                create
/// /templates/{id}                           get
/// /templates/{id}/duplicate                 deep copy (POST)
/// /templates/{id}/steps                     ordered steps, add step (POST)
///
/// /journeys                                 create
/// /journeys/overdue                         open journeys past expected date
/// /journeys/{id}                            get (with progress)
/// /journeys/{id}/start|complete|hold|resume|cancel
/// /journeys/{id}/steps                      step instances
///
/// /steps/overdue                            open steps past due date
/// /steps/{id}                               get
/// /steps/{id}/start|complete|skip|block
/// /steps/{id}/assignee                      reassign (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Accounts.
        .route(
            "/accounts",
            get(handlers::accounts::list).post(handlers::accounts::create),
        )
        .route("/accounts/{id}", get(handlers::accounts::get_by_id))
        .route("/accounts/{id}/users", get(handlers::users::list_for_account))
        .route(
            "/accounts/{id}/templates",
            get(handlers::templates::list_for_account),
        )
        .route(
            "/accounts/{id}/journeys",
            get(handlers::journeys::list_for_account),
        )
        // Job titles.
        .route(
            "/job-titles",
            get(handlers::job_titles::list).post(handlers::job_titles::create),
        )
        // Roles.
        .route(
            "/roles",
            get(handlers::roles::list).post(handlers::roles::create),
        )
        .route("/roles/{id}", get(handlers::roles::get_by_id))
        .route("/roles/{id}/default", put(handlers::roles::set_default))
        .route(
            "/roles/{id}/permissions",
            get(handlers::permissions::list_for_role)
                .post(handlers::permissions::assign_to_role),
        )
        .route(
            "/roles/{id}/permissions/{permission_id}",
            axum::routing::delete(handlers::permissions::remove_from_role),
        )
        // Permission catalog.
        .route(
            "/permissions",
            get(handlers::permissions::list).post(handlers::permissions::create),
        )
        // Users.
        .route("/users", post(handlers::users::create))
        .route("/users/{id}", get(handlers::users::get_by_id))
        .route(
            "/users/{id}/permissions",
            get(handlers::permissions::effective_for_user),
        )
        .route(
            "/users/{id}/permissions/{permission_id}",
            post(handlers::permissions::grant_direct)
                .delete(handlers::permissions::revoke_direct),
        )
        .route("/users/{id}/journeys", get(handlers::journeys::list_for_user))
        .route(
            "/users/{id}/steps",
            get(handlers::step_instances::list_for_assignee),
        )
        // Templates.
        .route("/templates", post(handlers::templates::create))
        .route("/templates/{id}", get(handlers::templates::get_by_id))
        .route(
            "/templates/{id}/duplicate",
            post(handlers::templates::duplicate),
        )
        .route(
            "/templates/{id}/steps",
            get(handlers::templates::list_steps).post(handlers::templates::add_step),
        )
        // Journeys.
        .route("/journeys", post(handlers::journeys::create))
        .route("/journeys/overdue", get(handlers::journeys::list_overdue))
        .route("/journeys/{id}", get(handlers::journeys::get_by_id))
        .route("/journeys/{id}/start", post(handlers::journeys::start))
        .route("/journeys/{id}/complete", post(handlers::journeys::complete))
        .route("/journeys/{id}/hold", post(handlers::journeys::hold))
        .route("/journeys/{id}/resume", post(handlers::journeys::resume))
        .route("/journeys/{id}/cancel", post(handlers::journeys::cancel))
        .route("/journeys/{id}/steps", get(handlers::journeys::list_steps))
        // Step instances.
        .route(
            "/steps/overdue",
            get(handlers::step_instances::list_overdue),
        )
        .route("/steps/{id}", get(handlers::step_instances::get_by_id))
        .route("/steps/{id}/start", post(handlers::step_instances::start))
        .route(
            "/steps/{id}/complete",
            post(handlers::step_instances::complete),
        )
        .route("/steps/{id}/skip", post(handlers::step_instances::skip))
        .route("/steps/{id}/block", post(handlers::step_instances::block))
        .route(
            "/steps/{id}/assignee",
            put(handlers::step_instances::reassign),
        )
}
