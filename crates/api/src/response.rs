//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Use
//! [`DataResponse`] instead of ad-hoc `serde_json::json!({ "data": ... })`
//! to get compile-time type safety and consistent serialization.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Response body for lifecycle transition endpoints.
///
/// `transitioned` is `false` when the operation was a valid no-op, for
/// example starting an already-started journey.
#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub transitioned: bool,
}
