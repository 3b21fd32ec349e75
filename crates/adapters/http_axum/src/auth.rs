//! Caller identity extraction.
//!
//! Authentication itself (credentials, sessions) is handled by an external
//! layer in front of this service; by the time a request arrives here it
//! carries the authenticated account id in the `x-user-id` header.

use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};

use hearth_domain::id::AccountId;

/// Header carrying the authenticated account id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller, extracted from [`USER_ID_HEADER`].
///
/// A missing or unparseable header rejects the request with `401`.
#[derive(Debug, Clone, Copy)]
pub struct CallerIdentity(pub AccountId);

/// Rejection returned when the identity header is missing or invalid.
#[derive(Debug)]
pub struct Unauthorized;

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "unauthorized"})),
        )
            .into_response()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CallerIdentity {
    type Rejection = Unauthorized;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<AccountId>().ok())
            .map(CallerIdentity)
            .ok_or(Unauthorized)
    }
}
