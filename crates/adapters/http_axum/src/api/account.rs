//! Account handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use hearth_app::ports::{AccountRepository, CommandPublisher, OverlayRepository, UsageLedger};
use hearth_app::services::account_service::ProfileUpdate;
use hearth_domain::account::Account;

use crate::auth::CallerIdentity;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for registration.
///
/// The credential hash is produced by the external auth layer; this service
/// never sees a plaintext credential.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub credential_hash: String,
}

/// Request body for profile updates; absent fields stay unchanged.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub credential_hash: Option<String>,
}

/// `POST /api/account` — register a new account.
pub async fn register<O, L, A, P>(
    State(state): State<AppState<O, L, A, P>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Account>), ApiError>
where
    O: OverlayRepository + Send + Sync + 'static,
    L: UsageLedger + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    let account = state
        .account_service
        .register(&req.username, &req.email, &req.credential_hash)
        .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// `GET /api/account` — the caller's own account.
pub async fn get<O, L, A, P>(
    State(state): State<AppState<O, L, A, P>>,
    CallerIdentity(account_id): CallerIdentity,
) -> Result<Json<Account>, ApiError>
where
    O: OverlayRepository + Send + Sync + 'static,
    L: UsageLedger + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    let account = state.account_service.get(account_id).await?;
    Ok(Json(account))
}

/// `PATCH /api/account` — update profile fields and/or the credential hash.
pub async fn update<O, L, A, P>(
    State(state): State<AppState<O, L, A, P>>,
    CallerIdentity(account_id): CallerIdentity,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<Account>, ApiError>
where
    O: OverlayRepository + Send + Sync + 'static,
    L: UsageLedger + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    if let Some(hash) = &req.credential_hash {
        state
            .account_service
            .update_credential(account_id, hash)
            .await?;
    }
    let account = state
        .account_service
        .update_profile(
            account_id,
            ProfileUpdate {
                username: req.username,
                email: req.email,
            },
        )
        .await?;
    Ok(Json(account))
}

/// `DELETE /api/account` — delete the caller's account and everything it
/// owns.
pub async fn delete<O, L, A, P>(
    State(state): State<AppState<O, L, A, P>>,
    CallerIdentity(account_id): CallerIdentity,
) -> Result<StatusCode, ApiError>
where
    O: OverlayRepository + Send + Sync + 'static,
    L: UsageLedger + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    state.account_service.delete(account_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
