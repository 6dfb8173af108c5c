use crate::identigi::{
    error::{ApiError, ErrorResponse},
    handlers::verify_password,
    store,
    token::{self, SessionClaims, SessionKeys},
};
use anyhow::anyhow;
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AuthenticateUser {
    pub phone_number: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct AuthenticateResponse {
    pub id: Uuid,
    pub token: String,
}

#[utoipa::path(
    post,
    path= "/auth",
    request_body = AuthenticateUser,
    responses (
        (status = 200, description = "Login successful", body = AuthenticateResponse),
        (status = 400, description = "Malformed payload or invalid credentials", body = ErrorResponse),
        (status = 500, description = "Store or signing failure", body = ErrorResponse),
    ),
    tag= "auth"
)]
#[instrument(skip(pool, keys, payload))]
pub async fn login(
    pool: Extension<PgPool>,
    keys: Extension<Arc<SessionKeys>>,
    payload: Option<Json<AuthenticateUser>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(payload)) = payload else {
        return Err(ApiError::MissingPayload);
    };

    // Unknown numbers and wrong passwords are indistinguishable to the
    // caller, so account existence cannot be probed.
    let Some(user) = store::get_user_by_phone(&pool, &payload.phone_number).await? else {
        debug!("Unknown phone number");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&user.hashed_password, &payload.password) {
        debug!("Password mismatch for user {}", user.id);
        return Err(ApiError::InvalidCredentials);
    }

    let claims = SessionClaims {
        id: user.id.to_string(),
        full_name: user.full_name,
        phone_number: user.phone_number,
        exp: token::now_unix_seconds() + token::SESSION_TTL_SECONDS,
    };
    let token = keys
        .issue(&claims)
        .map_err(|err| ApiError::Internal(anyhow!("Failed to sign session token: {err}")))?;

    // The already-signed token is discarded when the counter update fails
    store::increment_login_count(&pool, user.id).await?;

    debug!("Login successful for user {}", user.id);

    Ok((
        StatusCode::OK,
        Json(AuthenticateResponse { id: user.id, token }),
    ))
}
