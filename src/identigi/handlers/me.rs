use crate::identigi::{
    error::{ApiError, ErrorResponse},
    handlers::bearer_subject,
    store::{self, UserRecord},
    token::SessionKeys,
};
use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

/// Profile view of a user, login counter included.
#[derive(ToSchema, Serialize, Debug)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: String,
    pub phone_number: String,
    pub login_count: i64,
}

impl From<UserRecord> for Profile {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            phone_number: user.phone_number,
            login_count: user.login_count,
        }
    }
}

#[utoipa::path(
    get,
    path= "/me",
    responses (
        (status = 200, description = "Profile of the logged in user", body = Profile),
        (status = 403, description = "Missing or invalid session token", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    ),
    tag= "me"
)]
#[instrument(skip(headers, pool, keys))]
pub async fn me(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    keys: Extension<Arc<SessionKeys>>,
) -> Result<impl IntoResponse, ApiError> {
    let id = bearer_subject(&headers, &keys)?;

    let user = store::get_user_by_id(&pool, id)
        .await?
        .ok_or(ApiError::NotFound(id))?;

    Ok((StatusCode::OK, Json(Profile::from(user))))
}
