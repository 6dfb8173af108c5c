use crate::identigi::{
    error::{ApiError, ErrorResponse},
    handlers::{bearer_subject, me::Profile},
    store,
    token::SessionKeys,
    validation::UpdateUser,
};
use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, instrument};

#[utoipa::path(
    patch,
    path= "/users",
    request_body = UpdateUser,
    responses (
        (status = 200, description = "Profile updated", body = Profile),
        (status = 400, description = "Malformed payload or field validation failed", body = ErrorResponse),
        (status = 403, description = "Missing or invalid session token", body = ErrorResponse),
        (status = 409, description = "Phone number already registered", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    ),
    tag= "users"
)]
#[instrument(skip(headers, pool, keys, payload))]
pub async fn update_user(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    keys: Extension<Arc<SessionKeys>>,
    payload: Option<Json<UpdateUser>>,
) -> Result<impl IntoResponse, ApiError> {
    let id = bearer_subject(&headers, &keys)?;

    let Some(Json(payload)) = payload else {
        return Err(ApiError::MissingPayload);
    };

    let field_errors = payload.validate();
    if !field_errors.is_empty() {
        debug!("Rejecting update: {field_errors:?}");
        return Err(ApiError::Validation(field_errors));
    }

    // Current record supplies the defaults for absent fields
    let user = store::get_user_by_id(&pool, id)
        .await?
        .ok_or(ApiError::NotFound(id))?;

    let mut full_name = user.full_name;
    let mut phone_number = user.phone_number;

    if let Some(new_phone) = payload.phone_number {
        // The caller keeping its own number is not a conflict
        match store::get_user_by_phone(&pool, &new_phone).await? {
            Some(holder) if holder.id != user.id => return Err(ApiError::Conflict),
            _ => phone_number = new_phone,
        }
    }

    if let Some(new_name) = payload.full_name {
        full_name = new_name;
    }

    store::update_user(&pool, user.id, &full_name, &phone_number).await?;

    debug!("Updated profile for user {}", user.id);

    Ok((
        StatusCode::OK,
        Json(Profile {
            id: user.id,
            full_name,
            phone_number,
            login_count: user.login_count,
        }),
    ))
}
