use crate::identigi::{
    error::{ApiError, ErrorResponse},
    handlers::hash_password,
    store::{self, NewUser},
    validation::RegisterUser,
};
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use sqlx::PgPool;
use tracing::{debug, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

/// Public view of a freshly created user; the hash never leaves the store.
#[derive(ToSchema, Serialize, Debug)]
pub struct UserResponse {
    pub id: Uuid,
    pub full_name: String,
    pub phone_number: String,
}

#[utoipa::path(
    post,
    path= "/users",
    request_body = RegisterUser,
    responses (
        (status = 201, description = "Registration successful", body = UserResponse),
        (status = 400, description = "Malformed payload or field validation failed", body = ErrorResponse),
        (status = 409, description = "Phone number already registered", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    ),
    tag= "users"
)]
#[instrument(skip(pool, payload))]
pub async fn register(
    pool: Extension<PgPool>,
    payload: Option<Json<RegisterUser>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(payload)) = payload else {
        return Err(ApiError::MissingPayload);
    };

    let field_errors = payload.validate();
    if !field_errors.is_empty() {
        debug!("Rejecting registration: {field_errors:?}");
        return Err(ApiError::Validation(field_errors));
    }

    // check if phone number already exists in DB
    if store::get_user_by_phone(&pool, &payload.phone_number)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict);
    }

    let user = NewUser {
        id: Uuid::new_v4(),
        full_name: payload.full_name,
        phone_number: payload.phone_number,
        hashed_password: hash_password(&payload.password)?,
    };

    if let Err(err) = store::create_user(&pool, &user).await {
        // Two concurrent registrations can both pass the lookup above; the
        // unique constraint on phone_number closes that window.
        if store::is_unique_violation(&err) {
            return Err(ApiError::Conflict);
        }
        return Err(err.into());
    }

    debug!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id: user.id,
            full_name: user.full_name,
            phone_number: user.phone_number,
        }),
    ))
}
