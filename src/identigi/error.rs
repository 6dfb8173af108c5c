//! Error taxonomy for the identity workflows and its HTTP mapping.

use crate::identigi::store::StoreError;
use crate::identigi::validation::FieldError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Error envelope returned to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            validation_errors: None,
        }
    }
}

/// Everything an identity workflow can fail with.
///
/// `NotFound` is an internal signal (a verified subject with no row) and is
/// never surfaced verbatim; clients only see an opaque 500 for it.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("field validation failed")]
    Validation(Vec<FieldError>),
    #[error("Missing payload")]
    MissingPayload,
    #[error("phone number already registered")]
    Conflict,
    #[error("user not valid")]
    InvalidCredentials,
    #[error("not logged in")]
    Unauthorized,
    #[error("user {0} not found")]
    NotFound(Uuid),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(err.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    message: "field validation failed".to_string(),
                    validation_errors: Some(errors),
                },
            ),
            Self::MissingPayload => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::message("Missing payload"),
            ),
            Self::Conflict => (
                StatusCode::CONFLICT,
                ErrorResponse::message("phone number already registered"),
            ),
            Self::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::message("user not valid"),
            ),
            Self::Unauthorized => (
                StatusCode::FORBIDDEN,
                ErrorResponse::message("not logged in"),
            ),
            err @ (Self::NotFound(_) | Self::Internal(_)) => {
                // Details stay in the logs; the client gets an opaque 500
                error!("Internal error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::message("internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn field_error() -> FieldError {
        crate::identigi::validation::RegisterUser {
            full_name: String::new(),
            phone_number: "+62812345678".to_string(),
            password: "Enter123!".to_string(),
        }
        .validate()
        .remove(0)
    }

    #[test]
    fn status_mapping() {
        let cases = [
            (ApiError::Validation(vec![field_error()]), StatusCode::BAD_REQUEST),
            (ApiError::MissingPayload, StatusCode::BAD_REQUEST),
            (ApiError::Conflict, StatusCode::CONFLICT),
            (ApiError::InvalidCredentials, StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized, StatusCode::FORBIDDEN),
            (ApiError::NotFound(Uuid::nil()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ApiError::Internal(anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn validation_envelope_carries_field_errors() {
        let body = ErrorResponse {
            message: "field validation failed".to_string(),
            validation_errors: Some(vec![field_error()]),
        };
        let value = serde_json::to_value(&body).expect("serializable");

        assert_eq!(value["message"], "field validation failed");
        assert_eq!(value["validation_errors"][0]["field"], "full_name");
        assert_eq!(value["validation_errors"][0]["message"], "field is required");
    }

    #[test]
    fn plain_envelope_omits_validation_errors() {
        let value =
            serde_json::to_value(ErrorResponse::message("not logged in")).expect("serializable");
        assert_eq!(
            value,
            serde_json::json!({"message": "not logged in"})
        );
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let response = ApiError::Internal(anyhow!("connection refused")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
