pub mod health;
pub use self::health::health;

pub mod user_register;
pub use self::user_register::register;

pub mod user_login;
pub use self::user_login::login;

pub mod me;
pub use self::me::me;

pub mod user_update;
pub use self::user_update::update_user;

// common functions for the handlers
use crate::identigi::{
    error::ApiError,
    token::{self, SessionKeys},
};
use anyhow::anyhow;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use axum::http::{header::AUTHORIZATION, HeaderMap};
use uuid::Uuid;

/// Resolve the authenticated user id from the `Authorization` header.
///
/// The header must be exactly two space-separated tokens; the second is the
/// session token. The scheme word itself is not inspected.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] when the header is missing or
/// malformed, the token fails verification, or the subject is not a UUID.
pub fn bearer_subject(headers: &HeaderMap, keys: &SessionKeys) -> Result<Uuid, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let parts: Vec<&str> = header.split(' ').collect();
    if parts.len() != 2 {
        return Err(ApiError::Unauthorized);
    }

    let claims = keys
        .verify(parts[1], token::now_unix_seconds())
        .map_err(|_| ApiError::Unauthorized)?;

    Uuid::parse_str(&claims.id).map_err(|_| ApiError::Unauthorized)
}

/// Hash a password with a fresh random salt.
///
/// # Errors
///
/// Returns an internal error if hashing fails.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ApiError::Internal(anyhow!("Failed to hash password: {err}")))
}

/// Constant-time comparison of a candidate password against a stored hash.
/// An unparseable stored hash counts as a mismatch.
#[must_use]
pub fn verify_password(hashed_password: &str, password: &str) -> bool {
    PasswordHash::new(hashed_password).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identigi::token::{
        test_keys::{TEST_PRIVATE_KEY_PEM, TEST_PUBLIC_KEY_PEM},
        SessionClaims, SESSION_TTL_SECONDS,
    };
    use axum::http::HeaderValue;

    fn keys() -> SessionKeys {
        SessionKeys::new(
            TEST_PUBLIC_KEY_PEM.as_bytes().to_vec(),
            TEST_PRIVATE_KEY_PEM.as_bytes().to_vec(),
        )
    }

    fn token_for(id: &str) -> String {
        let claims = SessionClaims {
            id: id.to_string(),
            full_name: "test".to_string(),
            phone_number: "+62812345678".to_string(),
            exp: token::now_unix_seconds() + SESSION_TTL_SECONDS,
        };
        keys().issue(&claims).expect("token")
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).expect("header"));
        headers
    }

    #[test]
    fn bearer_subject_resolves_the_token_subject() {
        let id = Uuid::new_v4();
        let headers = headers_with(&format!("Bearer {}", token_for(&id.to_string())));

        assert_eq!(bearer_subject(&headers, &keys()).expect("subject"), id);
    }

    #[test]
    fn scheme_word_is_not_inspected() {
        let id = Uuid::new_v4();
        let headers = headers_with(&format!("Token {}", token_for(&id.to_string())));

        assert_eq!(bearer_subject(&headers, &keys()).expect("subject"), id);
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let result = bearer_subject(&HeaderMap::new(), &keys());
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[test]
    fn header_must_have_exactly_two_parts() {
        for value in ["Bearer", "Bearer a b", "Bearer  a"] {
            let result = bearer_subject(&headers_with(value), &keys());
            assert!(matches!(result, Err(ApiError::Unauthorized)), "{value}");
        }
    }

    #[test]
    fn garbage_token_is_unauthorized() {
        let result = bearer_subject(&headers_with("Bearer garbage"), &keys());
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[test]
    fn non_uuid_subject_is_unauthorized() {
        let headers = headers_with(&format!("Bearer {}", token_for("not-a-uuid")));
        let result = bearer_subject(&headers, &keys());
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("Enter123!").expect("hash");

        assert_ne!(hash, "Enter123!");
        assert!(verify_password(&hash, "Enter123!"));
        assert!(!verify_password(&hash, "Enter123?"));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("Enter123!").expect("hash");
        let second = hash_password("Enter123!").expect("hash");
        assert_ne!(first, second);
    }

    #[test]
    fn unparseable_stored_hash_is_a_mismatch() {
        assert!(!verify_password("plaintext-leftover", "Enter123!"));
    }
}
