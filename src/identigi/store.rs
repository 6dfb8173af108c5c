//! Postgres-backed credential store.
//!
//! One function per store operation, hand-written SQL. Updates assert that
//! exactly one row was affected; anything else is a [`StoreError::RowCount`].

use sqlx::{PgPool, Row};
use thiserror::Error;
use tracing::{info_span, Instrument};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("expected to affect 1 row but got {0}")]
    RowCount(u64),
}

/// A full user row, hash included; never serialized outward.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub full_name: String,
    pub phone_number: String,
    pub hashed_password: String,
    pub login_count: i64,
}

#[derive(Debug)]
pub struct NewUser {
    pub id: Uuid,
    pub full_name: String,
    pub phone_number: String,
    pub hashed_password: String,
}

/// True when the error is the `users.phone_number` unique constraint firing.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub async fn create_user(pool: &PgPool, user: &NewUser) -> Result<(), sqlx::Error> {
    let query = "INSERT INTO users (id, full_name, phone_number, hashed_password) \
                 VALUES ($1, $2, $3, $4)";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(user.id)
        .bind(&user.full_name)
        .bind(&user.phone_number)
        .bind(&user.hashed_password)
        .execute(pool)
        .instrument(span)
        .await?;

    Ok(())
}

pub async fn get_user_by_phone(
    pool: &PgPool,
    phone_number: &str,
) -> Result<Option<UserRecord>, sqlx::Error> {
    let query = "SELECT id, full_name, phone_number, hashed_password, login_count \
                 FROM users WHERE phone_number = $1 LIMIT 1";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(phone_number)
        .fetch_optional(pool)
        .instrument(span)
        .await?;

    Ok(row.map(user_record))
}

pub async fn get_user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>, sqlx::Error> {
    let query = "SELECT id, full_name, phone_number, hashed_password, login_count \
                 FROM users WHERE id = $1 LIMIT 1";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(id)
        .fetch_optional(pool)
        .instrument(span)
        .await?;

    Ok(row.map(user_record))
}

/// Persist the merged `full_name`/`phone_number` for one user.
pub async fn update_user(
    pool: &PgPool,
    id: Uuid,
    full_name: &str,
    phone_number: &str,
) -> Result<(), StoreError> {
    let query = "UPDATE users SET full_name = $1, phone_number = $2 WHERE id = $3";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(full_name)
        .bind(phone_number)
        .bind(id)
        .execute(pool)
        .instrument(span)
        .await?;

    exactly_one(result.rows_affected())
}

pub async fn increment_login_count(pool: &PgPool, id: Uuid) -> Result<(), StoreError> {
    let query = "UPDATE users SET login_count = login_count + 1 WHERE id = $1";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(id)
        .execute(pool)
        .instrument(span)
        .await?;

    exactly_one(result.rows_affected())
}

fn user_record(row: sqlx::postgres::PgRow) -> UserRecord {
    UserRecord {
        id: row.get("id"),
        full_name: row.get("full_name"),
        phone_number: row.get("phone_number"),
        hashed_password: row.get("hashed_password"),
        login_count: row.get("login_count"),
    }
}

fn exactly_one(rows_affected: u64) -> Result<(), StoreError> {
    if rows_affected == 1 {
        Ok(())
    } else {
        Err(StoreError::RowCount(rows_affected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_accepts_single_row() {
        assert!(exactly_one(1).is_ok());
    }

    #[test]
    fn exactly_one_rejects_other_counts() {
        assert!(matches!(exactly_one(0), Err(StoreError::RowCount(0))));
        assert!(matches!(exactly_one(2), Err(StoreError::RowCount(2))));
    }

    #[test]
    fn row_count_error_names_the_count() {
        let err = exactly_one(0).unwrap_err();
        assert_eq!(err.to_string(), "expected to affect 1 row but got 0");
    }
}
