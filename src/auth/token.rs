//! Personal access tokens: plaintext `"{id}|{secret}"` handed out once, only the sha256 of the secret stored.

use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};
use sqlx::{PgConnection, PgPool};

pub const TEST_USER_EMAIL: &str = "test@example.com";
pub const TEST_USER_NAME: &str = "Test User";
pub const TEST_USER_PASSWORD: &str = "password";
pub const TEST_TOKEN_NAME: &str = "test-token";
pub const LOGIN_TOKEN_NAME: &str = "admin-login";

/// Length of the random part of a token.
pub const SECRET_LEN: usize = 40;

/// The user a bearer token resolved to.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AuthUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

pub fn random_secret() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(SECRET_LEN)
        .map(char::from)
        .collect()
}

/// Hex sha256, the stored form of a secret.
pub fn digest(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Split `"{id}|{secret}"`. A token without an id prefix is treated as a bare secret.
pub fn parse_plain(token: &str) -> (Option<i64>, &str) {
    match token.split_once('|') {
        Some((id, secret)) => (id.parse().ok(), secret),
        None => (None, token),
    }
}

/// Value of an `Authorization: Bearer <token>` header, if well formed.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Id of the user with `email`, inserting it with the given name and password when absent.
/// The flag is true when the row was created.
pub async fn find_or_create_user(
    pool: &PgPool,
    email: &str,
    name: &str,
    password: &str,
    is_admin: bool,
) -> Result<(i64, bool), AppError> {
    let hash = hash_password(password)?;
    let inserted: Option<(i64,)> = sqlx::query_as(
        "INSERT INTO \"users\" (\"name\", \"email\", \"password\", \"is_admin\") VALUES ($1, $2, $3, $4) \
         ON CONFLICT (\"email\") DO NOTHING RETURNING \"id\"",
    )
    .bind(name)
    .bind(email)
    .bind(&hash)
    .bind(is_admin)
    .fetch_optional(pool)
    .await?;
    if let Some((id,)) = inserted {
        return Ok((id, true));
    }
    let (id,): (i64,) = sqlx::query_as("SELECT \"id\" FROM \"users\" WHERE \"email\" = $1")
        .bind(email)
        .fetch_one(pool)
        .await?;
    Ok((id, false))
}

/// Store a new token for `user_id` and return its plaintext form.
pub async fn issue_token(
    pool: &PgPool,
    user_id: i64,
    name: &str,
    expires_at: Option<DateTime<Utc>>,
) -> Result<String, AppError> {
    let mut conn = pool.acquire().await?;
    insert_token(&mut conn, user_id, name, expires_at).await
}

async fn insert_token(
    conn: &mut PgConnection,
    user_id: i64,
    name: &str,
    expires_at: Option<DateTime<Utc>>,
) -> Result<String, AppError> {
    let secret = random_secret();
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO \"personal_access_tokens\" (\"user_id\", \"name\", \"token\", \"expires_at\") \
         VALUES ($1, $2, $3, $4) RETURNING \"id\"",
    )
    .bind(user_id)
    .bind(name)
    .bind(digest(&secret))
    .bind(expires_at)
    .fetch_one(&mut *conn)
    .await?;
    tracing::info!(user_id, token_id = id, name, "issued access token");
    Ok(format!("{}|{}", id, secret))
}

async fn delete_tokens(conn: &mut PgConnection, user_id: i64) -> Result<u64, AppError> {
    let done = sqlx::query("DELETE FROM \"personal_access_tokens\" WHERE \"user_id\" = $1")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    Ok(done.rows_affected())
}

/// Delete every token of `user_id`. Returns how many were removed.
pub async fn revoke_all(pool: &PgPool, user_id: i64) -> Result<u64, AppError> {
    let mut conn = pool.acquire().await?;
    delete_tokens(&mut conn, user_id).await
}

/// Ensure the fixed test user exists, drop its tokens, and issue a single fresh one.
/// The user row is locked for the rotation so concurrent calls leave exactly one token.
pub async fn issue_test_token(pool: &PgPool) -> Result<String, AppError> {
    let (user_id, created) =
        find_or_create_user(pool, TEST_USER_EMAIL, TEST_USER_NAME, TEST_USER_PASSWORD, false).await?;
    if created {
        tracing::info!(email = TEST_USER_EMAIL, "created test user");
    }
    let mut tx = pool.begin().await?;
    sqlx::query("SELECT 1 FROM \"users\" WHERE \"id\" = $1 FOR UPDATE")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    let revoked = delete_tokens(&mut tx, user_id).await?;
    tracing::debug!(user_id, revoked, "revoked previous tokens");
    let token = insert_token(&mut tx, user_id, TEST_TOKEN_NAME, None).await?;
    tx.commit().await?;
    Ok(token)
}

/// Resolve a plaintext token to its user, rejecting unknown and expired tokens.
pub async fn authenticate(pool: &PgPool, token: &str) -> Result<AuthUser, AppError> {
    let (token_id, secret) = parse_plain(token);
    let row: Option<(i64, Option<DateTime<Utc>>, i64, String, String, bool)> = sqlx::query_as(
        "SELECT t.\"id\", t.\"expires_at\", u.\"id\", u.\"name\", u.\"email\", u.\"is_admin\" \
         FROM \"personal_access_tokens\" t JOIN \"users\" u ON u.\"id\" = t.\"user_id\" \
         WHERE t.\"token\" = $1 AND ($2::bigint IS NULL OR t.\"id\" = $2::bigint)",
    )
    .bind(digest(secret))
    .bind(token_id)
    .fetch_optional(pool)
    .await?;

    let Some((id, expires_at, user_id, name, email, is_admin)) = row else {
        return Err(AppError::Unauthorized("invalid access token".into()));
    };
    if expires_at.is_some_and(|at| at <= Utc::now()) {
        return Err(AppError::Unauthorized("access token expired".into()));
    }
    sqlx::query("UPDATE \"personal_access_tokens\" SET \"last_used_at\" = NOW() WHERE \"id\" = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(AuthUser {
        id: user_id,
        name,
        email,
        is_admin,
    })
}

/// Check credentials of an admin user and issue a token for them.
pub async fn login(pool: &PgPool, email: &str, password: &str) -> Result<String, AppError> {
    let row: Option<(i64, String, bool)> =
        sqlx::query_as("SELECT \"id\", \"password\", \"is_admin\" FROM \"users\" WHERE \"email\" = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;
    let Some((user_id, _, is_admin)) = row.filter(|(_, hash, _)| verify_password(password, hash)) else {
        tracing::warn!(email, "login rejected");
        return Err(AppError::Unauthorized("these credentials do not match our records".into()));
    };
    if !is_admin {
        return Err(AppError::Forbidden("admin access required".into()));
    }
    issue_token(pool, user_id, LOGIN_TOKEN_NAME, None).await
}
