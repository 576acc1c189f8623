//! Idempotent seed data.

use crate::auth::token::find_or_create_user;
use crate::error::AppError;
use sqlx::PgPool;

pub const ADMIN_EMAIL: &str = "admin@admin.com";
pub const ADMIN_NAME: &str = "Admin";
pub const ADMIN_PASSWORD: &str = "password";

/// Ensure the admin account exists and carries the admin flag. Returns its id.
pub async fn seed_admin(pool: &PgPool) -> Result<i64, AppError> {
    let (id, created) = find_or_create_user(pool, ADMIN_EMAIL, ADMIN_NAME, ADMIN_PASSWORD, true).await?;
    if created {
        tracing::info!(email = ADMIN_EMAIL, id, "seeded admin user");
    } else {
        sqlx::query("UPDATE \"users\" SET \"is_admin\" = TRUE, \"updated_at\" = NOW() WHERE \"id\" = $1 AND NOT \"is_admin\"")
            .bind(id)
            .execute(pool)
            .await?;
        tracing::info!(email = ADMIN_EMAIL, id, "admin user already present");
    }
    Ok(id)
}
