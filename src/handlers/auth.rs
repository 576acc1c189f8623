//! Token login for admin users.

use crate::auth::login as issue_login_token;
use crate::error::AppError;
use crate::response::success_one;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, AppError> {
    let email = body.email.trim();
    if email.is_empty() || body.password.is_empty() {
        let mut errors = crate::error::FieldErrors::new();
        if email.is_empty() {
            errors.insert("email".into(), vec!["The email field is required.".into()]);
        }
        if body.password.is_empty() {
            errors.insert("password".into(), vec!["The password field is required.".into()]);
        }
        return Err(AppError::InvalidForm(errors));
    }
    let token = issue_login_token(&state.pool, email, &body.password).await?;
    Ok(success_one(json!({
        "token": token,
        "token_type": "Bearer",
    })))
}
