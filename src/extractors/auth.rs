//! Bearer-token extraction and the admin gate for `/admin` routes.

use crate::auth::{authenticate, bearer_token, AuthUser};
use crate::error::AppError;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

/// Token from `Authorization: Bearer <token>`, or None when the header is missing or malformed.
#[derive(Clone, Debug)]
pub struct BearerToken(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .map(str::to_string);
        Ok(BearerToken(value))
    }
}

/// Admin user placed in request extensions by [`require_admin`].
#[derive(Clone, Debug)]
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("authentication required".into()))
    }
}

/// Reject the request unless it carries a token of an admin user. A missing or malformed
/// header is rejected before any database access.
pub async fn require_admin(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = token else {
        tracing::warn!(path = %req.uri().path(), "missing bearer token");
        return Err(AppError::Unauthorized("authentication required".into()));
    };
    let user = authenticate(&state.pool, &token).await.inspect_err(|e| {
        tracing::warn!(path = %req.uri().path(), error = %e, "bearer token rejected");
    })?;
    if !user.is_admin {
        tracing::warn!(user_id = user.id, "non-admin user denied");
        return Err(AppError::Forbidden("admin access required".into()));
    }
    req.extensions_mut().insert(AdminUser(user));
    Ok(next.run(req).await)
}
