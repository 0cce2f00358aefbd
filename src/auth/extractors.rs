use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::jwt::JwtKeys;
use crate::error::Rejection;

/// Identity of the caller, placed in request extensions by [`auth_gate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i64);

/// Validates `Authorization: Bearer <token>` and returns the caller.
pub fn authenticate(headers: &HeaderMap, keys: &JwtKeys) -> Result<AuthUser, Rejection> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "Missing or invalid Authorization header".to_string(),
        ))?;

    let token = header.strip_prefix("Bearer ").ok_or((
        StatusCode::UNAUTHORIZED,
        "Missing or invalid Authorization header".to_string(),
    ))?;

    match keys.verify(token) {
        Ok(user_id) => Ok(AuthUser(user_id)),
        Err(e) => {
            warn!(error = %e, "rejected bearer token");
            Err((StatusCode::UNAUTHORIZED, "Invalid token".to_string()))
        }
    }
}

/// Route layer guarding protected routes; the wrapped handler only runs for
/// requests carrying a valid token.
pub async fn auth_gate(
    State(keys): State<JwtKeys>,
    mut req: Request,
    next: Next,
) -> Result<Response, Rejection> {
    let user = authenticate(req.headers(), &keys)?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(*user);
        }
        // Not behind the gate: authenticate here instead of assuming anyone.
        let user = authenticate(&parts.headers, &JwtKeys::from_ref(state))?;
        parts.extensions.insert(user);
        Ok(user)
    }
}
