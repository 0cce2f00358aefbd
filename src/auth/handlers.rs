use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{is_valid_email, PublicUser, RegisterRequest, RegisterResponse, TokenRequest, TokenResponse},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
    },
    db::{with_deadline, WRITE_DEADLINE},
    error::{bad_request, Rejection},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/users", post(register))
        .route("/v1/token", post(issue_token))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, Rejection> {
    let Json(payload) = payload.map_err(|_| bad_request("Invalid JSON"))?;
    let payload = payload.trimmed();

    if payload.name.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
        return Err(bad_request("All Fields are required"));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(bad_request("Invalid email"));
    }

    let hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let user = with_deadline(
        WRITE_DEADLINE,
        state.store.create_user(&payload.name, &payload.email, &hash),
    )
    .await
    .map_err(|e| {
        warn!(error = %e, email = %payload.email, "create user failed");
        Rejection::from(e)
    })?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(Json(RegisterResponse {
        user: PublicUser::from(user),
    }))
}

#[instrument(skip(state, payload))]
pub async fn issue_token(
    State(state): State<AppState>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, Rejection> {
    let Json(payload) = payload.map_err(|_| bad_request("Invalid JSON"))?;
    let email = payload.email.trim();
    let password = payload.password.trim();
    if email.is_empty() || password.is_empty() {
        return Err(bad_request("Email and Password are required"));
    }

    let user = match with_deadline(WRITE_DEADLINE, state.store.user_by_email(email)).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(%email, "token request for unknown email");
            return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into()));
        }
        Err(e) => {
            error!(error = %e, "user_by_email failed");
            return Err(e.into());
        }
    };

    let ok = verify_password(password, &user.hashed_password).map_err(|e| {
        error!(error = %e, user_id = user.id, "verify_password failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    if !ok {
        warn!(user_id = user.id, "token request with wrong password");
        return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into()));
    }

    let token = JwtKeys::from_ref(&state).issue(user.id).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error generating Auth Token".to_string(),
        )
    })?;

    info!(user_id = user.id, "token issued");
    Ok(Json(TokenResponse { token }))
}
