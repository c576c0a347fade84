//! Admin authentication.
//!
//! A single admin credential pair guards mutations. The bearer token is
//! derived deterministically from the username and the server secret,
//! so it stays valid across restarts without a session store.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::config::AuthConfig;

/// The bearer token accepted for the configured admin.
pub fn admin_token(auth: &AuthConfig) -> String {
    let mut hasher = Sha256::new();
    hasher.update(auth.admin_username.as_bytes());
    hasher.update(b"|");
    hasher.update(auth.secret_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Require a valid admin bearer token on the request.
pub fn require_admin(headers: &HeaderMap, auth: &AuthConfig) -> Result<(), ApiError> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    if token != admin_token(auth) {
        return Err(ApiError::Unauthorized("Invalid token".to_string()));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let auth = &state.config.auth;
    if req.username != auth.admin_username || req.password != auth.admin_password {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    Ok(Json(LoginResponse {
        access_token: admin_token(auth),
        token_type: "bearer".to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub username: String,
}

/// GET /api/auth/verify — check a bearer token.
pub async fn verify(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<VerifyResponse>, ApiError> {
    require_admin(&headers, &state.config.auth)?;
    Ok(Json(VerifyResponse {
        username: state.config.auth.admin_username.clone(),
    }))
}
