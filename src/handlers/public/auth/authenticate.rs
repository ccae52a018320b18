// handlers/public/auth/authenticate.rs - POST /api/authentication/authenticate

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::app::AppState;
use crate::auth::{generate_jwt, Claims};
use crate::config::DemoUserConfig;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Default, Deserialize)]
pub struct AuthenticationRequestBody {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthenticationResponse {
    pub token: String,
    pub expires_in: u64,
}

/// Demonstration credential check: any non-blank username and password maps to the configured user.
fn validate_user_credentials<'a>(
    username: Option<&str>,
    password: Option<&str>,
    demo_user: &'a DemoUserConfig,
) -> Option<&'a DemoUserConfig> {
    let present = |value: Option<&str>| value.is_some_and(|v| !v.trim().is_empty());
    if present(username) && present(password) {
        Some(demo_user)
    } else {
        None
    }
}

/// Exchange credentials for a signed bearer token
pub async fn authenticate_post(
    State(state): State<AppState>,
    payload: Result<Json<AuthenticationRequestBody>, JsonRejection>,
) -> ApiResult<AuthenticationResponse> {
    let Json(body) = payload?;
    let security = &state.config.security;

    let user = validate_user_credentials(body.username.as_deref(), body.password.as_deref(), &security.demo_user)
        .ok_or_else(|| {
            warn!("Rejected authentication attempt with missing credentials");
            ApiError::unauthorized("Invalid credentials")
        })?;

    let claims = Claims::new(
        user.user_id.to_string(),
        user.given_name.clone(),
        user.family_name.clone(),
        Some(user.city.clone()),
        security,
    );
    let token = generate_jwt(&claims, security)?;
    info!("Issued token for user {}", user.user_id);

    Ok(ApiResponse::success(AuthenticationResponse {
        token,
        expires_in: security.jwt_expiry_hours * 3600,
    }))
}
