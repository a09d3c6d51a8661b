//! Authentication Handlers

use std::time::Duration;

use axum::{Json, extract::State};
use shared::models::{LoginRequest, LoginResponse, User};
use shared::{ApiResponse, AppError, AppResult, ErrorCode};

use crate::auth::RequestContext;
use crate::auth::password::verify_password;
use crate::db::repository::user;
use crate::security_log;
use crate::state::ServerState;

/// Fixed delay applied to every login attempt before the outcome is known
const AUTH_FIXED_DELAY_MS: u64 = 200;

/// Authenticate and issue a token
///
/// Unknown usernames and wrong passwords get the same error. The password is
/// trimmed the same way it was when stored.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let username = req.username.trim();
    let credentials = user::find_credentials(&state.pool, username).await?;

    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let account = match credentials {
        Some((account, hash)) if verify_password(req.password.trim(), &hash) => account,
        Some(_) => {
            security_log!(WARN, "login_failed", username = %username, reason = "invalid_password");
            return Err(AppError::invalid_credentials());
        }
        None => {
            security_log!(WARN, "login_failed", username = %username, reason = "unknown_user");
            return Err(AppError::invalid_credentials());
        }
    };

    let jwt = state.get_jwt_service();
    let token = jwt
        .generate_token(account.id, &account.username, account.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    let now = shared::util::now_millis();
    user::touch_last_login(&state.pool, account.id, now).await?;

    security_log!(INFO, "login_success", user_id = account.id, username = %account.username);
    tracing::info!(
        user_id = account.id,
        username = %account.username,
        role = %account.role,
        "User logged in"
    );

    Ok(ApiResponse::success(LoginResponse {
        token,
        expires_in: jwt.expires_in_seconds(),
        user: User {
            last_login: Some(now),
            ..account
        },
    }))
}

/// The logged-in user's profile
pub async fn me(
    State(state): State<ServerState>,
    ctx: RequestContext,
) -> AppResult<ApiResponse<User>> {
    let account = user::find_by_id(&state.pool, ctx.user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(ApiResponse::success(account))
}
