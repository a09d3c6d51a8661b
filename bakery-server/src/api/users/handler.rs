//! User API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{User, UserCreate, UserUpdate};
use shared::{ApiResponse, AppError, AppResult, ErrorCode};

use crate::api::{ListQuery, missing_as};
use crate::audit_log;
use crate::auth::RequestContext;
use crate::auth::password::hash_password;
use crate::db::repository::{SortDir, user};
use crate::security_log;
use crate::services::referential_guard;
use crate::state::ServerState;
use crate::validation::non_blank;
use crate::validation::user::{
    check_username_available, new_password, parse_role, validate_user_create, validate_user_update,
};

fn hash(password: &str) -> AppResult<String> {
    hash_password(password).map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<User>>> {
    let users = user::find_all(
        &state.pool,
        query.sort.as_deref(),
        query.direction(SortDir::Asc),
    )
    .await?;
    Ok(ApiResponse::success(users))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<User>> {
    let found = user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(ApiResponse::success(found))
}

pub async fn create(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Json(payload): Json<UserCreate>,
) -> AppResult<ApiResponse<User>> {
    let mut errors = validate_user_create(&payload);
    check_username_available(&state.pool, &mut errors, &payload.username, None).await?;
    errors.into_result()?;

    let role = parse_role(&payload.role).ok_or_else(|| AppError::validation("Invalid role"))?;
    let email = non_blank(payload.email.as_deref());
    let created = user::create(
        &state.pool,
        payload.username.trim(),
        &hash(payload.password.trim())?,
        payload.full_name.trim(),
        email.as_deref(),
        role,
    )
    .await?;

    audit_log!(
        ctx.user_id,
        "create",
        format!("user:{}", created.id),
        format!("role={role}")
    );
    Ok(ApiResponse::success_with_message(
        "User added successfully!",
        created,
    ))
}

/// Edit an account; staff may only edit themselves and cannot change role
pub async fn update(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<ApiResponse<User>> {
    if !ctx.is_admin() && ctx.user_id != id {
        security_log!(
            WARN,
            "admin_required",
            user_id = ctx.user_id,
            target_user = id
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    let current = user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    let mut errors = validate_user_update(&payload);
    check_username_available(&state.pool, &mut errors, &payload.username, Some(id)).await?;
    errors.into_result()?;

    let role = parse_role(&payload.role).ok_or_else(|| AppError::validation("Invalid role"))?;
    if !ctx.is_admin() && role != current.role {
        security_log!(WARN, "role_change_denied", user_id = ctx.user_id);
        return Err(AppError::permission_denied("You cannot change your own role"));
    }

    let password_hash = new_password(&payload).map(hash).transpose()?;
    let email = non_blank(payload.email.as_deref());
    let updated = user::update(
        &state.pool,
        id,
        payload.username.trim(),
        password_hash.as_deref(),
        payload.full_name.trim(),
        email.as_deref(),
        role,
    )
    .await
    .map_err(missing_as(ErrorCode::UserNotFound))?;

    audit_log!(
        ctx.user_id,
        "update",
        format!("user:{id}"),
        format!("password_changed={}", password_hash.is_some())
    );
    Ok(ApiResponse::success_with_message(
        "User updated successfully!",
        updated,
    ))
}

/// Delete a Staff account; never the caller's own, never an Admin
pub async fn delete(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    referential_guard::delete_user(&state.pool, &ctx, id)
        .await
        .into_result(ErrorCode::UserNotFound)?;

    audit_log!(ctx.user_id, "delete", format!("user:{id}"));
    Ok(ApiResponse::ok())
}
