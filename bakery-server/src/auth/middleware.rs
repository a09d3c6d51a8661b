//! Authentication middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::AppError;

use crate::auth::RequestContext;
use crate::auth::context::authenticate;
use crate::security_log;
use crate::state::ServerState;

/// Authentication middleware - requires a logged-in user
///
/// Validates `Authorization: Bearer <token>` and inserts the
/// [`RequestContext`] into the request extensions.
///
/// Skipped for:
/// - `OPTIONS *` (CORS preflight)
/// - non-`/api/` paths
/// - `/api/auth/login`
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS
        || !path.starts_with("/api/")
        || path == "/api/auth/login"
    {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    let ctx = authenticate(state.get_jwt_service(), auth_header, req.uri())?;
    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

/// Admin gate - must run after [`require_auth`]
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let ctx = req
        .extensions()
        .get::<RequestContext>()
        .ok_or_else(AppError::not_authenticated)?;

    if !ctx.is_admin() {
        security_log!(
            WARN,
            "admin_required",
            user_id = ctx.user_id,
            username = %ctx.username,
            uri = %req.uri()
        );
        return Err(AppError::new(shared::ErrorCode::AdminRequired));
    }

    Ok(next.run(req).await)
}
