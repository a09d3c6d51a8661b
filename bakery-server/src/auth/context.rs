//! Request context
//!
//! The acting identity, decoded from the bearer token and passed explicitly
//! into service calls.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::AppError;
use shared::models::UserRole;

use crate::auth::{Claims, JwtError, JwtService};
use crate::security_log;
use crate::state::ServerState;

/// Who is making the request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub user_id: i64,
    pub username: String,
    pub role: UserRole,
}

impl RequestContext {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl TryFrom<Claims> for RequestContext {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| format!("invalid subject: {}", claims.sub))?;
        let role = claims
            .role
            .parse::<UserRole>()
            .map_err(|_| format!("invalid role: {}", claims.role))?;
        Ok(Self {
            user_id,
            username: claims.username,
            role,
        })
    }
}

/// Decode the `Authorization` header into a context
pub(crate) fn authenticate(
    jwt_service: &JwtService,
    auth_header: Option<&str>,
    uri: &http::Uri,
) -> Result<RequestContext, AppError> {
    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!(WARN, "auth_missing", uri = %uri);
            return Err(AppError::not_authenticated());
        }
    };

    match jwt_service.validate_token(token) {
        Ok(claims) => RequestContext::try_from(claims)
            .map_err(|e| AppError::invalid_token(format!("Malformed token claims: {e}"))),
        Err(e) => {
            security_log!(WARN, "auth_failed", error = %e, uri = %uri);
            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

impl FromRequestParts<ServerState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Already decoded by the auth middleware
        if let Some(ctx) = parts.extensions.get::<RequestContext>() {
            return Ok(ctx.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());
        let ctx = authenticate(state.get_jwt_service(), auth_header, &parts.uri)?;
        parts.extensions.insert(ctx.clone());
        Ok(ctx)
    }
}
