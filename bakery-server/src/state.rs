//! Shared server state

use std::sync::Arc;

use chrono::FixedOffset;
use sqlx::SqlitePool;

use crate::auth::{JwtConfig, JwtService};
use crate::config::Config;

/// Server state - cheap to clone, handed to every handler
///
/// | Field | Type | Notes |
/// |-------|------|-------|
/// | pool | SqlitePool | connection pool |
/// | config | Arc<Config> | immutable settings |
/// | jwt_service | Arc<JwtService> | token issue / validation |
#[derive(Clone)]
pub struct ServerState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        let jwt_service = JwtService::with_config(JwtConfig {
            secret: config.jwt_secret.clone(),
            expiration_minutes: config.jwt_expiration_minutes,
            ..JwtConfig::default()
        });
        Self {
            pool,
            config: Arc::new(config),
            jwt_service: Arc::new(jwt_service),
        }
    }

    pub fn get_jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    /// The shop's wall-clock offset, used for "today" and month windows
    pub fn business_offset(&self) -> FixedOffset {
        self.config.business_offset()
    }
}
