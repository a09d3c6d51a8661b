//! Server configuration

use chrono::{FixedOffset, Offset, Utc};
use shared::{AppError, ErrorCode};

fn config_error(msg: String) -> AppError {
    AppError::with_message(ErrorCode::ConfigError, msg)
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL, e.g. `sqlite://bakery.db`
    pub database_url: String,
    /// HTTP listen port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HMAC secret for access tokens
    pub jwt_secret: String,
    /// Access token lifetime
    pub jwt_expiration_minutes: i64,
    /// Offset of the shop's wall clock from UTC (Mauritius is +04:00)
    pub business_utc_offset_minutes: i32,
    /// Default log level when RUST_LOG is unset
    pub log_level: String,
    /// Emit JSON log lines
    pub log_json: bool,
    /// Directory for rolling log files (console only when unset)
    pub log_dir: Option<String>,
    /// First Admin account, created only when the users table is empty
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let environment = get("ENVIRONMENT").unwrap_or_else(|| "development".into());

        let business_utc_offset_minutes = parse_or("BUSINESS_UTC_OFFSET_MINUTES", &get, 240)?;
        if !(-14 * 60..=14 * 60).contains(&business_utc_offset_minutes) {
            return Err(config_error(format!(
                "BUSINESS_UTC_OFFSET_MINUTES out of range: {business_utc_offset_minutes}"
            )));
        }

        let bootstrap_admin = match (
            get("BOOTSTRAP_ADMIN_USERNAME").filter(|s| !s.is_empty()),
            get("BOOTSTRAP_ADMIN_PASSWORD").filter(|s| !s.is_empty()),
        ) {
            (Some(username), Some(password)) => Some(BootstrapAdmin { username, password }),
            _ => None,
        };

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| "sqlite://bakery.db".into()),
            http_port: parse_or("HTTP_PORT", &get, 8080)?,
            jwt_secret: require_secret("JWT_SECRET", &get, &environment)?,
            jwt_expiration_minutes: parse_or("JWT_EXPIRATION_MINUTES", &get, 480)?,
            business_utc_offset_minutes,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: parse_or("LOG_JSON", &get, false)?,
            log_dir: get("LOG_DIR").filter(|s| !s.is_empty()),
            bootstrap_admin,
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// The shop's fixed UTC offset
    pub fn business_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.business_utc_offset_minutes * 60).unwrap_or(Utc.fix())
    }
}

/// Require a secret: must be set and non-empty outside development.
fn require_secret(
    name: &str,
    get: &impl Fn(&str) -> Option<String>,
    environment: &str,
) -> Result<String, AppError> {
    let val = match get(name) {
        Some(v) => v,
        None => {
            if environment != "development" {
                return Err(config_error(format!(
                    "{name} must be set in {environment} environment"
                )));
            }
            format!("dev-{name}-not-for-production")
        }
    };
    if val.is_empty() && environment != "development" {
        return Err(config_error(format!(
            "{name} must not be empty in {environment} environment"
        )));
    }
    Ok(val)
}

fn parse_or<T>(name: &str, get: &impl Fn(&str) -> Option<String>, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
{
    match get(name).filter(|s| !s.is_empty()) {
        Some(raw) => raw
            .parse()
            .map_err(|_| config_error(format!("{name} has an invalid value: {raw}"))),
        None => Ok(default),
    }
}
