//! Logging Infrastructure
//!
//! Console output plus, when a log directory is configured, three daily
//! rolling file streams:
//! - `app/`: everything except audit and security events (kept 14 days)
//! - `audit/`: business operations such as order creation and deletions
//! - `security/`: login failures and access denials

use std::fs;
use std::path::Path;
use tracing::Subscriber;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter::filter_fn, fmt, prelude::*};

const APP_LOG_RETENTION_FILES: usize = 14;

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Default filter when `RUST_LOG` is unset (e.g. "info")
/// * `json_format` - JSON lines instead of the human-readable format
/// * `log_dir` - Optional directory for rolling log files
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer: BoxedLayer<_> = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let file_layers = match log_dir {
        Some(dir) => Some(file_layers(Path::new(dir), json_format)?),
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layers)
        .try_init()?;

    Ok(())
}

/// Console-only logging
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}

fn file_layers<S>(log_dir: &Path, json_format: bool) -> anyhow::Result<Vec<BoxedLayer<S>>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let app_dir = log_dir.join("app");
    let audit_dir = log_dir.join("audit");
    let security_dir = log_dir.join("security");
    for dir in [&app_dir, &audit_dir, &security_dir] {
        fs::create_dir_all(dir)?;
    }

    let app_log = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("app")
        .filename_suffix("log")
        .max_log_files(APP_LOG_RETENTION_FILES)
        .build(&app_dir)?;
    let audit_log = RollingFileAppender::new(Rotation::DAILY, &audit_dir, "audit.log");
    let security_log = RollingFileAppender::new(Rotation::DAILY, &security_dir, "security.log");

    Ok(vec![
        file_layer(app_log, json_format, |target| {
            target != "audit" && target != "security"
        }),
        file_layer(audit_log, json_format, |target| target == "audit"),
        file_layer(security_log, json_format, |target| target == "security"),
    ])
}

fn file_layer<S>(
    appender: RollingFileAppender,
    json_format: bool,
    accept: fn(&str) -> bool,
) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let filter = filter_fn(move |meta| accept(meta.target()));
    if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_writer(appender)
            .with_filter(filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(appender)
            .with_filter(filter)
            .boxed()
    }
}

/// Audit log helper - records business operations on the `audit` target
///
/// ```ignore
/// audit_log!(ctx.user_id, "delete", "customer:12");
/// audit_log!(ctx.user_id, "create", "order:40", "3 items");
/// ```
#[macro_export]
macro_rules! audit_log {
    ($user_id:expr, $action:expr, $resource:expr) => {
        tracing::info!(
            target: "audit",
            user_id = $user_id,
            action = $action,
            resource = %$resource,
            "AUDIT"
        );
    };
    ($user_id:expr, $action:expr, $resource:expr, $details:expr) => {
        tracing::info!(
            target: "audit",
            user_id = $user_id,
            action = $action,
            resource = %$resource,
            details = %$details,
            "AUDIT"
        );
    };
}

/// Security log helper - records auth events on the `security` target
///
/// ```ignore
/// security_log!(WARN, "login_failed", username = %username);
/// ```
#[macro_export]
macro_rules! security_log {
    (WARN, $event:expr, $($arg:tt)*) => {
        tracing::warn!(target: "security", event = $event, $($arg)*)
    };
    (INFO, $event:expr, $($arg:tt)*) => {
        tracing::info!(target: "security", event = $event, $($arg)*)
    };
}
