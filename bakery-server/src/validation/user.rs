//! User validation

use regex::Regex;
use shared::models::{UserCreate, UserRole, UserUpdate};
use sqlx::SqlitePool;
use std::sync::LazyLock;

use super::{FieldErrors, MAX_EMAIL_LEN, check_person_name, is_valid_email, non_blank};
use crate::db::repository::{RepoResult, user};

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 50;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 255;

static USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._-]+$").expect("valid regex"));

pub fn validate_user_create(input: &UserCreate) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_username(&mut errors, &input.username);
    check_password(&mut errors, Some(&input.password), true);
    check_profile(&mut errors, &input.full_name, input.email.as_deref(), &input.role);
    errors
}

pub fn validate_user_update(input: &UserUpdate) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_username(&mut errors, &input.username);
    check_password(&mut errors, input.password.as_deref(), false);
    check_profile(&mut errors, &input.full_name, input.email.as_deref(), &input.role);
    errors
}

/// Add a `username` error if another account already holds the name
///
/// Skipped when the username already failed a field rule.
pub async fn check_username_available(
    pool: &SqlitePool,
    errors: &mut FieldErrors,
    username: &str,
    exclude_id: Option<i64>,
) -> RepoResult<()> {
    if errors.contains("username") {
        return Ok(());
    }
    if user::username_taken(pool, username.trim(), exclude_id).await? {
        errors.add(
            "username",
            "Username already exists. Please choose a different username.",
        );
    }
    Ok(())
}

fn check_username(errors: &mut FieldErrors, raw: &str) {
    let username = raw.trim();
    let len = username.chars().count();
    if username.is_empty() {
        errors.add("username", "Username is required.");
    } else if len < MIN_USERNAME_LEN {
        errors.add("username", "Username must be at least 3 characters long.");
    } else if len > MAX_USERNAME_LEN {
        errors.add("username", "Username must not exceed 50 characters.");
    } else if !USERNAME.is_match(username) {
        errors.add(
            "username",
            "Username can only contain letters, numbers, dots, hyphens, and underscores.",
        );
    }
}

fn check_password(errors: &mut FieldErrors, raw: Option<&str>, required: bool) {
    let password = raw.map(str::trim).unwrap_or_default();
    let len = password.chars().count();
    if password.is_empty() {
        if required {
            errors.add("password", "Password is required.");
        }
    } else if len < MIN_PASSWORD_LEN {
        errors.add("password", "Password must be at least 6 characters long.");
    } else if len > MAX_PASSWORD_LEN {
        errors.add("password", "Password must not exceed 255 characters.");
    }
}

fn check_profile(errors: &mut FieldErrors, full_name: &str, email: Option<&str>, role: &str) {
    check_person_name(errors, "full_name", full_name, false);

    if let Some(email) = non_blank(email) {
        if !is_valid_email(&email) {
            errors.add("email", "Please enter a valid email address.");
        } else if email.chars().count() > MAX_EMAIL_LEN {
            errors.add("email", "Email must not exceed 100 characters.");
        }
    }

    let role = role.trim();
    if role.is_empty() {
        errors.add("role", "Role is required.");
    } else if role.parse::<UserRole>().is_err() {
        errors.add("role", "Role must be either 'Admin' or 'Staff'.");
    }
}

/// Role of an already-validated payload
pub fn parse_role(role: &str) -> Option<UserRole> {
    role.trim().parse().ok()
}

/// New password of an update payload, `None` when blank (keep current)
pub fn new_password(input: &UserUpdate) -> Option<&str> {
    input
        .password
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
}
