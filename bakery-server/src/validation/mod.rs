//! Input validation
//!
//! Per-entity field rules. Each validator is a pure function returning a
//! [`FieldErrors`] map (empty = valid); the first failing rule per field
//! wins. Storage-dependent checks (username uniqueness) live beside them but
//! take the pool explicitly.

pub mod customer;
pub mod order;
pub mod product;
pub mod user;

use regex::Regex;
use shared::AppError;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use validator::ValidateEmail;

// ── Text length limits ──────────────────────────────────────────────

/// Person names (customers, users)
pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 100;

/// Notes, descriptions, special requirements, addresses
pub const MAX_NOTE_LEN: usize = 500;

/// Short labels: category, item size
pub const MAX_LABEL_LEN: usize = 50;

/// Free-text size options on a product
pub const MAX_SIZE_OPTIONS_LEN: usize = 255;

/// Email addresses on user accounts
pub const MAX_EMAIL_LEN: usize = 100;

static PERSON_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z \-'.]+$").expect("valid regex"));

static DOUBLE_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

/// Field name → message, ordered by field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error unless the field already has one
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `Ok(())` when empty
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::validation_fields(errors.0)
    }
}

/// Trimmed value, `None` when blank
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    email.validate_email()
}

pub(crate) fn has_outer_whitespace(raw: &str) -> bool {
    raw.trim() != raw
}

/// Person-name rules shared by customers and users
///
/// `strict_spacing` additionally rejects surrounding and repeated spaces.
pub(crate) fn check_person_name(
    errors: &mut FieldErrors,
    field: &str,
    raw: &str,
    strict_spacing: bool,
) {
    let name = raw.trim();
    let len = name.chars().count();
    if name.is_empty() {
        errors.add(field, "Full Name is required.");
    } else if len < MIN_NAME_LEN {
        errors.add(field, "Full Name must be at least 2 characters long.");
    } else if len > MAX_NAME_LEN {
        errors.add(field, "Full Name must not exceed 100 characters.");
    } else if !PERSON_NAME.is_match(name) {
        errors.add(
            field,
            "Full Name can only contain letters, spaces, hyphens, apostrophes, and periods.",
        );
    } else if strict_spacing && has_outer_whitespace(raw) {
        errors.add(field, "Full Name cannot start or end with spaces.");
    } else if strict_spacing && DOUBLE_SPACE.is_match(name) {
        errors.add(field, "Full Name cannot contain multiple consecutive spaces.");
    }
}

/// Length bound for optional free text
pub(crate) fn check_max_len(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
    message: &str,
) {
    if value.is_some_and(|v| v.chars().count() > max) {
        errors.add(field, message);
    }
}
