//! Customer validation

use regex::Regex;
use shared::models::CustomerInput;
use std::sync::LazyLock;

use super::{
    FieldErrors, MAX_NOTE_LEN, check_max_len, check_person_name, has_outer_whitespace,
    is_valid_email, non_blank,
};

/// `+230 XXXX XXXX`
pub const PHONE_LEN: usize = 14;

static PHONE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+230 [0-9]{4} [0-9]{4}$").expect("valid regex"));

static MOBILE_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+230 [5-9][0-9]{3} [0-9]{4}$").expect("valid regex"));

pub fn validate_customer(input: &CustomerInput) -> FieldErrors {
    let mut errors = FieldErrors::new();

    check_person_name(&mut errors, "full_name", &input.full_name, true);
    check_phone(&mut errors, &input.phone_number);

    if let Some(email) = non_blank(input.email.as_deref())
        && !is_valid_email(&email)
    {
        errors.add("email", "Invalid Email format.");
    }

    check_max_len(
        &mut errors,
        "address",
        input.address.as_deref(),
        MAX_NOTE_LEN,
        "Address cannot exceed 500 characters.",
    );
    check_max_len(
        &mut errors,
        "notes",
        input.notes.as_deref(),
        MAX_NOTE_LEN,
        "Notes cannot exceed 500 characters.",
    );

    errors
}

fn check_phone(errors: &mut FieldErrors, raw: &str) {
    let phone = raw.trim();
    if phone.is_empty() {
        errors.add("phone_number", "Phone Number is required.");
    } else if phone.chars().count() != PHONE_LEN {
        errors.add(
            "phone_number",
            "Phone Number must be exactly 14 characters in format +230 XXXX XXXX",
        );
    } else if !PHONE_SHAPE.is_match(phone) {
        errors.add(
            "phone_number",
            "Phone Number must be in the format: +230 XXXX XXXX (e.g., +230 5123 4567)",
        );
    } else if has_outer_whitespace(raw) {
        errors.add("phone_number", "Phone Number cannot start or end with spaces.");
    } else if !MOBILE_PHONE.is_match(phone) {
        errors.add(
            "phone_number",
            "Phone Number must start with 5, 6, 7, 8, or 9 after +230 (mobile numbers only)",
        );
    }
}

/// Trim text fields and turn blank optionals into `None`
pub fn normalize_customer(input: CustomerInput) -> CustomerInput {
    CustomerInput {
        full_name: input.full_name.trim().to_string(),
        phone_number: input.phone_number.trim().to_string(),
        email: non_blank(input.email.as_deref()),
        address: non_blank(input.address.as_deref()),
        notes: non_blank(input.notes.as_deref()),
    }
}
