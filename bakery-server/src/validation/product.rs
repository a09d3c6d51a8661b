//! Product validation

use shared::models::ProductInput;

use super::{
    FieldErrors, MAX_LABEL_LEN, MAX_NOTE_LEN, MAX_SIZE_OPTIONS_LEN, check_max_len, non_blank,
};

/// Largest price a fixed-precision `DECIMAL(10,2)` column holds
pub const MAX_BASE_PRICE: f64 = 99_999_999.99;

pub fn validate_product(input: &ProductInput) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if input.cake_name.trim().is_empty() {
        errors.add("cake_name", "Cake Name is required.");
    } else if input.cake_name.trim().chars().count() > MAX_NOTE_LEN {
        errors.add("cake_name", "Cake Name cannot exceed 500 characters.");
    }

    match input.base_price {
        None => errors.add("base_price", "Base Price is required."),
        Some(price) if !price.is_finite() || price < 0.0 => {
            errors.add("base_price", "Base Price must be a valid positive number.")
        }
        Some(price) if price > MAX_BASE_PRICE => {
            errors.add("base_price", "Base Price cannot exceed 99,999,999.99.")
        }
        Some(_) => {}
    }

    check_max_len(
        &mut errors,
        "category",
        input.category.as_deref(),
        MAX_LABEL_LEN,
        "Category cannot exceed 50 characters.",
    );
    check_max_len(
        &mut errors,
        "size_options",
        input.size_options.as_deref(),
        MAX_SIZE_OPTIONS_LEN,
        "Size Options cannot exceed 255 characters.",
    );
    check_max_len(
        &mut errors,
        "description",
        input.description.as_deref(),
        MAX_NOTE_LEN,
        "Description cannot exceed 500 characters.",
    );

    errors
}

/// Trim text fields and turn blank optionals into `None`
pub fn normalize_product(input: ProductInput) -> ProductInput {
    ProductInput {
        cake_name: input.cake_name.trim().to_string(),
        base_price: input.base_price,
        category: non_blank(input.category.as_deref()),
        description: non_blank(input.description.as_deref()),
        custom_available: input.custom_available,
        size_options: non_blank(input.size_options.as_deref()),
    }
}
