//! Field attribution for backend validation messages.
//!
//! The backend's 400 responses carry one free-text `message`. The forms
//! want field-level errors, so the message is matched against known field
//! vocabulary. Substring matching is fragile by nature; it is quarantined
//! here so a structured error contract can replace it in one place.

use std::collections::BTreeMap;

/// Known (substring, field) pairs for product form errors, checked in
/// order. First match wins.
const PRODUCT_FIELD_PATTERNS: &[(&str, &str)] = &[
    ("barcode", "barcode"),
    ("title", "title"),
    ("category", "category"),
    ("price", "currentPrice"),
    ("value", "value"),
    ("quantity", "quantity"),
    ("weight", "weight"),
    ("author", "author"),
    ("artist", "artist"),
    ("album", "album"),
    ("director", "director"),
];

/// Known (substring, field) pairs for user form errors.
const USER_FIELD_PATTERNS: &[(&str, &str)] = &[
    ("email", "email"),
    ("password", "password"),
    ("phone", "phone"),
    ("role", "role"),
    ("name", "name"),
];

/// Attribute a backend product-validation message to a form field.
///
/// Unattributable messages land under `general`.
#[must_use]
pub fn attribute_product_error(message: &str) -> BTreeMap<&'static str, String> {
    attribute(message, PRODUCT_FIELD_PATTERNS)
}

/// Attribute a backend user-validation message to a form field.
#[must_use]
pub fn attribute_user_error(message: &str) -> BTreeMap<&'static str, String> {
    attribute(message, USER_FIELD_PATTERNS)
}

fn attribute(message: &str, patterns: &[(&str, &'static str)]) -> BTreeMap<&'static str, String> {
    let lower = message.to_lowercase();
    let mut errors = BTreeMap::new();

    for (needle, field) in patterns {
        if lower.contains(needle) {
            errors.insert(*field, message.to_owned());
            return errors;
        }
    }

    errors.insert("general", message.to_owned());
    errors
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_barcode_message_lands_on_barcode() {
        let errors = attribute_product_error("Barcode already exists");
        assert_eq!(errors.get("barcode").unwrap(), "Barcode already exists");
    }

    #[test]
    fn test_price_message_lands_on_current_price() {
        let errors = attribute_product_error("Price must be between 30% and 150% of value");
        assert!(errors.contains_key("currentPrice"));
    }

    #[test]
    fn test_unknown_message_is_general() {
        let errors = attribute_product_error("Something opaque went wrong");
        assert!(errors.contains_key("general"));
    }

    #[test]
    fn test_user_email_attribution() {
        let errors = attribute_user_error("Email is already registered");
        assert!(errors.contains_key("email"));
    }
}
