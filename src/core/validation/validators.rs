//! Reusable field validators and rule messages
//!
//! Length, presence and email rules are declared on the payload structs with
//! `validator` derives; this module holds the checks those derives cannot
//! express and turns rule failures into client-facing messages.

use serde_json::Value;
use validator::{ValidationError as RuleFailure, ValidationErrors};

use crate::core::error::FieldValidationError;

/// Validator: value must be a string when present
pub fn string() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if value.is_null() || value.is_string() {
            Ok(())
        } else {
            Err(string_message(field))
        }
    }
}

/// Field name as shown in messages (`postal_code` -> `postal code`)
pub fn label(field: &str) -> String {
    field.replace('_', " ")
}

pub fn required_message(field: &str) -> String {
    format!("The {} field is required.", label(field))
}

pub fn string_message(field: &str) -> String {
    format!("The {} field must be a string.", label(field))
}

pub fn email_message(field: &str) -> String {
    format!("The {} field must be a valid email address.", label(field))
}

/// Message for a single failed rule
pub fn rule_message(field: &str, failure: &RuleFailure) -> String {
    if let Some(message) = &failure.message {
        return message.to_string();
    }

    let label = label(field);
    match &*failure.code {
        "required" => required_message(field),
        "length" => match failure.params.get("max") {
            Some(max) => format!("The {label} field must not be greater than {max} characters."),
            None => format!("The {label} field has an invalid length."),
        },
        "email" => email_message(field),
        code => format!("The {label} field failed the '{code}' rule."),
    }
}

/// Flatten derive results into field errors, ordered by field name
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldValidationError> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    fields
        .into_iter()
        .flat_map(|(field, failures)| {
            let field: &str = &field;
            failures
                .iter()
                .map(|failure| FieldValidationError::new(field, rule_message(field, failure)))
                .collect::<Vec<_>>()
        })
        .collect()
}
