//! Validated request payloads
//!
//! Handlers read the raw body first and only turn it into a [`Validated`]
//! payload after the lookup and ownership gate have passed, so a caller who
//! may not touch a contact never gets validation feedback about it.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashSet;
use validator::Validate;

use super::{filters, validators};
use crate::core::error::{FieldValidationError, ValidationError};

/// A request body type with string fields and declarative rules
///
/// Keys outside [`Payload::FIELDS`] are dropped before deserialization, so
/// server-controlled attributes such as `id` or `user_id` can never be set
/// through a body.
pub trait Payload: DeserializeOwned + Validate {
    /// Accepted fields, in documentation order
    const FIELDS: &'static [&'static str];

    /// Absent fields keep their stored value
    ///
    /// In a partial payload a field that is sent blank or `null` fails its
    /// rule rather than being read as absent.
    const PARTIAL: bool = false;

    /// Message for a field sent blank or `null` in a partial payload
    fn blank_message(field: &str) -> String {
        validators::string_message(field)
    }
}

/// A payload that passed filtering, type checks and field rules
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

impl<T: Payload> Validated<T> {
    /// Parse and validate a raw request body
    ///
    /// An empty body counts as `{}`. Every failing field is reported, not just
    /// the first.
    pub fn from_bytes(body: &[u8]) -> Result<Self, ValidationError> {
        let payload = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Map::new())
        } else {
            serde_json::from_slice(body).map_err(|e| ValidationError::InvalidJson {
                message: e.to_string(),
            })?
        };
        Self::from_value(payload)
    }

    /// Validate an already parsed JSON body
    pub fn from_value(payload: Value) -> Result<Self, ValidationError> {
        let Value::Object(mut object) = payload else {
            return Err(ValidationError::InvalidJson {
                message: "request body must be a JSON object".to_string(),
            });
        };

        let check_string = validators::string();
        let mut accepted = Map::new();
        let mut errors = Vec::new();
        let mut rejected = HashSet::new();

        for &field in T::FIELDS {
            let Some(value) = object.remove(field) else {
                continue;
            };
            let value = filters::apply_input_filters(field, value).map_err(|e| {
                ValidationError::InvalidJson {
                    message: e.to_string(),
                }
            })?;
            if T::PARTIAL && value.is_null() {
                errors.push(FieldValidationError::new(field, T::blank_message(field)));
                rejected.insert(field);
                continue;
            }
            match check_string(field, &value) {
                Ok(()) => {
                    accepted.insert(field.to_string(), value);
                }
                Err(message) => {
                    errors.push(FieldValidationError::new(field, message));
                    rejected.insert(field);
                }
            }
        }

        let parsed: T = serde_json::from_value(Value::Object(accepted)).map_err(|e| {
            ValidationError::InvalidJson {
                message: e.to_string(),
            }
        })?;

        if let Err(rule_errors) = parsed.validate() {
            errors.extend(
                validators::field_errors(&rule_errors)
                    .into_iter()
                    .filter(|e| !rejected.contains(e.field.as_str())),
            );
        }

        if errors.is_empty() {
            Ok(Validated(parsed))
        } else {
            errors.sort_by(|a, b| a.field.cmp(&b.field));
            Err(ValidationError::FieldErrors(errors))
        }
    }
}
