//! Contact model and request payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::entity::Entity;
use crate::core::error::{FieldValidationError, ValidationError};
use crate::core::validation::Payload;
use crate::core::validation::validators::{email_message, required_message, string_message};
use crate::entities::address::model::Address;

/// A person entry owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Contact {
    pub id: Uuid,
    /// Owning user; set from the principal at creation, never changed
    pub user_id: Uuid,
    #[schema(example = "John")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "john@example.com")]
    pub email: String,
    #[schema(example = "081234567890")]
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The mutable attributes of a contact, all present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl Contact {
    /// New contact owned by `user_id`
    pub fn new(user_id: Uuid, fields: ContactFields) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            email: fields.email,
            phone: fields.phone,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Contact {
    fn resource_name_singular() -> &'static str {
        "contact"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A contact with its addresses eager-loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContactWithAddresses {
    #[serde(flatten)]
    pub contact: Contact,
    pub addresses: Vec<Address>,
}

/// Body of `POST /contacts`
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct NewContact {
    #[validate(required, length(max = 100))]
    #[schema(example = "John")]
    pub first_name: Option<String>,
    #[validate(required, length(max = 100))]
    #[schema(example = "Doe")]
    pub last_name: Option<String>,
    #[validate(required, email)]
    #[schema(example = "john@example.com")]
    pub email: Option<String>,
    #[validate(required, length(max = 20))]
    #[schema(example = "081234567890")]
    pub phone: Option<String>,
}

impl Payload for NewContact {
    const FIELDS: &'static [&'static str] = &["first_name", "last_name", "email", "phone"];
}

impl TryFrom<NewContact> for ContactFields {
    type Error = ValidationError;

    fn try_from(payload: NewContact) -> Result<Self, Self::Error> {
        let mut missing = Vec::new();
        let mut take = |field: &str, value: Option<String>| {
            value.unwrap_or_else(|| {
                missing.push(FieldValidationError::new(field, required_message(field)));
                String::new()
            })
        };

        let fields = ContactFields {
            first_name: take("first_name", payload.first_name),
            last_name: take("last_name", payload.last_name),
            email: take("email", payload.email),
            phone: take("phone", payload.phone),
        };

        if missing.is_empty() {
            Ok(fields)
        } else {
            Err(ValidationError::FieldErrors(missing))
        }
    }
}

/// Body of `PUT /contacts/{contact}`; absent fields stay unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ContactPatch {
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
}

impl Payload for ContactPatch {
    const FIELDS: &'static [&'static str] = &["first_name", "last_name", "email", "phone"];
    const PARTIAL: bool = true;

    fn blank_message(field: &str) -> String {
        match field {
            "email" => email_message(field),
            _ => string_message(field),
        }
    }
}

impl ContactPatch {
    /// Apply the present fields; returns whether anything changed
    ///
    /// `updated_at` only moves when a value actually differs.
    pub fn apply_to(self, contact: &mut Contact) -> bool {
        let mut changed = false;
        for (slot, value) in [
            (&mut contact.first_name, self.first_name),
            (&mut contact.last_name, self.last_name),
            (&mut contact.email, self.email),
            (&mut contact.phone, self.phone),
        ] {
            if let Some(value) = value {
                if *slot != value {
                    *slot = value;
                    changed = true;
                }
            }
        }
        if changed {
            contact.touch();
        }
        changed
    }
}

/// `{"data": Contact}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactResponse {
    pub data: Contact,
}

/// `{"data": Contact + addresses}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactDetailResponse {
    pub data: ContactWithAddresses,
}

/// `{"data": [Contact + addresses]}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactListResponse {
    pub data: Vec<ContactWithAddresses>,
}
