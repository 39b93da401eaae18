//! Address model and request payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::entity::Entity;
use crate::core::error::{FieldValidationError, ValidationError};
use crate::core::validation::Payload;
use crate::core::validation::validators::required_message;

/// A postal address belonging to exactly one contact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Address {
    pub id: Uuid,
    /// Parent contact; fixed at creation
    pub contact_id: Uuid,
    #[schema(example = "Jalan Sudirman No. 123")]
    pub street: String,
    #[schema(example = "Jakarta")]
    pub city: String,
    #[schema(example = "DKI Jakarta")]
    pub province: String,
    #[schema(example = "Indonesia")]
    pub country: String,
    #[schema(example = "12345")]
    pub postal_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressFields {
    pub street: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub postal_code: String,
}

impl Address {
    pub fn new(contact_id: Uuid, fields: AddressFields) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            contact_id,
            street: fields.street,
            city: fields.city,
            province: fields.province,
            country: fields.country,
            postal_code: fields.postal_code,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Address {
    fn resource_name_singular() -> &'static str {
        "address"
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

/// Body of `POST /contacts/{contact}/addresses`
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct NewAddress {
    #[validate(required, length(max = 200))]
    #[schema(example = "Jalan Sudirman No. 123")]
    pub street: Option<String>,
    #[validate(required, length(max = 100))]
    #[schema(example = "Jakarta")]
    pub city: Option<String>,
    #[validate(required, length(max = 100))]
    #[schema(example = "DKI Jakarta")]
    pub province: Option<String>,
    #[validate(required, length(max = 100))]
    #[schema(example = "Indonesia")]
    pub country: Option<String>,
    #[validate(required, length(max = 10))]
    #[schema(example = "12345")]
    pub postal_code: Option<String>,
}

const ADDRESS_FIELDS: &[&str] = &["street", "city", "province", "country", "postal_code"];

impl Payload for NewAddress {
    const FIELDS: &'static [&'static str] = ADDRESS_FIELDS;
}

impl TryFrom<NewAddress> for AddressFields {
    type Error = ValidationError;

    fn try_from(payload: NewAddress) -> Result<Self, Self::Error> {
        let mut missing = Vec::new();
        let mut take = |field: &str, value: Option<String>| {
            value.unwrap_or_else(|| {
                missing.push(FieldValidationError::new(field, required_message(field)));
                String::new()
            })
        };

        let fields = AddressFields {
            street: take("street", payload.street),
            city: take("city", payload.city),
            province: take("province", payload.province),
            country: take("country", payload.country),
            postal_code: take("postal_code", payload.postal_code),
        };

        if missing.is_empty() {
            Ok(fields)
        } else {
            Err(ValidationError::FieldErrors(missing))
        }
    }
}

/// Body of `PUT /contacts/{contact}/addresses/{address}`
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct AddressPatch {
    #[validate(length(max = 200))]
    pub street: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub province: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
    #[validate(length(max = 10))]
    pub postal_code: Option<String>,
}

impl Payload for AddressPatch {
    const FIELDS: &'static [&'static str] = ADDRESS_FIELDS;
    const PARTIAL: bool = true;
}

impl AddressPatch {
    /// Apply the present fields; returns whether anything changed
    pub fn apply_to(self, address: &mut Address) -> bool {
        let mut changed = false;
        for (slot, value) in [
            (&mut address.street, self.street),
            (&mut address.city, self.city),
            (&mut address.province, self.province),
            (&mut address.country, self.country),
            (&mut address.postal_code, self.postal_code),
        ] {
            if let Some(value) = value {
                if *slot != value {
                    *slot = value;
                    changed = true;
                }
            }
        }
        if changed {
            address.touch();
        }
        changed
    }
}

/// `{"data": Address}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddressResponse {
    pub data: Address,
}

/// `{"data": [Address]}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddressListResponse {
    pub data: Vec<Address>,
}
