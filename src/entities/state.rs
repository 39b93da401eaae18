//! Shared handler state and the lookup steps every handler runs
//!
//! Order matters: contact lookup (404), ownership gate (403), then address
//! lookup and parent check (404). Nothing is read or written for a caller who
//! fails an earlier step.

use std::sync::Arc;
use uuid::Uuid;

use crate::core::auth::{Principal, authorize, ensure_address_of};
use crate::core::entity::Entity;
use crate::core::error::{ApiResult, EntityError};
use crate::core::store::ContactStore;
use crate::entities::{Address, Contact};

/// State shared by the contact and address handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContactStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self { store }
    }

    /// Fetch a contact or 404
    pub async fn find_contact(&self, raw_id: &str) -> ApiResult<Contact> {
        let id = parse_id::<Contact>(raw_id)?;
        self.store
            .find_contact(&id)
            .await?
            .ok_or_else(|| EntityError::not_found::<Contact>(id).into())
    }

    /// Fetch a contact and run the ownership gate on it
    pub async fn owned_contact(&self, principal: &Principal, raw_id: &str) -> ApiResult<Contact> {
        let contact = self.find_contact(raw_id).await?;
        authorize(principal, &contact).into_result()?;
        Ok(contact)
    }

    /// Fetch an address of an already authorized contact or 404
    pub async fn address_of(&self, contact: &Contact, raw_id: &str) -> ApiResult<Address> {
        let id = parse_id::<Address>(raw_id)?;
        let address = self
            .store
            .find_address(&id)
            .await?
            .ok_or_else(|| EntityError::not_found::<Address>(id))?;
        ensure_address_of(contact, &address)?;
        Ok(address)
    }
}

/// Parse a path id; an id that cannot name a `T` is simply not found
pub fn parse_id<T: Entity>(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| EntityError::not_found::<T>(raw).into())
}
