//! In-memory implementation of ContactStore for testing and development

use crate::core::entity::creation_order;
use crate::core::error::EntityError;
use crate::core::store::ContactStore;
use crate::entities::{Address, Contact, ContactWithAddresses};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    contacts: HashMap<Uuid, Contact>,
    addresses: HashMap<Uuid, Address>,
}

impl Tables {
    fn addresses_of(&self, contact_id: &Uuid) -> Vec<Address> {
        let mut addresses: Vec<Address> = self
            .addresses
            .values()
            .filter(|address| &address.contact_id == contact_id)
            .cloned()
            .collect();
        addresses.sort_by(creation_order);
        addresses
    }
}

/// In-memory contact store
///
/// Both tables sit behind one RwLock so a cascading delete is a single
/// critical section.
#[derive(Clone, Default)]
pub struct InMemoryContactStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryContactStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn insert_contact(&self, contact: Contact) -> Result<Contact> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        tables.contacts.insert(contact.id, contact.clone());

        Ok(contact)
    }

    async fn find_contact(&self, id: &Uuid) -> Result<Option<Contact>> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(tables.contacts.get(id).cloned())
    }

    async fn list_contacts(&self, user_id: &Uuid) -> Result<Vec<ContactWithAddresses>> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut contacts: Vec<Contact> = tables
            .contacts
            .values()
            .filter(|contact| &contact.user_id == user_id)
            .cloned()
            .collect();
        contacts.sort_by(creation_order);

        Ok(contacts
            .into_iter()
            .map(|contact| {
                let addresses = tables.addresses_of(&contact.id);
                ContactWithAddresses { contact, addresses }
            })
            .collect())
    }

    async fn update_contact(&self, contact: Contact) -> Result<Contact> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let slot = tables
            .contacts
            .get_mut(&contact.id)
            .ok_or_else(|| EntityError::not_found::<Contact>(contact.id))?;
        *slot = contact.clone();

        Ok(contact)
    }

    async fn delete_contact(&self, id: &Uuid) -> Result<bool> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if tables.contacts.remove(id).is_none() {
            return Ok(false);
        }
        tables.addresses.retain(|_, address| &address.contact_id != id);

        Ok(true)
    }

    async fn list_addresses(&self, contact_id: &Uuid) -> Result<Vec<Address>> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(tables.addresses_of(contact_id))
    }

    async fn insert_address(&self, address: Address) -> Result<Address> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if !tables.contacts.contains_key(&address.contact_id) {
            return Err(EntityError::not_found::<Contact>(address.contact_id).into());
        }
        tables.addresses.insert(address.id, address.clone());

        Ok(address)
    }

    async fn find_address(&self, id: &Uuid) -> Result<Option<Address>> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(tables.addresses.get(id).cloned())
    }

    async fn update_address(&self, address: Address) -> Result<Address> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let slot = tables
            .addresses
            .get_mut(&address.id)
            .ok_or_else(|| EntityError::not_found::<Address>(address.id))?;
        *slot = address.clone();

        Ok(address)
    }

    async fn delete_address(&self, id: &Uuid) -> Result<bool> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(tables.addresses.remove(id).is_some())
    }
}
