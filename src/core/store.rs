//! Persistence trait for contacts and their addresses

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{Address, Contact, ContactWithAddresses};

/// Storage for contacts and addresses
///
/// Implementations must keep `Address.contact_id` pointing at an existing
/// contact: inserting an address under a missing contact fails, and deleting a
/// contact removes its addresses in the same operation. Ownership is not the
/// store's concern; handlers gate every call.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Persist a new contact
    async fn insert_contact(&self, contact: Contact) -> Result<Contact>;

    /// Get a contact by ID
    async fn find_contact(&self, id: &Uuid) -> Result<Option<Contact>>;

    /// List a user's contacts with their addresses eager-loaded
    ///
    /// Both levels are in creation order.
    async fn list_contacts(&self, user_id: &Uuid) -> Result<Vec<ContactWithAddresses>>;

    /// Replace a stored contact
    async fn update_contact(&self, contact: Contact) -> Result<Contact>;

    /// Delete a contact together with all of its addresses
    ///
    /// Returns whether a contact was removed.
    async fn delete_contact(&self, id: &Uuid) -> Result<bool>;

    /// List the addresses of a contact in creation order
    async fn list_addresses(&self, contact_id: &Uuid) -> Result<Vec<Address>>;

    /// Persist a new address; fails if its contact does not exist
    async fn insert_address(&self, address: Address) -> Result<Address>;

    /// Get an address by ID
    async fn find_address(&self, id: &Uuid) -> Result<Option<Address>>;

    /// Replace a stored address
    async fn update_address(&self, address: Address) -> Result<Address>;

    /// Delete an address
    ///
    /// Returns whether an address was removed.
    async fn delete_address(&self, id: &Uuid) -> Result<bool>;
}
