//! # contact-book
//!
//! REST backend for a per-user contact book. Authenticated users manage their
//! contacts and the postal addresses nested under each contact; every
//! operation on a contact or one of its addresses passes an ownership gate.
//!
//! ## Layout
//!
//! - [`core`]: ownership gate, auth provider, validation, errors, store trait
//! - [`entities`]: contact and address models, payloads and handlers
//! - [`storage`]: in-memory store and, behind the `postgres` feature, sqlx
//! - [`server`]: router assembly, auth middleware, graceful shutdown
//! - [`config`]: YAML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use contact_book::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .with_store(InMemoryContactStore::new())
//!     .with_auth_provider(StaticTokenProvider::new().with_token("dev-token", user_id))
//!     .build()?;
//! ```

pub mod config;
pub mod core;
pub mod docs;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    pub use crate::config::{AppConfig, StorageBackend, TokenConfig};
    pub use crate::core::{
        Access, ApiError, ApiResult, AuthContext, AuthProvider, ContactStore, Entity, Principal,
        StaticTokenProvider,
    };
    pub use crate::docs::ApiDoc;
    pub use crate::entities::address::model::{AddressFields, AddressPatch, NewAddress};
    pub use crate::entities::contact::model::{ContactFields, ContactPatch, NewContact};
    pub use crate::entities::{Address, AppState, Contact, ContactWithAddresses};
    pub use crate::server::ServerBuilder;
    pub use crate::storage::InMemoryContactStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresContactStore;
}
