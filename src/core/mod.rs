//! Core module containing the gate, validation, errors and storage traits

pub mod auth;
pub mod entity;
pub mod error;
pub mod store;
pub mod validation;

pub use auth::{Access, AuthContext, AuthProvider, Principal, StaticTokenProvider};
pub use entity::Entity;
pub use error::{ApiError, ApiResult};
pub use store::ContactStore;
