//! Contact entity module

pub mod handlers;
pub mod model;
pub mod routes;

pub use routes::routes;
pub use model::{Contact, ContactWithAddresses};
