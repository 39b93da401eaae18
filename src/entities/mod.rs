//! Business entities: contacts and the addresses nested under them

pub mod address;
pub mod contact;
pub mod state;

pub use address::Address;
pub use contact::{Contact, ContactWithAddresses};
pub use state::AppState;
