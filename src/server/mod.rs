//! Server module for building the HTTP application
//!
//! This module provides a `ServerBuilder` that registers:
//! - contact and address routes behind the auth middleware
//! - the OpenAPI document and a health probe outside it

pub mod auth;
pub mod builder;

pub use builder::ServerBuilder;
