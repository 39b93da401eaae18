//! Authentication and the ownership gate
//!
//! Two concerns live here:
//! - resolving a [`Principal`] from request headers through an [`AuthProvider`]
//! - deciding whether that principal may act on a contact ([`authorize`]) and
//!   whether an address actually hangs off the contact in the path
//!   ([`ensure_address_of`])
//!
//! Addresses carry no owner of their own: every address operation is gated on
//! its parent contact.

use anyhow::Result;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, header};
use std::collections::HashMap;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::core::error::{ApiError, ApiResult, EntityError};
use crate::entities::{Address, Contact};

/// Authorization context extracted from a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// Authenticated user
    User { user_id: Uuid },

    /// No usable credentials
    Anonymous,
}

impl AuthContext {
    /// Get user_id if available
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            AuthContext::User { user_id } => Some(*user_id),
            AuthContext::Anonymous => None,
        }
    }
}

/// The authenticated actor of a request.
///
/// Inserted into request extensions by the auth middleware; handlers take it
/// as an extractor. Extracting it on a route without the middleware yields 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .copied()
            .ok_or(ApiError::Unauthenticated)
    }
}

/// Trait for auth providers
///
/// Token issuance is outside this crate; a provider only maps the credentials
/// found on a request to a user.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Extract auth context from HTTP request headers
    async fn extract_context(&self, headers: &HeaderMap) -> Result<AuthContext>;
}

/// Bearer-token provider backed by a fixed token table
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    tokens: HashMap<String, Uuid>,
}

impl StaticTokenProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the token table from configuration
    pub fn from_config(config: &AppConfig) -> Self {
        config
            .tokens
            .iter()
            .fold(Self::new(), |provider, entry| {
                provider.with_token(entry.token.clone(), entry.user_id)
            })
    }

    /// Register a token for a user
    pub fn with_token(mut self, token: impl Into<String>, user_id: Uuid) -> Self {
        self.tokens.insert(token.into(), user_id);
        self
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Pull the credential out of `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl AuthProvider for StaticTokenProvider {
    async fn extract_context(&self, headers: &HeaderMap) -> Result<AuthContext> {
        let context = bearer_token(headers)
            .and_then(|token| self.tokens.get(token))
            .map_or(AuthContext::Anonymous, |user_id| AuthContext::User {
                user_id: *user_id,
            });
        Ok(context)
    }
}

// =============================================================================
// Ownership gate
// =============================================================================

/// Outcome of the ownership gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

impl Access {
    /// Deny becomes a 403
    pub fn into_result(self) -> ApiResult<()> {
        match self {
            Access::Allow => Ok(()),
            Access::Deny => Err(ApiError::Forbidden),
        }
    }
}

/// Decide whether `principal` may act on `contact`.
///
/// Pure decision over an already loaded contact; a missing contact is the
/// caller's 404, never a deny.
pub fn authorize(principal: &Principal, contact: &Contact) -> Access {
    if contact.user_id == principal.user_id {
        tracing::debug!(user_id = %principal.user_id, contact_id = %contact.id, "access granted");
        Access::Allow
    } else {
        tracing::warn!(user_id = %principal.user_id, contact_id = %contact.id, "access denied: not the owner");
        Access::Deny
    }
}

/// Check that `address` belongs to `contact`.
///
/// An address reached through the wrong contact does not exist as far as the
/// caller is concerned, so the mismatch is a 404 for the address.
pub fn ensure_address_of(contact: &Contact, address: &Address) -> ApiResult<()> {
    if address.contact_id == contact.id {
        Ok(())
    } else {
        tracing::warn!(
            contact_id = %contact.id,
            address_id = %address.id,
            parent_id = %address.contact_id,
            "address requested through a contact it does not belong to"
        );
        Err(EntityError::not_found::<Address>(address.id).into())
    }
}
