//! Authentication middleware
//!
//! Runs before routing reaches any handler, so an unauthenticated request is
//! rejected with 401 even when the ids in its path do not exist.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::core::auth::{AuthContext, AuthProvider, Principal};
use crate::core::error::ApiError;

/// Resolve the caller and store the [`Principal`] in request extensions
pub async fn require_principal(
    State(provider): State<Arc<dyn AuthProvider>>,
    mut req: Request,
    next: Next,
) -> Response {
    let context = match provider.extract_context(req.headers()).await {
        Ok(context) => context,
        Err(err) => return ApiError::from(err).into_response(),
    };

    match context {
        AuthContext::User { user_id } => {
            req.extensions_mut().insert(Principal { user_id });
            next.run(req).await
        }
        AuthContext::Anonymous => {
            tracing::debug!(path = %req.uri().path(), "rejecting unauthenticated request");
            ApiError::Unauthenticated.into_response()
        }
    }
}
