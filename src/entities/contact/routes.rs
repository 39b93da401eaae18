//! Contact routes

use super::handlers::{create_contact, delete_contact, get_contact, list_contacts, update_contact};
use crate::entities::state::AppState;
use axum::{Router, routing::get};

/// `/contacts` and `/contacts/{contact}`, state applied
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .route(
            "/contacts/{contact}",
            get(get_contact)
                .put(update_contact)
                .patch(update_contact)
                .delete(delete_contact),
        )
        .with_state(state)
}
