//! Address routes, nested under a contact

use super::handlers::{create_address, delete_address, get_address, list_addresses, update_address};
use crate::entities::state::AppState;
use axum::{Router, routing::get};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/contacts/{contact}/addresses",
            get(list_addresses).post(create_address),
        )
        .route(
            "/contacts/{contact}/addresses/{address}",
            get(get_address)
                .put(update_address)
                .patch(update_address)
                .delete(delete_address),
        )
        .with_state(state)
}
