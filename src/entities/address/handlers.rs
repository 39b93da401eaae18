//! Address HTTP handlers
//!
//! Every route carries the parent contact id; the gate always runs on that
//! contact before any address is read.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use super::model::{
    Address, AddressFields, AddressListResponse, AddressPatch, AddressResponse, NewAddress,
};
use crate::core::auth::Principal;
use crate::core::error::{ApiResult, ErrorResponse};
use crate::core::validation::Validated;
use crate::entities::state::AppState;

/// List the addresses of a contact
#[utoipa::path(
    get,
    path = "/contacts/{contact}/addresses",
    tag = "Addresses",
    security(("bearerAuth" = [])),
    params(("contact" = uuid::Uuid, Path, description = "Contact id")),
    responses(
        (status = 200, description = "Addresses of the contact", body = AddressListResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Contact not found", body = ErrorResponse)
    )
)]
pub async fn list_addresses(
    State(state): State<AppState>,
    principal: Principal,
    Path(contact_id): Path<String>,
) -> ApiResult<Json<AddressListResponse>> {
    let contact = state.owned_contact(&principal, &contact_id).await?;
    let addresses = state.store.list_addresses(&contact.id).await?;
    Ok(Json(AddressListResponse { data: addresses }))
}

/// Add an address to a contact
#[utoipa::path(
    post,
    path = "/contacts/{contact}/addresses",
    tag = "Addresses",
    security(("bearerAuth" = [])),
    params(("contact" = uuid::Uuid, Path, description = "Contact id")),
    request_body = NewAddress,
    responses(
        (status = 201, description = "Address created", body = AddressResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Contact not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn create_address(
    State(state): State<AppState>,
    principal: Principal,
    Path(contact_id): Path<String>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<AddressResponse>)> {
    let contact = state.owned_contact(&principal, &contact_id).await?;
    let Validated(payload) = Validated::<NewAddress>::from_bytes(&body)?;

    let address = Address::new(contact.id, AddressFields::try_from(payload)?);
    let address = state.store.insert_address(address).await?;

    tracing::info!(contact_id = %contact.id, address_id = %address.id, "address created");
    Ok((StatusCode::CREATED, Json(AddressResponse { data: address })))
}

/// Show one address of a contact
#[utoipa::path(
    get,
    path = "/contacts/{contact}/addresses/{address}",
    tag = "Addresses",
    security(("bearerAuth" = [])),
    params(
        ("contact" = uuid::Uuid, Path, description = "Contact id"),
        ("address" = uuid::Uuid, Path, description = "Address id")
    ),
    responses(
        (status = 200, description = "The address", body = AddressResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Contact or address not found", body = ErrorResponse)
    )
)]
pub async fn get_address(
    State(state): State<AppState>,
    principal: Principal,
    Path((contact_id, address_id)): Path<(String, String)>,
) -> ApiResult<Json<AddressResponse>> {
    let contact = state.owned_contact(&principal, &contact_id).await?;
    let address = state.address_of(&contact, &address_id).await?;
    Ok(Json(AddressResponse { data: address }))
}

/// Update the fields present in the body
#[utoipa::path(
    put,
    path = "/contacts/{contact}/addresses/{address}",
    tag = "Addresses",
    security(("bearerAuth" = [])),
    params(
        ("contact" = uuid::Uuid, Path, description = "Contact id"),
        ("address" = uuid::Uuid, Path, description = "Address id")
    ),
    request_body = AddressPatch,
    responses(
        (status = 200, description = "Address updated", body = AddressResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Contact or address not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn update_address(
    State(state): State<AppState>,
    principal: Principal,
    Path((contact_id, address_id)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<Json<AddressResponse>> {
    let contact = state.owned_contact(&principal, &contact_id).await?;
    let mut address = state.address_of(&contact, &address_id).await?;
    let Validated(patch) = Validated::<AddressPatch>::from_bytes(&body)?;

    if patch.apply_to(&mut address) {
        address = state.store.update_address(address).await?;
        tracing::info!(contact_id = %contact.id, address_id = %address.id, "address updated");
    }
    Ok(Json(AddressResponse { data: address }))
}

/// Delete one address of a contact
#[utoipa::path(
    delete,
    path = "/contacts/{contact}/addresses/{address}",
    tag = "Addresses",
    security(("bearerAuth" = [])),
    params(
        ("contact" = uuid::Uuid, Path, description = "Contact id"),
        ("address" = uuid::Uuid, Path, description = "Address id")
    ),
    responses(
        (status = 204, description = "Address deleted"),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Contact or address not found", body = ErrorResponse)
    )
)]
pub async fn delete_address(
    State(state): State<AppState>,
    principal: Principal,
    Path((contact_id, address_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let contact = state.owned_contact(&principal, &contact_id).await?;
    let address = state.address_of(&contact, &address_id).await?;
    state.store.delete_address(&address.id).await?;

    tracing::info!(contact_id = %contact.id, address_id = %address.id, "address deleted");
    Ok(StatusCode::NO_CONTENT)
}
