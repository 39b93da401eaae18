//! Contact HTTP handlers

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use super::model::{
    Contact, ContactDetailResponse, ContactFields, ContactListResponse, ContactPatch,
    ContactResponse, ContactWithAddresses, NewContact,
};
use crate::core::auth::Principal;
use crate::core::error::{ApiResult, ErrorResponse};
use crate::core::validation::Validated;
use crate::entities::state::AppState;

/// List the caller's contacts with their addresses
#[utoipa::path(
    get,
    path = "/contacts",
    tag = "Contacts",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Contacts of the caller", body = ContactListResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse)
    )
)]
pub async fn list_contacts(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<ContactListResponse>> {
    let contacts = state.store.list_contacts(&principal.user_id).await?;
    Ok(Json(ContactListResponse { data: contacts }))
}

/// Create a contact owned by the caller
#[utoipa::path(
    post,
    path = "/contacts",
    tag = "Contacts",
    security(("bearerAuth" = [])),
    request_body = NewContact,
    responses(
        (status = 201, description = "Contact created", body = ContactResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn create_contact(
    State(state): State<AppState>,
    principal: Principal,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<ContactResponse>)> {
    let Validated(payload) = Validated::<NewContact>::from_bytes(&body)?;
    let contact = Contact::new(principal.user_id, ContactFields::try_from(payload)?);
    let contact = state.store.insert_contact(contact).await?;

    tracing::info!(user_id = %principal.user_id, contact_id = %contact.id, "contact created");
    Ok((StatusCode::CREATED, Json(ContactResponse { data: contact })))
}

/// Show one contact with its addresses
#[utoipa::path(
    get,
    path = "/contacts/{contact}",
    tag = "Contacts",
    security(("bearerAuth" = [])),
    params(("contact" = uuid::Uuid, Path, description = "Contact id")),
    responses(
        (status = 200, description = "The contact", body = ContactDetailResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Contact not found", body = ErrorResponse)
    )
)]
pub async fn get_contact(
    State(state): State<AppState>,
    principal: Principal,
    Path(contact_id): Path<String>,
) -> ApiResult<Json<ContactDetailResponse>> {
    let contact = state.owned_contact(&principal, &contact_id).await?;
    let addresses = state.store.list_addresses(&contact.id).await?;
    Ok(Json(ContactDetailResponse {
        data: ContactWithAddresses { contact, addresses },
    }))
}

/// Update the fields present in the body
#[utoipa::path(
    put,
    path = "/contacts/{contact}",
    tag = "Contacts",
    security(("bearerAuth" = [])),
    params(("contact" = uuid::Uuid, Path, description = "Contact id")),
    request_body = ContactPatch,
    responses(
        (status = 200, description = "Contact updated", body = ContactResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Contact not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn update_contact(
    State(state): State<AppState>,
    principal: Principal,
    Path(contact_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<ContactResponse>> {
    let mut contact = state.owned_contact(&principal, &contact_id).await?;
    let Validated(patch) = Validated::<ContactPatch>::from_bytes(&body)?;

    if patch.apply_to(&mut contact) {
        contact = state.store.update_contact(contact).await?;
        tracing::info!(user_id = %principal.user_id, contact_id = %contact.id, "contact updated");
    }
    Ok(Json(ContactResponse { data: contact }))
}

/// Delete a contact and all of its addresses
#[utoipa::path(
    delete,
    path = "/contacts/{contact}",
    tag = "Contacts",
    security(("bearerAuth" = [])),
    params(("contact" = uuid::Uuid, Path, description = "Contact id")),
    responses(
        (status = 204, description = "Contact deleted"),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Contact not found", body = ErrorResponse)
    )
)]
pub async fn delete_contact(
    State(state): State<AppState>,
    principal: Principal,
    Path(contact_id): Path<String>,
) -> ApiResult<StatusCode> {
    let contact = state.owned_contact(&principal, &contact_id).await?;
    state.store.delete_contact(&contact.id).await?;

    tracing::info!(user_id = %principal.user_id, contact_id = %contact.id, "contact deleted");
    Ok(StatusCode::NO_CONTENT)
}
