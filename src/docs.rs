//! OpenAPI documentation for the contact-book REST API.
//!
//! Registers the ten contact and address operations, their payload and
//! response schemas, and the bearer token security scheme. The document is
//! served unauthenticated at `{base_path}/openapi.json`.

use utoipa::openapi::Server;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::core::error::ErrorResponse;
use crate::entities::address::model::{
    Address, AddressListResponse, AddressPatch, AddressResponse, NewAddress,
};
use crate::entities::contact::model::{
    Contact, ContactDetailResponse, ContactListResponse, ContactPatch, ContactResponse,
    ContactWithAddresses, NewContact,
};

/// Adds the `bearerAuth` scheme referenced by every operation.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Opaque API token issued outside this service."))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Contact book API",
        description = "Per-user contacts and their postal addresses."
    ),
    servers((url = "/api", description = "Default base path")),
    security(("bearerAuth" = [])),
    paths(
        crate::entities::contact::handlers::list_contacts,
        crate::entities::contact::handlers::create_contact,
        crate::entities::contact::handlers::get_contact,
        crate::entities::contact::handlers::update_contact,
        crate::entities::contact::handlers::delete_contact,
        crate::entities::address::handlers::list_addresses,
        crate::entities::address::handlers::create_address,
        crate::entities::address::handlers::get_address,
        crate::entities::address::handlers::update_address,
        crate::entities::address::handlers::delete_address,
    ),
    components(schemas(
        Contact,
        ContactWithAddresses,
        NewContact,
        ContactPatch,
        ContactResponse,
        ContactDetailResponse,
        ContactListResponse,
        Address,
        NewAddress,
        AddressPatch,
        AddressResponse,
        AddressListResponse,
        ErrorResponse
    )),
    tags(
        (name = "Contacts", description = "Contacts owned by the caller"),
        (name = "Addresses", description = "Addresses nested under a contact")
    )
)]
pub struct ApiDoc;

/// The document with its server entry pointing at `base_path`
pub fn openapi_for(base_path: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.servers = Some(vec![Server::new(base_path)]);
    doc
}
