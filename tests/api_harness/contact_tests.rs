//! Contact endpoint test macro for storage backends.

/// Generate the contact endpoint suite for a storage backend.
///
/// `$store_factory` must produce an `impl ContactStore + 'static`.
///
/// # Generated Tests
///
/// - create / show / list / update / delete round trips
/// - ownership gate (403 for another user's contact, on every verb)
/// - validation (422 listing every failing field, nothing persisted)
/// - 401 before any lookup, 404 for unknown ids
#[macro_export]
macro_rules! contact_api_tests {
    ($store_factory:expr) => {
        mod contact_api_tests {
            use super::*;
            use axum::http::StatusCode;
            use serde_json::{Value, json};
            use std::sync::Arc;
            use $crate::api_harness::*;

            async fn make_app() -> TestApp {
                let store = $store_factory;
                TestApp::new(Arc::new(store))
            }

            // ==============================================================
            // Create
            // ==============================================================

            #[tokio::test]
            async fn test_create_contact() {
                let app = make_app().await;

                let response = app
                    .server
                    .post("/api/contacts")
                    .authorization_bearer(ALICE_TOKEN)
                    .json(&john_doe())
                    .await;

                response.assert_status(StatusCode::CREATED);
                let data = response.json::<Value>()["data"].clone();
                assert_eq!(data["first_name"], "John");
                assert_eq!(data["last_name"], "Doe");
                assert_eq!(data["email"], "john@example.com");
                assert_eq!(data["phone"], "081234567890");
                assert_eq!(data["user_id"], app.alice.to_string());
                uuid::Uuid::parse_str(data["id"].as_str().unwrap()).unwrap();
            }

            #[tokio::test]
            async fn test_create_ignores_user_id_in_body() {
                let app = make_app().await;
                let mut body = john_doe();
                body["user_id"] = json!(app.bob.to_string());
                body["id"] = json!(uuid::Uuid::new_v4().to_string());

                let data = app.create_contact(ALICE_TOKEN, body).await;

                assert_eq!(data["user_id"], app.alice.to_string());
                let listed: Value = app
                    .server
                    .get("/api/contacts")
                    .authorization_bearer(BOB_TOKEN)
                    .await
                    .json();
                assert!(listed["data"].as_array().unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_create_missing_email_persists_nothing() {
                let app = make_app().await;
                let mut body = john_doe();
                body.as_object_mut().unwrap().remove("email");

                let response = app
                    .server
                    .post("/api/contacts")
                    .authorization_bearer(ALICE_TOKEN)
                    .json(&body)
                    .await;

                response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
                let body: Value = response.json();
                assert_eq!(error_fields(&body), vec!["email"]);
                assert_eq!(body["errors"]["email"][0], "The email field is required.");

                let stored = app.store.list_contacts(&app.alice).await.unwrap();
                assert!(stored.is_empty());
            }

            #[tokio::test]
            async fn test_create_reports_every_failing_field() {
                let app = make_app().await;

                let response = app
                    .server
                    .post("/api/contacts")
                    .authorization_bearer(ALICE_TOKEN)
                    .json(&json!({
                        "first_name": "a".repeat(101),
                        "last_name": "   ",
                        "email": "not-an-email",
                        "phone": "0".repeat(21)
                    }))
                    .await;

                response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
                let body: Value = response.json();
                assert_eq!(
                    error_fields(&body),
                    vec!["email", "first_name", "last_name", "phone"]
                );
                assert_eq!(
                    body["errors"]["first_name"][0],
                    "The first name field must not be greater than 100 characters."
                );
                assert_eq!(
                    body["errors"]["email"][0],
                    "The email field must be a valid email address."
                );
            }

            #[tokio::test]
            async fn test_create_trims_values() {
                let app = make_app().await;
                let mut body = john_doe();
                body["first_name"] = json!("  John  ");

                let data = app.create_contact(ALICE_TOKEN, body).await;

                assert_eq!(data["first_name"], "John");
            }

            #[tokio::test]
            async fn test_create_with_malformed_json_is_400() {
                let app = make_app().await;

                let response = app
                    .server
                    .post("/api/contacts")
                    .authorization_bearer(ALICE_TOKEN)
                    .content_type("application/json")
                    .text("{\"first_name\": ")
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
            }

            // ==============================================================
            // Show / list
            // ==============================================================

            #[tokio::test]
            async fn test_round_trip_post_then_get() {
                let app = make_app().await;
                let created = app.create_contact(ALICE_TOKEN, john_doe()).await;

                let response = app
                    .server
                    .get(&format!("/api/contacts/{}", id_of(&created)))
                    .authorization_bearer(ALICE_TOKEN)
                    .await;

                response.assert_status_ok();
                let data = response.json::<Value>()["data"].clone();
                for field in ["id", "user_id", "first_name", "last_name", "email", "phone"] {
                    assert_eq!(data[field], created[field], "field {}", field);
                }
                assert!(data["addresses"].as_array().unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_list_only_own_contacts_with_addresses() {
                let app = make_app().await;
                let john = app.create_contact(ALICE_TOKEN, john_doe()).await;
                let jane = app.create_contact(ALICE_TOKEN, jane_roe()).await;
                app.create_contact(BOB_TOKEN, john_doe()).await;
                app.create_address(ALICE_TOKEN, &id_of(&john), jakarta())
                    .await;

                let response = app
                    .server
                    .get("/api/contacts")
                    .authorization_bearer(ALICE_TOKEN)
                    .await;

                response.assert_status_ok();
                let data = response.json::<Value>()["data"].clone();
                let contacts = data.as_array().unwrap();
                assert_eq!(contacts.len(), 2);
                assert_eq!(contacts[0]["id"], john["id"]);
                assert_eq!(contacts[1]["id"], jane["id"]);
                assert_eq!(contacts[0]["addresses"].as_array().unwrap().len(), 1);
                assert!(contacts[1]["addresses"].as_array().unwrap().is_empty());
                assert!(
                    contacts
                        .iter()
                        .all(|c| c["user_id"] == app.alice.to_string())
                );
            }

            // ==============================================================
            // Update
            // ==============================================================

            #[tokio::test]
            async fn test_partial_update_changes_only_phone() {
                let app = make_app().await;
                let created = app.create_contact(ALICE_TOKEN, john_doe()).await;

                let response = app
                    .server
                    .put(&format!("/api/contacts/{}", id_of(&created)))
                    .authorization_bearer(ALICE_TOKEN)
                    .json(&json!({ "phone": "000" }))
                    .await;

                response.assert_status_ok();
                let data = response.json::<Value>()["data"].clone();
                assert_eq!(data["phone"], "000");
                assert_eq!(data["first_name"], created["first_name"]);
                assert_eq!(data["last_name"], created["last_name"]);
                assert_eq!(data["email"], created["email"]);
                assert_eq!(data["user_id"], created["user_id"]);
            }

            #[tokio::test]
            async fn test_update_with_blank_or_null_field_is_422() {
                let app = make_app().await;
                let created = app.create_contact(ALICE_TOKEN, john_doe()).await;
                let path = format!("/api/contacts/{}", id_of(&created));

                for (body, field) in [
                    (json!({ "email": "" }), "email"),
                    (json!({ "first_name": null }), "first_name"),
                    (json!({ "phone": "   " }), "phone"),
                ] {
                    let response = app
                        .server
                        .put(&path)
                        .authorization_bearer(ALICE_TOKEN)
                        .json(&body)
                        .await;

                    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
                    assert_eq!(error_fields(&response.json::<Value>()), vec![field]);
                }

                let shown: Value = app
                    .server
                    .get(&path)
                    .authorization_bearer(ALICE_TOKEN)
                    .await
                    .json();
                assert_eq!(shown["data"]["email"], created["email"]);
                assert_eq!(shown["data"]["first_name"], created["first_name"]);
                assert_eq!(shown["data"]["phone"], created["phone"]);
                assert_eq!(shown["data"]["updated_at"], created["updated_at"]);
            }

            #[tokio::test]
            async fn test_patch_is_accepted_as_update() {
                let app = make_app().await;
                let created = app.create_contact(ALICE_TOKEN, john_doe()).await;

                let response = app
                    .server
                    .patch(&format!("/api/contacts/{}", id_of(&created)))
                    .authorization_bearer(ALICE_TOKEN)
                    .json(&json!({ "last_name": "Smith" }))
                    .await;

                response.assert_status_ok();
                assert_eq!(response.json::<Value>()["data"]["last_name"], "Smith");
            }

            #[tokio::test]
            async fn test_update_cannot_reassign_owner() {
                let app = make_app().await;
                let created = app.create_contact(ALICE_TOKEN, john_doe()).await;

                let response = app
                    .server
                    .put(&format!("/api/contacts/{}", id_of(&created)))
                    .authorization_bearer(ALICE_TOKEN)
                    .json(&json!({ "user_id": app.bob.to_string() }))
                    .await;

                response.assert_status_ok();
                assert_eq!(
                    response.json::<Value>()["data"]["user_id"],
                    app.alice.to_string()
                );
            }

            #[tokio::test]
            async fn test_update_with_invalid_email_keeps_stored_value() {
                let app = make_app().await;
                let created = app.create_contact(ALICE_TOKEN, john_doe()).await;
                let path = format!("/api/contacts/{}", id_of(&created));

                let response = app
                    .server
                    .put(&path)
                    .authorization_bearer(ALICE_TOKEN)
                    .json(&json!({ "email": "nope", "phone": "111" }))
                    .await;

                response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
                let shown: Value = app
                    .server
                    .get(&path)
                    .authorization_bearer(ALICE_TOKEN)
                    .await
                    .json();
                assert_eq!(shown["data"]["email"], "john@example.com");
                assert_eq!(shown["data"]["phone"], "081234567890");
            }

            // ==============================================================
            // Delete
            // ==============================================================

            #[tokio::test]
            async fn test_delete_contact_cascades_to_addresses() {
                let app = make_app().await;
                let contact = app.create_contact(ALICE_TOKEN, john_doe()).await;
                let contact_id = id_of(&contact);
                let address = app.create_address(ALICE_TOKEN, &contact_id, jakarta()).await;

                let response = app
                    .server
                    .delete(&format!("/api/contacts/{}", contact_id))
                    .authorization_bearer(ALICE_TOKEN)
                    .await;
                response.assert_status(StatusCode::NO_CONTENT);

                app.server
                    .get(&format!("/api/contacts/{}", contact_id))
                    .authorization_bearer(ALICE_TOKEN)
                    .await
                    .assert_status_not_found();
                app.server
                    .get(&format!(
                        "/api/contacts/{}/addresses/{}",
                        contact_id,
                        id_of(&address)
                    ))
                    .authorization_bearer(ALICE_TOKEN)
                    .await
                    .assert_status_not_found();

                let address_id = uuid::Uuid::parse_str(&id_of(&address)).unwrap();
                assert!(app.store.find_address(&address_id).await.unwrap().is_none());
            }

            // ==============================================================
            // Ownership gate
            // ==============================================================

            #[tokio::test]
            async fn test_other_user_is_forbidden_on_every_verb() {
                let app = make_app().await;
                let created = app.create_contact(ALICE_TOKEN, john_doe()).await;
                let path = format!("/api/contacts/{}", id_of(&created));

                let responses = [
                    app.server.get(&path).authorization_bearer(BOB_TOKEN).await,
                    app.server
                        .put(&path)
                        .authorization_bearer(BOB_TOKEN)
                        .json(&json!({ "phone": "000" }))
                        .await,
                    app.server.delete(&path).authorization_bearer(BOB_TOKEN).await,
                ];

                for response in responses {
                    response.assert_status(StatusCode::FORBIDDEN);
                    assert_eq!(response.json::<Value>(), json!({ "message": "Forbidden" }));
                }

                let shown: Value = app
                    .server
                    .get(&path)
                    .authorization_bearer(ALICE_TOKEN)
                    .await
                    .json();
                assert_eq!(shown["data"]["phone"], "081234567890");
            }

            #[tokio::test]
            async fn test_gate_runs_before_validation() {
                let app = make_app().await;
                let created = app.create_contact(ALICE_TOKEN, john_doe()).await;

                let response = app
                    .server
                    .put(&format!("/api/contacts/{}", id_of(&created)))
                    .authorization_bearer(BOB_TOKEN)
                    .json(&json!({ "email": "not-an-email" }))
                    .await;

                response.assert_status(StatusCode::FORBIDDEN);
            }

            #[tokio::test]
            async fn test_scenario_owner_creates_other_user_is_forbidden() {
                let app = make_app().await;

                let contact = app.create_contact(ALICE_TOKEN, john_doe()).await;
                assert_eq!(contact["user_id"], app.alice.to_string());

                let contact_id = id_of(&contact);
                let address = app.create_address(ALICE_TOKEN, &contact_id, jakarta()).await;
                assert_eq!(address["contact_id"], contact["id"]);

                app.server
                    .get(&format!("/api/contacts/{}", contact_id))
                    .authorization_bearer(BOB_TOKEN)
                    .await
                    .assert_status(StatusCode::FORBIDDEN);
            }

            // ==============================================================
            // Authentication and lookup errors
            // ==============================================================

            #[tokio::test]
            async fn test_unauthenticated_is_401_even_for_unknown_ids() {
                let app = make_app().await;
                let unknown = uuid::Uuid::new_v4();

                for response in [
                    app.server.get("/api/contacts").await,
                    app.server.post("/api/contacts").json(&john_doe()).await,
                    app.server.get(&format!("/api/contacts/{}", unknown)).await,
                    app.server
                        .delete(&format!("/api/contacts/{}", unknown))
                        .authorization_bearer("unknown-token")
                        .await,
                ] {
                    response.assert_status(StatusCode::UNAUTHORIZED);
                    assert_eq!(
                        response.json::<Value>(),
                        json!({ "message": "Unauthenticated." })
                    );
                }
            }

            #[tokio::test]
            async fn test_unknown_contact_is_404() {
                let app = make_app().await;

                app.server
                    .get(&format!("/api/contacts/{}", uuid::Uuid::new_v4()))
                    .authorization_bearer(ALICE_TOKEN)
                    .await
                    .assert_status_not_found();
            }

            #[tokio::test]
            async fn test_malformed_id_is_404() {
                let app = make_app().await;

                for response in [
                    app.server
                        .get("/api/contacts/42")
                        .authorization_bearer(ALICE_TOKEN)
                        .await,
                    app.server
                        .delete("/api/contacts/not-a-uuid")
                        .authorization_bearer(ALICE_TOKEN)
                        .await,
                ] {
                    response.assert_status_not_found();
                }

                let body: Value = app
                    .server
                    .get("/api/contacts/42")
                    .authorization_bearer(ALICE_TOKEN)
                    .await
                    .json();
                assert_eq!(body, json!({ "message": "contact with id '42' not found" }));
            }
        }
    };
}
