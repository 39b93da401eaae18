//! PostgreSQL storage backend using sqlx.
//!
//! Contacts and addresses live in two tables; `addresses.contact_id`
//! references `contacts.id` with `ON DELETE CASCADE`, so the cascade on
//! contact deletion is enforced by the database.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! contact-book = { version = "0.1", features = ["postgres"] }
//! ```

use crate::core::error::{EntityError, StorageError};
use crate::core::store::ContactStore;
use crate::entities::{Address, Contact, ContactWithAddresses};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::collections::HashMap;
use uuid::Uuid;

const CONTACT_COLUMNS: &str =
    "id, user_id, first_name, last_name, email, phone, created_at, updated_at";
const ADDRESS_COLUMNS: &str =
    "id, contact_id, street, city, province, country, postal_code, created_at, updated_at";

/// Connect to `url` and apply the bundled migrations
pub async fn connect(url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(url)
        .await
        .map_err(|e| anyhow!("Failed to connect to PostgreSQL: {}", e))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow!("Failed to run migrations: {}", e))?;

    Ok(pool)
}

fn query_error(err: sqlx::Error) -> anyhow::Error {
    StorageError::QueryError {
        backend: "postgres".to_string(),
        message: err.to_string(),
    }
    .into()
}

/// Contact store backed by PostgreSQL
#[derive(Clone, Debug)]
pub struct PostgresContactStore {
    pool: PgPool,
}

impl PostgresContactStore {
    /// Create a new `PostgresContactStore` with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactStore for PostgresContactStore {
    async fn insert_contact(&self, contact: Contact) -> Result<Contact> {
        let sql = format!(
            "INSERT INTO contacts ({CONTACT_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {CONTACT_COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&sql)
            .bind(contact.id)
            .bind(contact.user_id)
            .bind(&contact.first_name)
            .bind(&contact.last_name)
            .bind(&contact.email)
            .bind(&contact.phone)
            .bind(contact.created_at)
            .bind(contact.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(query_error)
    }

    async fn find_contact(&self, id: &Uuid) -> Result<Option<Contact>> {
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1");
        sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)
    }

    async fn list_contacts(&self, user_id: &Uuid) -> Result<Vec<ContactWithAddresses>> {
        let sql = format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE user_id = $1 ORDER BY created_at, id"
        );
        let contacts = sqlx::query_as::<_, Contact>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;

        let ids: Vec<Uuid> = contacts.iter().map(|contact| contact.id).collect();
        let sql = format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE contact_id = ANY($1) ORDER BY created_at, id"
        );
        let addresses = sqlx::query_as::<_, Address>(&sql)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;

        let mut grouped: HashMap<Uuid, Vec<Address>> = HashMap::new();
        for address in addresses {
            grouped.entry(address.contact_id).or_default().push(address);
        }

        Ok(contacts
            .into_iter()
            .map(|contact| {
                let addresses = grouped.remove(&contact.id).unwrap_or_default();
                ContactWithAddresses { contact, addresses }
            })
            .collect())
    }

    async fn update_contact(&self, contact: Contact) -> Result<Contact> {
        let sql = format!(
            "UPDATE contacts SET first_name = $2, last_name = $3, email = $4, phone = $5, updated_at = $6 \
             WHERE id = $1 RETURNING {CONTACT_COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&sql)
            .bind(contact.id)
            .bind(&contact.first_name)
            .bind(&contact.last_name)
            .bind(&contact.email)
            .bind(&contact.phone)
            .bind(contact.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?
            .ok_or_else(|| EntityError::not_found::<Contact>(contact.id).into())
    }

    async fn delete_contact(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(query_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_addresses(&self, contact_id: &Uuid) -> Result<Vec<Address>> {
        let sql = format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE contact_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Address>(&sql)
            .bind(contact_id)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)
    }

    async fn insert_address(&self, address: Address) -> Result<Address> {
        let sql = format!(
            "INSERT INTO addresses ({ADDRESS_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {ADDRESS_COLUMNS}"
        );
        sqlx::query_as::<_, Address>(&sql)
            .bind(address.id)
            .bind(address.contact_id)
            .bind(&address.street)
            .bind(&address.city)
            .bind(&address.province)
            .bind(&address.country)
            .bind(&address.postal_code)
            .bind(address.created_at)
            .bind(address.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    EntityError::not_found::<Contact>(address.contact_id).into()
                }
                other => query_error(other),
            })
    }

    async fn find_address(&self, id: &Uuid) -> Result<Option<Address>> {
        let sql = format!("SELECT {ADDRESS_COLUMNS} FROM addresses WHERE id = $1");
        sqlx::query_as::<_, Address>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)
    }

    async fn update_address(&self, address: Address) -> Result<Address> {
        let sql = format!(
            "UPDATE addresses SET street = $2, city = $3, province = $4, country = $5, postal_code = $6, updated_at = $7 \
             WHERE id = $1 RETURNING {ADDRESS_COLUMNS}"
        );
        sqlx::query_as::<_, Address>(&sql)
            .bind(address.id)
            .bind(&address.street)
            .bind(&address.city)
            .bind(&address.province)
            .bind(&address.country)
            .bind(&address.postal_code)
            .bind(address.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?
            .ok_or_else(|| EntityError::not_found::<Address>(address.id).into())
    }

    async fn delete_address(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(query_error)?;
        Ok(result.rows_affected() > 0)
    }
}
