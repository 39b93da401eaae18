//! Entity trait shared by contacts and addresses

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Base trait for all stored records.
///
/// All entities have:
/// - id: Unique identifier, generated by the server
/// - created_at: Creation timestamp
/// - updated_at: Last modification timestamp
pub trait Entity: Clone + Send + Sync + 'static {
    /// The singular resource name (e.g., "contact")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;

    /// Mark the entity as modified now
    fn touch(&mut self);
}

/// Sort key used for every listing: oldest first, id as tie-breaker
pub fn creation_order<T: Entity>(a: &T, b: &T) -> std::cmp::Ordering {
    a.created_at()
        .cmp(&b.created_at())
        .then_with(|| a.id().cmp(&b.id()))
}
