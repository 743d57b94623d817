//! # StoredEntity Trait
//!
//! The contract every record type must satisfy to be kept by a [`StoreActor`](crate::StoreActor)
//! and listed through the query engine. One store implementation serves every entity type
//! because the type-specific parts (construction, mutation, filtering, sort keys) are
//! expressed here.
//!
//! Associated types keep the payloads apart: a `LocationCreate` can only ever reach the
//! location store.

use crate::error::ServiceResult;
use crate::query::SortValue;
use std::fmt::Debug;
use uuid::Uuid;

/// A record with a system identifier and a unique business key.
///
/// The identifier is assigned by the store at creation and never changes. The business key
/// (`code`, `sku`, ...) is unique per entity type; the store enforces that atomically when it
/// inserts.
pub trait StoredEntity: Clone + Debug + Send + Sync + 'static {
    /// Payload accepted by `create`.
    type Create: Send + Debug;

    /// Payload accepted by `update`. Only mutable fields belong here.
    type Update: Send + Debug;

    /// Listing filter. `Default` must match everything.
    type Filter: Send + Sync + Debug + Default;

    /// Entity name used in logs and error details, e.g. `"Location"`.
    const ENTITY: &'static str;

    /// Name of the business key field, e.g. `"code"`.
    const KEY_FIELD: &'static str;

    /// Canonical sort field used when the caller passes an empty sort string.
    const DEFAULT_SORT: &'static str;

    /// Validate the payload and build the entity. Called by the store with a fresh id.
    fn from_create_params(id: Uuid, params: Self::Create) -> ServiceResult<Self>;

    fn id(&self) -> Uuid;

    fn key(&self) -> &str;

    /// Apply an update in place. The store calls this on a copy and only commits on `Ok`.
    fn on_update(&mut self, update: Self::Update) -> ServiceResult<()>;

    fn matches(&self, _filter: &Self::Filter) -> bool {
        true
    }

    /// Map a caller-supplied field name (camelCase or snake_case) to its canonical name.
    fn sort_field(name: &str) -> Option<&'static str>;

    /// Value of a canonical sort field.
    fn sort_value(&self, field: &str) -> SortValue<'_>;
}
