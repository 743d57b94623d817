//! # Domain Model
//!
//! Entities kept by the store actors, with their create/update payloads and listing
//! filters. Every entity implements [`StoredEntity`](service_proxy::StoredEntity), which is
//! where construction-time validation, update rules and sortable fields live.
//!
//! Wire names are camelCase (`locationId`, `isActive`, `createdAt`) and identifiers are
//! time-ordered UUIDs.

pub mod location;
pub mod product;
pub mod product_variant;
pub mod unit_of_measure;

pub use location::*;
pub use product::*;
pub use product_variant::*;
pub use unit_of_measure::*;

use service_proxy::{ServiceError, ServiceResult};
use uuid::Uuid;

/// Free-form JSON object (location address, product metadata, variant attributes).
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Parse a caller-supplied identifier. Anything that is not a UUID cannot name an existing
/// entity, so it is reported as `NotFound` rather than as bad input.
pub fn parse_id(entity: &str, raw: &str) -> ServiceResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| ServiceError::not_found(entity, raw))
}

/// Reject blank required text.
pub(crate) fn required(field: &str, value: String) -> ServiceResult<String> {
    if value.trim().is_empty() {
        return Err(ServiceError::invalid_input(field, "must not be blank"));
    }
    Ok(value)
}

/// Reject a present-but-blank optional text.
pub(crate) fn non_blank(field: &str, value: Option<String>) -> ServiceResult<Option<String>> {
    value.map(|v| required(field, v)).transpose()
}
