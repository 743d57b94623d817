/// A physical or logical place stock can be held in (warehouse, store, bin).
///
/// # Actor Framework
/// This struct implements [`StoredEntity`], so a [`StoreActor`](service_proxy::StoreActor)
/// keeps it. `code` is the business key; it is unique and never changes after creation.
use super::{non_blank, required, JsonObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use service_proxy::{ServiceResult, SortValue, StoredEntity};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub location_id: Uuid,
    pub code: String,
    pub name: String,
    pub location_type: String,
    pub is_active: bool,
    pub address: JsonObject,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTOs for Location creation and updates.
#[derive(Debug, Clone)]
pub struct LocationCreate {
    pub code: String,
    pub name: String,
    pub location_type: String,
    pub address: Option<JsonObject>,
}

// `None` leaves the field as it is.
#[derive(Debug, Clone, Default)]
pub struct LocationUpdate {
    pub name: Option<String>,
    pub location_type: Option<String>,
    pub address: Option<JsonObject>,
    pub is_active: Option<bool>,
}

/// Listing filter. Empty strings count as "no filter".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationFilter {
    /// Case-insensitive substring of `code`.
    pub code: Option<String>,
    /// Case-insensitive substring of `name`.
    pub name: Option<String>,
    /// Exact `locationType`.
    pub location_type: Option<String>,
    pub active_only: bool,
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) if !needle.is_empty() => haystack
            .to_lowercase()
            .contains(&needle.to_lowercase()),
        _ => true,
    }
}

impl StoredEntity for Location {
    type Create = LocationCreate;
    type Update = LocationUpdate;
    type Filter = LocationFilter;

    const ENTITY: &'static str = "Location";
    const KEY_FIELD: &'static str = "code";
    const DEFAULT_SORT: &'static str = "code";

    fn from_create_params(id: Uuid, params: LocationCreate) -> ServiceResult<Self> {
        let now = Utc::now();
        Ok(Self {
            location_id: id,
            code: required("code", params.code)?,
            name: required("name", params.name)?,
            location_type: required("locationType", params.location_type)?,
            is_active: true,
            address: params.address.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }

    fn id(&self) -> Uuid {
        self.location_id
    }

    fn key(&self) -> &str {
        &self.code
    }

    fn on_update(&mut self, update: LocationUpdate) -> ServiceResult<()> {
        let name = non_blank("name", update.name)?;
        let location_type = non_blank("locationType", update.location_type)?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(location_type) = location_type {
            self.location_type = location_type;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    fn matches(&self, filter: &LocationFilter) -> bool {
        contains_ignore_case(&self.code, filter.code.as_deref())
            && contains_ignore_case(&self.name, filter.name.as_deref())
            && filter
                .location_type
                .as_deref()
                .filter(|t| !t.is_empty())
                .map_or(true, |t| self.location_type == t)
            && (!filter.active_only || self.is_active)
    }

    fn sort_field(name: &str) -> Option<&'static str> {
        match name {
            "locationId" | "location_id" => Some("locationId"),
            "code" => Some("code"),
            "name" => Some("name"),
            "locationType" | "location_type" => Some("locationType"),
            "isActive" | "is_active" => Some("isActive"),
            "createdAt" | "created_at" => Some("createdAt"),
            "updatedAt" | "updated_at" => Some("updatedAt"),
            _ => None,
        }
    }

    fn sort_value(&self, field: &str) -> SortValue<'_> {
        match field {
            "code" => SortValue::Text(&self.code),
            "name" => SortValue::Text(&self.name),
            "locationType" => SortValue::Text(&self.location_type),
            "isActive" => SortValue::Bool(self.is_active),
            "createdAt" => SortValue::Time(self.created_at),
            "updatedAt" => SortValue::Time(self.updated_at),
            _ => SortValue::Id(self.location_id),
        }
    }
}
