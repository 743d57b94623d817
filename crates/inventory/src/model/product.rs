/// Represents a product in the catalogue.
///
/// # Actor Framework
/// This struct implements [`StoredEntity`], so a [`StoreActor`](service_proxy::StoreActor)
/// keeps it. `sku` is the business key.
///
/// See [`impl StoredEntity for Product`](#impl-StoredEntity-for-Product) for details on:
/// - Creation parameters ([`ProductCreate`])
/// - Update parameters ([`ProductUpdate`])
use super::{non_blank, required, JsonObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use service_proxy::{ServiceResult, SortValue, StoredEntity};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: Uuid,
    pub sku: String,
    pub name: String,
    pub product_type: String,
    /// Code of the unit of measure stock is counted in.
    pub base_uom: String,
    pub active: bool,
    pub metadata: JsonObject,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTOs for Product creation and updates.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub sku: String,
    pub name: String,
    pub product_type: String,
    pub base_uom: String,
    pub metadata: Option<JsonObject>,
}

// DTOs for Product updates.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub product_type: Option<String>,
    pub metadata: Option<JsonObject>,
    pub active: Option<bool>,
}

/// Products are listed unfiltered.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductFilter;

impl StoredEntity for Product {
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Filter = ProductFilter;

    const ENTITY: &'static str = "Product";
    const KEY_FIELD: &'static str = "sku";
    const DEFAULT_SORT: &'static str = "sku";

    fn from_create_params(id: Uuid, params: ProductCreate) -> ServiceResult<Self> {
        let now = Utc::now();
        Ok(Self {
            product_id: id,
            sku: required("sku", params.sku)?,
            name: required("name", params.name)?,
            product_type: required("productType", params.product_type)?,
            base_uom: required("baseUom", params.base_uom)?,
            active: true,
            metadata: params.metadata.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }

    fn id(&self) -> Uuid {
        self.product_id
    }

    fn key(&self) -> &str {
        &self.sku
    }

    fn on_update(&mut self, update: ProductUpdate) -> ServiceResult<()> {
        let name = non_blank("name", update.name)?;
        let product_type = non_blank("productType", update.product_type)?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(product_type) = product_type {
            self.product_type = product_type;
        }
        if let Some(metadata) = update.metadata {
            self.metadata = metadata;
        }
        if let Some(active) = update.active {
            self.active = active;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    fn sort_field(name: &str) -> Option<&'static str> {
        match name {
            "productId" | "product_id" => Some("productId"),
            "sku" => Some("sku"),
            "name" => Some("name"),
            "productType" | "product_type" => Some("productType"),
            "baseUom" | "base_uom" => Some("baseUom"),
            "active" => Some("active"),
            "createdAt" | "created_at" => Some("createdAt"),
            "updatedAt" | "updated_at" => Some("updatedAt"),
            _ => None,
        }
    }

    fn sort_value(&self, field: &str) -> SortValue<'_> {
        match field {
            "sku" => SortValue::Text(&self.sku),
            "name" => SortValue::Text(&self.name),
            "productType" => SortValue::Text(&self.product_type),
            "baseUom" => SortValue::Text(&self.base_uom),
            "active" => SortValue::Bool(self.active),
            "createdAt" => SortValue::Time(self.created_at),
            "updatedAt" => SortValue::Time(self.updated_at),
            _ => SortValue::Id(self.product_id),
        }
    }
}
