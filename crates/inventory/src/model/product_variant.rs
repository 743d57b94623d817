//! A sellable variation of a [`Product`](super::Product) (size, colour, pack).
//!
//! `product_id` refers to the parent without owning it. `sku` is unique among variants.

use super::{non_blank, required, JsonObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use service_proxy::{ServiceResult, SortValue, StoredEntity};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub variant_id: Uuid,
    pub product_id: Uuid,
    pub sku: String,
    pub name: String,
    pub active: bool,
    pub attributes: JsonObject,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProductVariantCreate {
    pub product_id: Uuid,
    pub sku: String,
    pub name: String,
    pub attributes: Option<JsonObject>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductVariantUpdate {
    pub name: Option<String>,
    pub attributes: Option<JsonObject>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProductVariantFilter {
    pub product_id: Option<Uuid>,
}

impl ProductVariantFilter {
    pub fn of_product(product_id: Uuid) -> Self {
        Self {
            product_id: Some(product_id),
        }
    }
}

impl StoredEntity for ProductVariant {
    type Create = ProductVariantCreate;
    type Update = ProductVariantUpdate;
    type Filter = ProductVariantFilter;

    const ENTITY: &'static str = "ProductVariant";
    const KEY_FIELD: &'static str = "sku";
    const DEFAULT_SORT: &'static str = "sku";

    fn from_create_params(id: Uuid, params: ProductVariantCreate) -> ServiceResult<Self> {
        let now = Utc::now();
        Ok(Self {
            variant_id: id,
            product_id: params.product_id,
            sku: required("sku", params.sku)?,
            name: required("name", params.name)?,
            active: true,
            attributes: params.attributes.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }

    fn id(&self) -> Uuid {
        self.variant_id
    }

    fn key(&self) -> &str {
        &self.sku
    }

    fn on_update(&mut self, update: ProductVariantUpdate) -> ServiceResult<()> {
        if let Some(name) = non_blank("name", update.name)? {
            self.name = name;
        }
        if let Some(attributes) = update.attributes {
            self.attributes = attributes;
        }
        if let Some(active) = update.active {
            self.active = active;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    fn matches(&self, filter: &ProductVariantFilter) -> bool {
        filter.product_id.map_or(true, |id| self.product_id == id)
    }

    fn sort_field(name: &str) -> Option<&'static str> {
        match name {
            "variantId" | "variant_id" => Some("variantId"),
            "sku" => Some("sku"),
            "name" => Some("name"),
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
            "active" => SortValue::Bool(self.active),
            "createdAt" => SortValue::Time(self.created_at),
            "updatedAt" => SortValue::Time(self.updated_at),
            _ => SortValue::Id(self.variant_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_scopes_by_parent() {
        let parent = Uuid::now_v7();
        let variant = ProductVariant::from_create_params(
            Uuid::now_v7(),
            ProductVariantCreate {
                product_id: parent,
                sku: "P1-RED".into(),
                name: "Red".into(),
                attributes: None,
            },
        )
        .unwrap();

        assert!(variant.matches(&ProductVariantFilter::of_product(parent)));
        assert!(!variant.matches(&ProductVariantFilter::of_product(Uuid::now_v7())));
        assert!(variant.matches(&ProductVariantFilter::default()));
    }

    #[test]
    fn deactivation_keeps_parent_and_sku() {
        let parent = Uuid::now_v7();
        let mut variant = ProductVariant::from_create_params(
            Uuid::now_v7(),
            ProductVariantCreate {
                product_id: parent,
                sku: "P1-RED".into(),
                name: "Red".into(),
                attributes: None,
            },
        )
        .unwrap();

        variant
            .on_update(ProductVariantUpdate {
                active: Some(false),
                ..Default::default()
            })
            .unwrap();

        assert!(!variant.active);
        assert_eq!(variant.product_id, parent);
        assert_eq!(variant.sku, "P1-RED");
        assert_eq!(ProductVariant::sort_field("active"), Some("active"));
    }
}
