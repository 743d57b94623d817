use super::{non_blank, required};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use service_proxy::{ServiceResult, SortValue, StoredEntity};
use uuid::Uuid;

/// A unit stock is counted in (`EA`, `KG`, `BOX12`). `base_unit` names the unit it is
/// derived from, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitOfMeasure {
    pub uom_id: Uuid,
    pub code: String,
    pub name: String,
    pub base_unit: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UnitOfMeasureCreate {
    pub code: String,
    pub name: String,
    pub base_unit: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UnitOfMeasureUpdate {
    pub name: Option<String>,
    pub base_unit: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UnitOfMeasureFilter;

impl StoredEntity for UnitOfMeasure {
    type Create = UnitOfMeasureCreate;
    type Update = UnitOfMeasureUpdate;
    type Filter = UnitOfMeasureFilter;

    const ENTITY: &'static str = "UnitOfMeasure";
    const KEY_FIELD: &'static str = "code";
    const DEFAULT_SORT: &'static str = "code";

    fn from_create_params(id: Uuid, params: UnitOfMeasureCreate) -> ServiceResult<Self> {
        let now = Utc::now();
        Ok(Self {
            uom_id: id,
            code: required("code", params.code)?,
            name: required("name", params.name)?,
            base_unit: params.base_unit.filter(|unit| !unit.trim().is_empty()),
            created_at: now,
            updated_at: now,
        })
    }

    fn id(&self) -> Uuid {
        self.uom_id
    }

    fn key(&self) -> &str {
        &self.code
    }

    fn on_update(&mut self, update: UnitOfMeasureUpdate) -> ServiceResult<()> {
        if let Some(name) = non_blank("name", update.name)? {
            self.name = name;
        }
        if let Some(base_unit) = update.base_unit {
            self.base_unit = Some(base_unit).filter(|unit| !unit.trim().is_empty());
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    fn sort_field(name: &str) -> Option<&'static str> {
        match name {
            "uomId" | "uom_id" => Some("uomId"),
            "code" => Some("code"),
            "name" => Some("name"),
            "baseUnit" | "base_unit" => Some("baseUnit"),
            "createdAt" | "created_at" => Some("createdAt"),
            "updatedAt" | "updated_at" => Some("updatedAt"),
            _ => None,
        }
    }

    fn sort_value(&self, field: &str) -> SortValue<'_> {
        match field {
            "code" => SortValue::Text(&self.code),
            "name" => SortValue::Text(&self.name),
            "baseUnit" => SortValue::from(self.base_unit.as_deref()),
            "createdAt" => SortValue::Time(self.created_at),
            "updatedAt" => SortValue::Time(self.updated_at),
            _ => SortValue::Id(self.uom_id),
        }
    }
}
