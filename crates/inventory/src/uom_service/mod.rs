//! # Unit of Measure Service
//!
//! Exposed at [`ADDRESS`]. Codes are unique; `baseUnit` is free text naming another unit
//! and is not checked against the store.

use crate::model::{
    parse_id, UnitOfMeasure, UnitOfMeasureCreate, UnitOfMeasureFilter, UnitOfMeasureUpdate,
};
use async_trait::async_trait;
use service_proxy::{
    ArgKind, Page, PageRequest, RegistryError, ServiceBinder, ServiceRegistry, ServiceResult,
    SharedStore, SortSpec, StoredEntity,
};
use std::sync::Arc;
use tracing::instrument;

/// Public routing key of the unit of measure service.
pub const ADDRESS: &str = "service.uom";

#[async_trait]
pub trait UnitOfMeasureService: Send + Sync {
    async fn list_unit_of_measures(
        &self,
        page: i32,
        size: i32,
        sort: &str,
    ) -> ServiceResult<Page<UnitOfMeasure>>;

    async fn create_unit_of_measure(
        &self,
        params: UnitOfMeasureCreate,
    ) -> ServiceResult<UnitOfMeasure>;

    async fn get_unit_of_measure(&self, uom_id: &str) -> ServiceResult<UnitOfMeasure>;

    async fn update_unit_of_measure(
        &self,
        uom_id: &str,
        update: UnitOfMeasureUpdate,
    ) -> ServiceResult<UnitOfMeasure>;

    async fn delete_unit_of_measure(&self, uom_id: &str) -> ServiceResult<()>;

    async fn check_code_exists(&self, code: &str) -> ServiceResult<bool>;
}

pub struct UnitOfMeasureServiceImpl {
    store: SharedStore<UnitOfMeasure>,
}

impl UnitOfMeasureServiceImpl {
    pub fn new(store: SharedStore<UnitOfMeasure>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UnitOfMeasureService for UnitOfMeasureServiceImpl {
    #[instrument(skip(self))]
    async fn list_unit_of_measures(
        &self,
        page: i32,
        size: i32,
        sort: &str,
    ) -> ServiceResult<Page<UnitOfMeasure>> {
        let page = PageRequest::new(page, size)?;
        let sort = SortSpec::parse::<UnitOfMeasure>(sort)?;
        self.store.query(UnitOfMeasureFilter, sort, page).await
    }

    #[instrument(skip(self))]
    async fn create_unit_of_measure(
        &self,
        params: UnitOfMeasureCreate,
    ) -> ServiceResult<UnitOfMeasure> {
        self.store.create(params).await
    }

    #[instrument(skip(self))]
    async fn get_unit_of_measure(&self, uom_id: &str) -> ServiceResult<UnitOfMeasure> {
        let id = parse_id(UnitOfMeasure::ENTITY, uom_id)?;
        self.store.fetch(id).await
    }

    #[instrument(skip(self))]
    async fn update_unit_of_measure(
        &self,
        uom_id: &str,
        update: UnitOfMeasureUpdate,
    ) -> ServiceResult<UnitOfMeasure> {
        let id = parse_id(UnitOfMeasure::ENTITY, uom_id)?;
        self.store.update(id, update).await
    }

    #[instrument(skip(self))]
    async fn delete_unit_of_measure(&self, uom_id: &str) -> ServiceResult<()> {
        let id = parse_id(UnitOfMeasure::ENTITY, uom_id)?;
        self.store.delete(id).await
    }

    #[instrument(skip(self))]
    async fn check_code_exists(&self, code: &str) -> ServiceResult<bool> {
        self.store.exists_by_key(code).await
    }
}

/// Bind every operation of `service` and register it at [`ADDRESS`].
pub fn register(
    registry: &mut ServiceRegistry,
    service: Arc<dyn UnitOfMeasureService>,
) -> Result<(), RegistryError> {
    let handler = ServiceBinder::new("UnitOfMeasureService", service)
        .operation(
            "listUnitOfMeasures",
            &[ArgKind::Int, ArgKind::Int, ArgKind::String],
            |svc, args| async move {
                let sort = args.string(2)?;
                svc.list_unit_of_measures(args.int(0)?, args.int(1)?, &sort)
                    .await
            },
        )
        .operation(
            "createUnitOfMeasure",
            &[ArgKind::String, ArgKind::String, ArgKind::OptString],
            |svc, args| async move {
                let params = UnitOfMeasureCreate {
                    code: args.string(0)?,
                    name: args.string(1)?,
                    base_unit: args.opt_string(2)?,
                };
                svc.create_unit_of_measure(params).await
            },
        )
        .operation(
            "getUnitOfMeasure",
            &[ArgKind::String],
            |svc, args| async move {
                let id = args.string(0)?;
                svc.get_unit_of_measure(&id).await
            },
        )
        .operation(
            "updateUnitOfMeasure",
            &[ArgKind::String, ArgKind::OptString, ArgKind::OptString],
            |svc, args| async move {
                let id = args.string(0)?;
                let update = UnitOfMeasureUpdate {
                    name: args.opt_string(1)?,
                    base_unit: args.opt_string(2)?,
                };
                svc.update_unit_of_measure(&id, update).await
            },
        )
        .operation(
            "deleteUnitOfMeasure",
            &[ArgKind::String],
            |svc, args| async move {
                let id = args.string(0)?;
                svc.delete_unit_of_measure(&id).await
            },
        )
        .operation("checkCodeExists", &[ArgKind::String], |svc, args| async move {
            let code = args.string(0)?;
            svc.check_code_exists(&code).await
        })
        .build();

    registry.register(ADDRESS, handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use service_proxy::{ServiceError, StoreActor};

    fn service() -> UnitOfMeasureServiceImpl {
        let (actor, store) = StoreActor::<UnitOfMeasure>::new(16);
        tokio::spawn(actor.run());
        UnitOfMeasureServiceImpl::new(Arc::new(store))
    }

    fn params(code: &str, base_unit: Option<&str>) -> UnitOfMeasureCreate {
        UnitOfMeasureCreate {
            code: code.into(),
            name: code.to_lowercase(),
            base_unit: base_unit.map(str::to_owned),
        }
    }

    #[tokio::test]
    async fn test_list_by_base_unit_puts_units_without_base_first() {
        let service = service();
        service.create_unit_of_measure(params("BOX12", Some("EA"))).await.unwrap();
        service.create_unit_of_measure(params("EA", None)).await.unwrap();
        service.create_unit_of_measure(params("KG", None)).await.unwrap();

        let page = service
            .list_unit_of_measures(0, 10, "base_unit,asc")
            .await
            .unwrap();

        assert_eq!(page.data.last().map(|u| u.code.as_str()), Some("BOX12"));
        assert_eq!(page.total(), 3);
    }

    #[tokio::test]
    async fn test_update_refreshes_updated_at_only() {
        let service = service();
        let uom = service.create_unit_of_measure(params("EA", None)).await.unwrap();

        let updated = service
            .update_unit_of_measure(
                &uom.uom_id.to_string(),
                UnitOfMeasureUpdate {
                    name: Some("each".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.created_at, uom.created_at);
        assert!(updated.updated_at >= uom.updated_at);
        assert_eq!(updated.code, "EA");
    }

    #[tokio::test]
    async fn test_get_delete_and_code_check() {
        let service = service();
        let uom = service.create_unit_of_measure(params("KG", None)).await.unwrap();
        let id = uom.uom_id.to_string();

        assert!(service.check_code_exists("KG").await.unwrap());
        assert_eq!(service.get_unit_of_measure(&id).await.unwrap(), uom);

        service.delete_unit_of_measure(&id).await.unwrap();
        assert!(!service.check_code_exists("KG").await.unwrap());
        assert_eq!(
            service.get_unit_of_measure(&id).await.unwrap_err(),
            ServiceError::not_found("UnitOfMeasure", &id)
        );
        assert!(service.delete_unit_of_measure(&id).await.is_err());
    }
}
