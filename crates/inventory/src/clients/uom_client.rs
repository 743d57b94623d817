use crate::model::{UnitOfMeasure, UnitOfMeasureCreate, UnitOfMeasureUpdate};
use crate::uom_service::{UnitOfMeasureService, ADDRESS};
use async_trait::async_trait;
use serde_json::json;
use service_proxy::{Dispatcher, Page, ServiceResult};
use tracing::instrument;

/// Client for the unit of measure service at `service.uom`.
#[derive(Debug, Clone)]
pub struct UnitOfMeasureClient {
    dispatcher: Dispatcher,
}

impl UnitOfMeasureClient {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

pub fn create_proxy(dispatcher: &Dispatcher) -> UnitOfMeasureClient {
    UnitOfMeasureClient::new(dispatcher.clone())
}

#[async_trait]
impl UnitOfMeasureService for UnitOfMeasureClient {
    #[instrument(skip(self))]
    async fn list_unit_of_measures(
        &self,
        page: i32,
        size: i32,
        sort: &str,
    ) -> ServiceResult<Page<UnitOfMeasure>> {
        let args = vec![json!(page), json!(size), json!(sort)];
        self.dispatcher.call(ADDRESS, "listUnitOfMeasures", args).await
    }

    #[instrument(skip(self))]
    async fn create_unit_of_measure(
        &self,
        params: UnitOfMeasureCreate,
    ) -> ServiceResult<UnitOfMeasure> {
        let args = vec![json!(params.code), json!(params.name), json!(params.base_unit)];
        self.dispatcher.call(ADDRESS, "createUnitOfMeasure", args).await
    }

    #[instrument(skip(self))]
    async fn get_unit_of_measure(&self, uom_id: &str) -> ServiceResult<UnitOfMeasure> {
        self.dispatcher
            .call(ADDRESS, "getUnitOfMeasure", vec![json!(uom_id)])
            .await
    }

    #[instrument(skip(self))]
    async fn update_unit_of_measure(
        &self,
        uom_id: &str,
        update: UnitOfMeasureUpdate,
    ) -> ServiceResult<UnitOfMeasure> {
        let args = vec![json!(uom_id), json!(update.name), json!(update.base_unit)];
        self.dispatcher.call(ADDRESS, "updateUnitOfMeasure", args).await
    }

    #[instrument(skip(self))]
    async fn delete_unit_of_measure(&self, uom_id: &str) -> ServiceResult<()> {
        self.dispatcher
            .call(ADDRESS, "deleteUnitOfMeasure", vec![json!(uom_id)])
            .await
    }

    #[instrument(skip(self))]
    async fn check_code_exists(&self, code: &str) -> ServiceResult<bool> {
        self.dispatcher
            .call(ADDRESS, "checkCodeExists", vec![json!(code)])
            .await
    }
}
