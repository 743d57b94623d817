//! # Location Client
//!
//! [`LocationService`] over the dispatcher: each call becomes an `invoke` on
//! `service.location` with the positional arguments of the public operation table.

use crate::location_service::{LocationService, ADDRESS};
use crate::model::{Location, LocationCreate, LocationFilter, LocationUpdate};
use async_trait::async_trait;
use serde_json::json;
use service_proxy::{Dispatcher, Page, ServiceResult};
use tracing::{debug, instrument};

/// Address-routed client for the location service.
#[derive(Debug, Clone)]
pub struct LocationClient {
    dispatcher: Dispatcher,
}

impl LocationClient {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

/// Proxy for the location service routed through `dispatcher`.
pub fn create_proxy(dispatcher: &Dispatcher) -> LocationClient {
    LocationClient::new(dispatcher.clone())
}

#[async_trait]
impl LocationService for LocationClient {
    #[instrument(skip(self))]
    async fn list_locations(
        &self,
        page: i32,
        size: i32,
        sort: &str,
        filter: LocationFilter,
    ) -> ServiceResult<Page<Location>> {
        debug!("Sending request");
        let args = vec![
            json!(page),
            json!(size),
            json!(sort),
            json!(filter.code),
            json!(filter.name),
            json!(filter.location_type),
            json!(filter.active_only),
        ];
        self.dispatcher.call(ADDRESS, "listLocations", args).await
    }

    #[instrument(skip(self))]
    async fn create_location(&self, params: LocationCreate) -> ServiceResult<Location> {
        debug!("Sending request");
        let args = vec![
            json!(params.code),
            json!(params.name),
            json!(params.location_type),
            json!(params.address),
        ];
        self.dispatcher.call(ADDRESS, "createLocation", args).await
    }

    #[instrument(skip(self))]
    async fn get_location(&self, location_id: &str) -> ServiceResult<Location> {
        self.dispatcher
            .call(ADDRESS, "getLocation", vec![json!(location_id)])
            .await
    }

    #[instrument(skip(self))]
    async fn get_location_by_code(&self, code: &str) -> ServiceResult<Location> {
        self.dispatcher
            .call(ADDRESS, "getLocationByCode", vec![json!(code)])
            .await
    }

    #[instrument(skip(self))]
    async fn update_location(
        &self,
        location_id: &str,
        update: LocationUpdate,
    ) -> ServiceResult<Location> {
        debug!("Sending request");
        let args = vec![
            json!(location_id),
            json!(update.name),
            json!(update.location_type),
            json!(update.address),
            json!(update.is_active),
        ];
        self.dispatcher.call(ADDRESS, "updateLocation", args).await
    }

    #[instrument(skip(self))]
    async fn delete_location(&self, location_id: &str) -> ServiceResult<()> {
        self.dispatcher
            .call(ADDRESS, "deleteLocation", vec![json!(location_id)])
            .await
    }

    #[instrument(skip(self))]
    async fn check_code_exists(&self, code: &str) -> ServiceResult<bool> {
        self.dispatcher
            .call(ADDRESS, "checkCodeExists", vec![json!(code)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location_service::{self, LocationServiceImpl};
    use service_proxy::{ErrorKind, ServiceRegistry, StoreActor};
    use std::sync::Arc;

    fn proxy() -> LocationClient {
        let (actor, store) = StoreActor::<Location>::new(16);
        tokio::spawn(actor.run());

        let mut registry = ServiceRegistry::new();
        location_service::register(
            &mut registry,
            Arc::new(LocationServiceImpl::new(Arc::new(store))),
        )
        .unwrap();
        create_proxy(&Dispatcher::new(registry))
    }

    #[tokio::test]
    async fn test_proxy_round_trips_every_operation() {
        let client = proxy();

        let address = json!({"city": "Lyon"}).as_object().cloned();
        let created = client
            .create_location(LocationCreate {
                code: "WH1".into(),
                name: "Main".into(),
                location_type: "WAREHOUSE".into(),
                address: address.clone(),
            })
            .await
            .unwrap();
        assert_eq!(Some(created.address.clone()), address);

        let id = created.location_id.to_string();
        assert_eq!(client.get_location(&id).await.unwrap(), created);
        assert_eq!(client.get_location_by_code("WH1").await.unwrap(), created);
        assert!(client.check_code_exists("WH1").await.unwrap());

        let updated = client
            .update_location(
                &id,
                LocationUpdate {
                    name: Some("Main Hall".into()),
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Main Hall");
        assert!(!updated.is_active);
        assert_eq!(updated.location_type, "WAREHOUSE");

        let page = client
            .list_locations(0, 10, "code", LocationFilter::default())
            .await
            .unwrap();
        assert_eq!(page.data, vec![updated]);

        client.delete_location(&id).await.unwrap();
        let err = client.delete_location(&id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
