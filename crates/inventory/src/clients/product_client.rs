//! # Product Client
//!
//! Provides the [`ProductService`] API on top of the dispatcher, so callers never build
//! positional argument lists themselves.

use crate::model::{Product, ProductCreate, ProductUpdate};
use crate::product_service::{ProductService, ADDRESS};
use async_trait::async_trait;
use serde_json::json;
use service_proxy::{Dispatcher, Page, ServiceResult};
use tracing::{debug, instrument};

/// Client for the product service at `service.product`.
#[derive(Debug, Clone)]
pub struct ProductClient {
    dispatcher: Dispatcher,
}

impl ProductClient {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

pub fn create_proxy(dispatcher: &Dispatcher) -> ProductClient {
    ProductClient::new(dispatcher.clone())
}

#[async_trait]
impl ProductService for ProductClient {
    #[instrument(skip(self))]
    async fn list_products(
        &self,
        page: i32,
        size: i32,
        sort: &str,
    ) -> ServiceResult<Page<Product>> {
        self.dispatcher
            .call(ADDRESS, "listProducts", vec![json!(page), json!(size), json!(sort)])
            .await
    }

    #[instrument(skip(self))]
    async fn create_product(&self, params: ProductCreate) -> ServiceResult<Product> {
        debug!("Sending request");
        let args = vec![
            json!(params.sku),
            json!(params.name),
            json!(params.product_type),
            json!(params.base_uom),
            json!(params.metadata),
        ];
        self.dispatcher.call(ADDRESS, "createProduct", args).await
    }

    #[instrument(skip(self))]
    async fn get_product(&self, product_id: &str) -> ServiceResult<Product> {
        self.dispatcher
            .call(ADDRESS, "getProduct", vec![json!(product_id)])
            .await
    }

    #[instrument(skip(self))]
    async fn update_product(
        &self,
        product_id: &str,
        update: ProductUpdate,
    ) -> ServiceResult<Product> {
        debug!("Sending request");
        let args = vec![
            json!(product_id),
            json!(update.name),
            json!(update.product_type),
            json!(update.metadata),
            json!(update.active),
        ];
        self.dispatcher.call(ADDRESS, "updateProduct", args).await
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, product_id: &str) -> ServiceResult<()> {
        self.dispatcher
            .call(ADDRESS, "deleteProduct", vec![json!(product_id)])
            .await
    }

    #[instrument(skip(self))]
    async fn check_sku_exists(&self, sku: &str) -> ServiceResult<bool> {
        self.dispatcher
            .call(ADDRESS, "checkSkuExists", vec![json!(sku)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogLock;
    use crate::model::ProductVariant;
    use crate::product_service::{self, ProductServiceImpl};
    use service_proxy::{ErrorKind, ServiceRegistry, StoreActor};
    use std::sync::Arc;

    fn proxy() -> ProductClient {
        let (product_actor, products) = StoreActor::<Product>::new(16);
        let (variant_actor, variants) = StoreActor::<ProductVariant>::new(16);
        tokio::spawn(product_actor.run());
        tokio::spawn(variant_actor.run());

        let mut registry = ServiceRegistry::new();
        product_service::register(
            &mut registry,
            Arc::new(ProductServiceImpl::new(
                Arc::new(products),
                Arc::new(variants),
                CatalogLock::new(),
            )),
        )
        .unwrap();
        create_proxy(&Dispatcher::new(registry))
    }

    #[tokio::test]
    async fn test_proxy_round_trips_every_operation() {
        let client = proxy();

        let metadata = json!({"brand": "Acme"}).as_object().cloned();
        let created = client
            .create_product(ProductCreate {
                sku: "SKU-1".into(),
                name: "Shirt".into(),
                product_type: "GOODS".into(),
                base_uom: "EA".into(),
                metadata: metadata.clone(),
            })
            .await
            .unwrap();
        assert_eq!(created.sku, "SKU-1");
        assert_eq!(created.name, "Shirt");
        assert_eq!(created.product_type, "GOODS");
        assert_eq!(created.base_uom, "EA");
        assert_eq!(Some(created.metadata.clone()), metadata);
        assert!(created.active);

        let id = created.product_id.to_string();
        assert_eq!(client.get_product(&id).await.unwrap(), created);
        assert!(client.check_sku_exists("SKU-1").await.unwrap());
        assert!(!client.check_sku_exists("SKU-2").await.unwrap());

        let updated = client
            .update_product(
                &id,
                ProductUpdate {
                    product_type: Some("SERVICE".into()),
                    active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Shirt");
        assert_eq!(updated.product_type, "SERVICE");
        assert_eq!(updated.metadata, created.metadata);
        assert!(!updated.active);

        let renamed = client
            .update_product(
                &id,
                ProductUpdate {
                    name: Some("Shirt (cotton)".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Shirt (cotton)");
        assert_eq!(renamed.product_type, "SERVICE");
        assert!(!renamed.active);

        let page = client.list_products(0, 10, "sku,desc").await.unwrap();
        assert_eq!(page.pagination.total_elements, 1);
        assert_eq!(page.data, vec![renamed]);

        client.delete_product(&id).await.unwrap();
        assert!(!client.check_sku_exists("SKU-1").await.unwrap());
        let err = client.get_product(&id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
