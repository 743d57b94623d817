use crate::model::{ProductVariant, ProductVariantCreate, ProductVariantUpdate};
use crate::product_variant_service::{ProductVariantService, ADDRESS};
use async_trait::async_trait;
use serde_json::json;
use service_proxy::{Dispatcher, Page, ServiceResult};
use tracing::{debug, instrument};

/// Client for the product variant service at `service.productVariant`.
#[derive(Debug, Clone)]
pub struct ProductVariantClient {
    dispatcher: Dispatcher,
}

impl ProductVariantClient {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

pub fn create_proxy(dispatcher: &Dispatcher) -> ProductVariantClient {
    ProductVariantClient::new(dispatcher.clone())
}

#[async_trait]
impl ProductVariantService for ProductVariantClient {
    #[instrument(skip(self))]
    async fn list_product_variants(
        &self,
        product_id: &str,
        page: i32,
        size: i32,
        sort: &str,
    ) -> ServiceResult<Page<ProductVariant>> {
        let args = vec![json!(product_id), json!(page), json!(size), json!(sort)];
        self.dispatcher.call(ADDRESS, "listProductVariants", args).await
    }

    #[instrument(skip(self))]
    async fn create_product_variant(
        &self,
        params: ProductVariantCreate,
    ) -> ServiceResult<ProductVariant> {
        debug!("Sending request");
        let args = vec![
            json!(params.product_id.to_string()),
            json!(params.sku),
            json!(params.name),
            json!(params.attributes),
        ];
        self.dispatcher.call(ADDRESS, "createProductVariant", args).await
    }

    #[instrument(skip(self))]
    async fn get_product_variant(
        &self,
        product_id: &str,
        variant_id: &str,
    ) -> ServiceResult<ProductVariant> {
        let args = vec![json!(product_id), json!(variant_id)];
        self.dispatcher.call(ADDRESS, "getProductVariant", args).await
    }

    #[instrument(skip(self))]
    async fn update_product_variant(
        &self,
        variant_id: &str,
        update: ProductVariantUpdate,
    ) -> ServiceResult<ProductVariant> {
        debug!("Sending request");
        let args = vec![
            json!(variant_id),
            json!(update.name),
            json!(update.attributes),
            json!(update.active),
        ];
        self.dispatcher.call(ADDRESS, "updateProductVariant", args).await
    }

    #[instrument(skip(self))]
    async fn delete_product_variant(&self, variant_id: &str) -> ServiceResult<()> {
        self.dispatcher
            .call(ADDRESS, "deleteProductVariant", vec![json!(variant_id)])
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
    use crate::model::{Product, ProductCreate};
    use crate::product_variant_service::{self, ProductVariantServiceImpl};
    use service_proxy::{EntityStore, ErrorKind, ServiceRegistry, StoreActor};
    use std::sync::Arc;

    /// Proxy plus the ids of two products seeded straight into the product store.
    async fn proxy() -> (ProductVariantClient, String, String) {
        let (product_actor, products) = StoreActor::<Product>::new(16);
        let (variant_actor, variants) = StoreActor::<ProductVariant>::new(16);
        tokio::spawn(product_actor.run());
        tokio::spawn(variant_actor.run());

        let mut ids = Vec::new();
        for sku in ["SKU-1", "SKU-2"] {
            let product = products
                .create(ProductCreate {
                    sku: sku.into(),
                    name: sku.into(),
                    product_type: "GOODS".into(),
                    base_uom: "EA".into(),
                    metadata: None,
                })
                .await
                .unwrap();
            ids.push(product.product_id.to_string());
        }

        let mut registry = ServiceRegistry::new();
        product_variant_service::register(
            &mut registry,
            Arc::new(ProductVariantServiceImpl::new(
                Arc::new(variants),
                Arc::new(products),
                CatalogLock::new(),
            )),
        )
        .unwrap();
        let other = ids.pop().unwrap();
        let parent = ids.pop().unwrap();
        (create_proxy(&Dispatcher::new(registry)), parent, other)
    }

    #[tokio::test]
    async fn test_proxy_round_trips_every_operation() {
        let (client, parent, other) = proxy().await;

        let attributes = json!({"color": "red"}).as_object().cloned();
        let created = client
            .create_product_variant(ProductVariantCreate {
                product_id: parent.parse().unwrap(),
                sku: "SKU-1-RED".into(),
                name: "Red".into(),
                attributes: attributes.clone(),
            })
            .await
            .unwrap();
        assert_eq!(created.product_id.to_string(), parent);
        assert_eq!(created.sku, "SKU-1-RED");
        assert_eq!(created.name, "Red");
        assert_eq!(Some(created.attributes.clone()), attributes);
        assert!(created.active);

        let id = created.variant_id.to_string();
        assert_eq!(
            client.get_product_variant(&parent, &id).await.unwrap(),
            created
        );
        let err = client.get_product_variant(&other, &id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(client.check_sku_exists("SKU-1-RED").await.unwrap());
        assert!(!client.check_sku_exists("SKU-1").await.unwrap());

        let updated = client
            .update_product_variant(
                &id,
                ProductVariantUpdate {
                    attributes: json!({"color": "blue"}).as_object().cloned(),
                    active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Red");
        assert_eq!(updated.attributes.get("color"), Some(&json!("blue")));
        assert!(!updated.active);

        let renamed = client
            .update_product_variant(
                &id,
                ProductVariantUpdate {
                    name: Some("Blue".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Blue");
        assert_eq!(renamed.attributes, updated.attributes);
        assert!(!renamed.active);

        let page = client
            .list_product_variants(&parent, 0, 10, "")
            .await
            .unwrap();
        assert_eq!(page.data, vec![renamed]);
        let page = client
            .list_product_variants(&other, 0, 10, "")
            .await
            .unwrap();
        assert!(page.data.is_empty());

        client.delete_product_variant(&id).await.unwrap();
        assert!(!client.check_sku_exists("SKU-1-RED").await.unwrap());
        let err = client.delete_product_variant(&id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
