//! # Product Variant Service
//!
//! Variants of a product, exposed at [`ADDRESS`]. Listing, creating and reading are scoped
//! by the parent product:
//!
//! - `listProductVariants` and `createProductVariant` fail with `NotFound` (entity
//!   `Product`) when the parent does not exist.
//! - `getProductVariant` fails with `NotFound` (entity `ProductVariant`) when the variant
//!   exists but belongs to a different product.
//!
//! Update and delete address the variant alone, as in the public operation table.
//!
//! Create holds the [`CatalogLock`] shared, so a concurrent product delete either sees
//! the new variant or makes the create fail with `NotFound`.

use crate::catalog::CatalogLock;
use crate::model::{
    parse_id, Product, ProductVariant, ProductVariantCreate, ProductVariantFilter,
    ProductVariantUpdate,
};
use async_trait::async_trait;
use service_proxy::{
    ArgKind, Page, PageRequest, RegistryError, ServiceBinder, ServiceError, ServiceRegistry,
    ServiceResult, SharedStore, SortSpec, StoredEntity,
};
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Public routing key of the product variant service.
pub const ADDRESS: &str = "service.productVariant";

#[async_trait]
pub trait ProductVariantService: Send + Sync {
    async fn list_product_variants(
        &self,
        product_id: &str,
        page: i32,
        size: i32,
        sort: &str,
    ) -> ServiceResult<Page<ProductVariant>>;

    async fn create_product_variant(
        &self,
        params: ProductVariantCreate,
    ) -> ServiceResult<ProductVariant>;

    async fn get_product_variant(
        &self,
        product_id: &str,
        variant_id: &str,
    ) -> ServiceResult<ProductVariant>;

    async fn update_product_variant(
        &self,
        variant_id: &str,
        update: ProductVariantUpdate,
    ) -> ServiceResult<ProductVariant>;

    async fn delete_product_variant(&self, variant_id: &str) -> ServiceResult<()>;

    /// Advisory existence check; `create_product_variant` re-checks atomically.
    async fn check_sku_exists(&self, sku: &str) -> ServiceResult<bool>;
}

pub struct ProductVariantServiceImpl {
    variants: SharedStore<ProductVariant>,
    products: SharedStore<Product>,
    catalog: CatalogLock,
}

impl ProductVariantServiceImpl {
    pub fn new(
        variants: SharedStore<ProductVariant>,
        products: SharedStore<Product>,
        catalog: CatalogLock,
    ) -> Self {
        Self {
            variants,
            products,
            catalog,
        }
    }

    /// Resolve the parent, failing with `NotFound` for a missing product.
    async fn parent(&self, product_id: Uuid) -> ServiceResult<Product> {
        self.products.fetch(product_id).await
    }
}

#[async_trait]
impl ProductVariantService for ProductVariantServiceImpl {
    #[instrument(skip(self))]
    async fn list_product_variants(
        &self,
        product_id: &str,
        page: i32,
        size: i32,
        sort: &str,
    ) -> ServiceResult<Page<ProductVariant>> {
        let page = PageRequest::new(page, size)?;
        let sort = SortSpec::parse::<ProductVariant>(sort)?;
        let product_id = parse_id(Product::ENTITY, product_id)?;
        self.parent(product_id).await?;

        self.variants
            .query(ProductVariantFilter::of_product(product_id), sort, page)
            .await
    }

    #[instrument(skip(self, params), fields(product_id = %params.product_id, sku = %params.sku))]
    async fn create_product_variant(
        &self,
        params: ProductVariantCreate,
    ) -> ServiceResult<ProductVariant> {
        debug!(?params, "create_product_variant called");
        let _catalog = self.catalog.shared().await;
        self.parent(params.product_id).await?;
        self.variants.create(params).await
    }

    #[instrument(skip(self))]
    async fn get_product_variant(
        &self,
        product_id: &str,
        variant_id: &str,
    ) -> ServiceResult<ProductVariant> {
        let product_id = parse_id(Product::ENTITY, product_id)?;
        let id = parse_id(ProductVariant::ENTITY, variant_id)?;

        let variant = self.variants.fetch(id).await?;
        if variant.product_id != product_id {
            debug!(%id, owner = %variant.product_id, "Variant belongs to another product");
            return Err(ServiceError::not_found(ProductVariant::ENTITY, id));
        }
        Ok(variant)
    }

    #[instrument(skip(self))]
    async fn update_product_variant(
        &self,
        variant_id: &str,
        update: ProductVariantUpdate,
    ) -> ServiceResult<ProductVariant> {
        let id = parse_id(ProductVariant::ENTITY, variant_id)?;
        self.variants.update(id, update).await
    }

    #[instrument(skip(self))]
    async fn delete_product_variant(&self, variant_id: &str) -> ServiceResult<()> {
        let id = parse_id(ProductVariant::ENTITY, variant_id)?;
        self.variants.delete(id).await
    }

    #[instrument(skip(self))]
    async fn check_sku_exists(&self, sku: &str) -> ServiceResult<bool> {
        self.variants.exists_by_key(sku).await
    }
}

/// Bind every operation of `service` and register it at [`ADDRESS`].
pub fn register(
    registry: &mut ServiceRegistry,
    service: Arc<dyn ProductVariantService>,
) -> Result<(), RegistryError> {
    let handler = ServiceBinder::new("ProductVariantService", service)
        .operation(
            "listProductVariants",
            &[ArgKind::String, ArgKind::Int, ArgKind::Int, ArgKind::String],
            |svc, args| async move {
                let product_id = args.string(0)?;
                let sort = args.string(3)?;
                svc.list_product_variants(&product_id, args.int(1)?, args.int(2)?, &sort)
                    .await
            },
        )
        .operation(
            "createProductVariant",
            &[
                ArgKind::String,
                ArgKind::String,
                ArgKind::String,
                ArgKind::OptObject,
            ],
            |svc, args| async move {
                let params = ProductVariantCreate {
                    product_id: parse_id(Product::ENTITY, &args.string(0)?)?,
                    sku: args.string(1)?,
                    name: args.string(2)?,
                    attributes: args.opt_object(3)?,
                };
                svc.create_product_variant(params).await
            },
        )
        .operation(
            "getProductVariant",
            &[ArgKind::String, ArgKind::String],
            |svc, args| async move {
                let product_id = args.string(0)?;
                let variant_id = args.string(1)?;
                svc.get_product_variant(&product_id, &variant_id).await
            },
        )
        .operation(
            "updateProductVariant",
            &[
                ArgKind::String,
                ArgKind::OptString,
                ArgKind::OptObject,
                ArgKind::OptBool,
            ],
            |svc, args| async move {
                let id = args.string(0)?;
                let update = ProductVariantUpdate {
                    name: args.opt_string(1)?,
                    attributes: args.opt_object(2)?,
                    active: args.opt_bool(3)?,
                };
                svc.update_product_variant(&id, update).await
            },
        )
        .operation(
            "deleteProductVariant",
            &[ArgKind::String],
            |svc, args| async move {
                let id = args.string(0)?;
                svc.delete_product_variant(&id).await
            },
        )
        .operation("checkSkuExists", &[ArgKind::String], |svc, args| async move {
            let sku = args.string(0)?;
            svc.check_sku_exists(&sku).await
        })
        .build();

    registry.register(ADDRESS, handler)
}
