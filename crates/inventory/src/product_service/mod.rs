//! # Product Service
//!
//! Catalogue products, exposed at [`ADDRESS`]. Products own no variants, but a product
//! that still has variants cannot be deleted: the delete fails with `HasDependents` and
//! nothing is removed.

use crate::catalog::CatalogLock;
use crate::model::{
    parse_id, Product, ProductCreate, ProductFilter, ProductUpdate, ProductVariant,
    ProductVariantFilter,
};
use async_trait::async_trait;
use service_proxy::{
    ArgKind, Page, PageRequest, RegistryError, ServiceBinder, ServiceError, ServiceRegistry,
    ServiceResult, SharedStore, SortSpec, StoredEntity,
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Public routing key of the product service.
pub const ADDRESS: &str = "service.product";

#[async_trait]
pub trait ProductService: Send + Sync {
    async fn list_products(&self, page: i32, size: i32, sort: &str)
        -> ServiceResult<Page<Product>>;

    async fn create_product(&self, params: ProductCreate) -> ServiceResult<Product>;

    async fn get_product(&self, product_id: &str) -> ServiceResult<Product>;

    async fn update_product(&self, product_id: &str, update: ProductUpdate)
        -> ServiceResult<Product>;

    async fn delete_product(&self, product_id: &str) -> ServiceResult<()>;

    /// Advisory existence check; `create_product` re-checks atomically.
    async fn check_sku_exists(&self, sku: &str) -> ServiceResult<bool>;
}

pub struct ProductServiceImpl {
    products: SharedStore<Product>,
    variants: SharedStore<ProductVariant>,
    catalog: CatalogLock,
}

impl ProductServiceImpl {
    /// `variants` is only read, to refuse deleting a product that still has variants.
    /// `catalog` must be the lock the variant service was built with.
    pub fn new(
        products: SharedStore<Product>,
        variants: SharedStore<ProductVariant>,
        catalog: CatalogLock,
    ) -> Self {
        Self {
            products,
            variants,
            catalog,
        }
    }
}

#[async_trait]
impl ProductService for ProductServiceImpl {
    #[instrument(skip(self))]
    async fn list_products(
        &self,
        page: i32,
        size: i32,
        sort: &str,
    ) -> ServiceResult<Page<Product>> {
        let page = PageRequest::new(page, size)?;
        let sort = SortSpec::parse::<Product>(sort)?;
        self.products.query(ProductFilter, sort, page).await
    }

    #[instrument(skip(self, params), fields(sku = %params.sku))]
    async fn create_product(&self, params: ProductCreate) -> ServiceResult<Product> {
        debug!(?params, "create_product called");
        self.products.create(params).await
    }

    #[instrument(skip(self))]
    async fn get_product(&self, product_id: &str) -> ServiceResult<Product> {
        let id = parse_id(Product::ENTITY, product_id)?;
        self.products.fetch(id).await
    }

    #[instrument(skip(self))]
    async fn update_product(
        &self,
        product_id: &str,
        update: ProductUpdate,
    ) -> ServiceResult<Product> {
        let id = parse_id(Product::ENTITY, product_id)?;
        self.products.update(id, update).await
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, product_id: &str) -> ServiceResult<()> {
        let id = parse_id(Product::ENTITY, product_id)?;
        let _catalog = self.catalog.exclusive().await;
        self.products.fetch(id).await?;

        let count = self
            .variants
            .count(ProductVariantFilter::of_product(id))
            .await?;
        if count > 0 {
            warn!(%id, count, "Product still has variants");
            return Err(ServiceError::HasDependents {
                entity: Product::ENTITY.to_owned(),
                id: id.to_string(),
                dependent: ProductVariant::ENTITY.to_owned(),
                count,
            });
        }

        self.products.delete(id).await
    }

    #[instrument(skip(self))]
    async fn check_sku_exists(&self, sku: &str) -> ServiceResult<bool> {
        self.products.exists_by_key(sku).await
    }
}

/// Bind every operation of `service` and register it at [`ADDRESS`].
pub fn register(
    registry: &mut ServiceRegistry,
    service: Arc<dyn ProductService>,
) -> Result<(), RegistryError> {
    let handler = ServiceBinder::new("ProductService", service)
        .operation(
            "listProducts",
            &[ArgKind::Int, ArgKind::Int, ArgKind::String],
            |svc, args| async move {
                let sort = args.string(2)?;
                svc.list_products(args.int(0)?, args.int(1)?, &sort).await
            },
        )
        .operation(
            "createProduct",
            &[
                ArgKind::String,
                ArgKind::String,
                ArgKind::String,
                ArgKind::String,
                ArgKind::OptObject,
            ],
            |svc, args| async move {
                let params = ProductCreate {
                    sku: args.string(0)?,
                    name: args.string(1)?,
                    product_type: args.string(2)?,
                    base_uom: args.string(3)?,
                    metadata: args.opt_object(4)?,
                };
                svc.create_product(params).await
            },
        )
        .operation("getProduct", &[ArgKind::String], |svc, args| async move {
            let id = args.string(0)?;
            svc.get_product(&id).await
        })
        .operation(
            "updateProduct",
            &[
                ArgKind::String,
                ArgKind::OptString,
                ArgKind::OptString,
                ArgKind::OptObject,
                ArgKind::OptBool,
            ],
            |svc, args| async move {
                let id = args.string(0)?;
                let update = ProductUpdate {
                    name: args.opt_string(1)?,
                    product_type: args.opt_string(2)?,
                    metadata: args.opt_object(3)?,
                    active: args.opt_bool(4)?,
                };
                svc.update_product(&id, update).await
            },
        )
        .operation("deleteProduct", &[ArgKind::String], |svc, args| async move {
            let id = args.string(0)?;
            svc.delete_product(&id).await
        })
        .operation("checkSkuExists", &[ArgKind::String], |svc, args| async move {
            let sku = args.string(0)?;
            svc.check_sku_exists(&sku).await
        })
        .build();

    registry.register(ADDRESS, handler)
}
