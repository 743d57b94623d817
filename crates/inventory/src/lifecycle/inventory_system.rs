use super::{LifecycleError, SystemConfig};
use crate::catalog::CatalogLock;
use crate::clients::{
    location_client, product_client, product_variant_client, uom_client, LocationClient,
    ProductClient, ProductVariantClient, UnitOfMeasureClient,
};
use crate::location_service::{self, LocationServiceImpl};
use crate::model::{Location, Product, ProductVariant, UnitOfMeasure};
use crate::product_service::{self, ProductServiceImpl};
use crate::product_variant_service::{self, ProductVariantServiceImpl};
use crate::uom_service::{self, UnitOfMeasureServiceImpl};
use service_proxy::{Dispatcher, ServiceRegistry, StoreActor};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The running inventory backend: four store actors, four services registered at their
/// addresses, one dispatcher in front.
///
/// # Architecture
///
/// - **Stores**: one [`StoreActor`] per entity type
/// - **Services**: store-backed implementations; products also read the variant store,
///   variants also read the product store
/// - **Dispatcher**: owns the registry; every proxy handed out holds a clone of it
///
/// # Example
///
/// ```ignore
/// let system = InventorySystem::start(&SystemConfig::default())?;
///
/// let locations = system.locations();
/// let wh1 = locations.create_location(params).await?;
/// drop(locations);
///
/// system.shutdown().await?;
/// ```
pub struct InventorySystem {
    dispatcher: Dispatcher,

    /// Task handles for the store actors (used for graceful shutdown)
    handles: Vec<JoinHandle<()>>,
}

impl InventorySystem {
    /// Spawns the stores, builds and registers the services. Must be called inside a Tokio
    /// runtime.
    pub fn start(config: &SystemConfig) -> Result<Self, LifecycleError> {
        config.validate()?;
        let buffer = config.store_buffer;

        // 1. Create store actors
        let (location_actor, locations) = StoreActor::<Location>::new(buffer);
        let (product_actor, products) = StoreActor::<Product>::new(buffer);
        let (variant_actor, variants) = StoreActor::<ProductVariant>::new(buffer);
        let (uom_actor, uoms) = StoreActor::<UnitOfMeasure>::new(buffer);

        // 2. Start them
        let handles = vec![
            tokio::spawn(location_actor.run()),
            tokio::spawn(product_actor.run()),
            tokio::spawn(variant_actor.run()),
            tokio::spawn(uom_actor.run()),
        ];

        // 3. Wire services and bind them to their addresses
        let products = Arc::new(products);
        let variants = Arc::new(variants);
        let catalog = CatalogLock::new();
        let mut registry = ServiceRegistry::new();

        location_service::register(
            &mut registry,
            Arc::new(LocationServiceImpl::new(Arc::new(locations))),
        )?;
        product_service::register(
            &mut registry,
            Arc::new(ProductServiceImpl::new(
                products.clone(),
                variants.clone(),
                catalog.clone(),
            )),
        )?;
        product_variant_service::register(
            &mut registry,
            Arc::new(ProductVariantServiceImpl::new(variants, products, catalog)),
        )?;
        uom_service::register(
            &mut registry,
            Arc::new(UnitOfMeasureServiceImpl::new(Arc::new(uoms))),
        )?;

        info!(addresses = ?registry.addresses(), "Inventory system started");

        Ok(Self {
            dispatcher: Dispatcher::new(registry),
            handles,
        })
    }

    /// Raw entry point for transports: `invoke(address, operation, args)`.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn locations(&self) -> LocationClient {
        location_client::create_proxy(&self.dispatcher)
    }

    pub fn products(&self) -> ProductClient {
        product_client::create_proxy(&self.dispatcher)
    }

    pub fn product_variants(&self) -> ProductVariantClient {
        product_variant_client::create_proxy(&self.dispatcher)
    }

    pub fn units_of_measure(&self) -> UnitOfMeasureClient {
        uom_client::create_proxy(&self.dispatcher)
    }

    /// Gracefully shuts down the entire system.
    ///
    /// Dropping the dispatcher releases the registry, the services and their store clients;
    /// each store actor then sees its channel close and exits. Proxies and dispatcher clones
    /// still held elsewhere keep the stores alive, so drop them first or this waits for
    /// them.
    pub async fn shutdown(self) -> Result<(), LifecycleError> {
        info!("Shutting down inventory system...");

        drop(self.dispatcher);

        let mut first_failure = None;
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Store task failed");
                first_failure.get_or_insert(e);
            }
        }

        match first_failure {
            Some(e) => Err(e.into()),
            None => {
                info!("Inventory system shutdown complete.");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_shutdown_joins_every_store_before_reporting_a_failure() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&finished);

        let system = InventorySystem {
            dispatcher: Dispatcher::new(ServiceRegistry::new()),
            handles: vec![
                tokio::spawn(async {
                    panic!("store crashed");
                }),
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    flag.store(true, Ordering::SeqCst);
                }),
            ],
        };

        let result = system.shutdown().await;

        assert!(matches!(result, Err(LifecycleError::TaskFailed(_))));
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_clean_shutdown_after_start() {
        let system = InventorySystem::start(&SystemConfig::default()).unwrap();
        system.shutdown().await.unwrap();
    }
}
