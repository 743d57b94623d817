//! # Inventory Demo
//!
//! Starts an [`InventorySystem`] and drives it through the typed proxies and the raw
//! dispatcher:
//! 1.  Creating a location, then failing to create it again under the same code.
//! 2.  Listing and deleting it.
//! 3.  Creating a product with a variant and showing the variant is scoped to its parent.
//! 4.  Refusing to delete a product that still has variants.
//!
//! Configuration comes from `inventory.toml` and `INVENTORY_*` variables; see
//! [`SystemConfig`].

use inventory::lifecycle::{InventorySystem, SystemConfig};
use inventory::location_service::LocationService;
use inventory::model::{LocationCreate, LocationFilter, ProductCreate, ProductVariantCreate};
use inventory::product_service::{self, ProductService};
use inventory::product_variant_service::ProductVariantService;
use serde_json::json;
use service_proxy::telemetry::setup_tracing;
use std::error::Error;
use tracing::{error, info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = SystemConfig::load()?;
    setup_tracing(&config.log_filter);

    info!(store_buffer = config.store_buffer, "Starting inventory demo");

    let system = InventorySystem::start(&config)?;

    let span = tracing::info_span!("locations");
    async {
        let locations = system.locations();
        let wh1 = locations
            .create_location(LocationCreate {
                code: "WH1".to_string(),
                name: "Main".to_string(),
                location_type: "WAREHOUSE".to_string(),
                address: None,
            })
            .await?;
        info!(location_id = %wh1.location_id, code = %wh1.code, "Location created");

        let again = locations
            .create_location(LocationCreate {
                code: "WH1".to_string(),
                name: "Other".to_string(),
                location_type: "STORE".to_string(),
                address: None,
            })
            .await;
        match again {
            Err(e) => warn!(kind = %e.kind(), error = %e, "Second create rejected"),
            Ok(location) => error!(location_id = %location.location_id, "Duplicate accepted"),
        }

        let page = locations
            .list_locations(0, 20, "code,asc", LocationFilter::default())
            .await?;
        info!(total = page.pagination.total_elements, "Locations listed");

        locations
            .delete_location(&wh1.location_id.to_string())
            .await?;
        let page = locations
            .list_locations(0, 20, "", LocationFilter::default())
            .await?;
        info!(total = page.pagination.total_elements, "Location deleted");

        Ok::<_, Box<dyn Error>>(())
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("catalog");
    async {
        let products = system.products();
        let variants = system.product_variants();

        let shirt = products
            .create_product(ProductCreate {
                sku: "SKU-1".to_string(),
                name: "Shirt".to_string(),
                product_type: "GOODS".to_string(),
                base_uom: "EA".to_string(),
                metadata: None,
            })
            .await?;
        let other = products
            .create_product(ProductCreate {
                sku: "SKU-2".to_string(),
                name: "Trousers".to_string(),
                product_type: "GOODS".to_string(),
                base_uom: "EA".to_string(),
                metadata: None,
            })
            .await?;

        let red = variants
            .create_product_variant(ProductVariantCreate {
                product_id: shirt.product_id,
                sku: "SKU-1-RED".to_string(),
                name: "Shirt (red)".to_string(),
                attributes: Some(
                    json!({ "color": "red" })
                        .as_object()
                        .cloned()
                        .unwrap_or_default(),
                ),
            })
            .await?;
        info!(variant_id = %red.variant_id, product_id = %shirt.product_id, "Variant created");

        let wrong_parent = variants
            .get_product_variant(&other.product_id.to_string(), &red.variant_id.to_string())
            .await;
        if let Err(e) = wrong_parent {
            info!(kind = %e.kind(), "Variant is not visible under another product");
        }

        // Same operation over the raw dispatcher, as a transport would issue it.
        let refused = system
            .dispatcher()
            .invoke(
                product_service::ADDRESS,
                "deleteProduct",
                vec![json!(shirt.product_id.to_string())],
            )
            .await;
        match refused {
            Err(e) => warn!(kind = %e.kind(), error = %e, "Product delete refused"),
            Ok(_) => error!("Product with variants was deleted"),
        }

        Ok::<_, Box<dyn Error>>(())
    }
    .instrument(span)
    .await?;

    system.shutdown().await?;

    info!("Inventory demo completed");
    Ok(())
}
