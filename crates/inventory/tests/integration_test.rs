use inventory::lifecycle::{InventorySystem, SystemConfig};
use inventory::location_service::{self, LocationService};
use inventory::model::{
    Location, LocationCreate, LocationFilter, ProductCreate, ProductVariantCreate,
    UnitOfMeasureCreate,
};
use inventory::product_service::{self, ProductService};
use inventory::product_variant_service::{self, ProductVariantService};
use inventory::uom_service::{self, UnitOfMeasureService};
use serde_json::{json, Value};
use service_proxy::{ErrorKind, ServiceError};

fn start() -> InventorySystem {
    InventorySystem::start(&SystemConfig::default()).expect("Failed to start system")
}

fn location(code: &str, name: &str) -> LocationCreate {
    LocationCreate {
        code: code.to_string(),
        name: name.to_string(),
        location_type: "WAREHOUSE".to_string(),
        address: None,
    }
}

fn product(sku: &str) -> ProductCreate {
    ProductCreate {
        sku: sku.to_string(),
        name: format!("Product {sku}"),
        product_type: "GOODS".to_string(),
        base_uom: "EA".to_string(),
        metadata: None,
    }
}

/// Location WH1: create, duplicate, list, delete, list again.
#[tokio::test]
async fn test_location_lifecycle_scenario() {
    let system = start();
    let locations = system.locations();

    let wh1 = locations
        .create_location(location("WH1", "Main"))
        .await
        .expect("Failed to create location");
    assert!(wh1.is_active);

    let err = locations
        .create_location(location("WH1", "Other"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ServiceError::DuplicateKey {
            entity: "Location".to_string(),
            field: "code".to_string(),
            key: "WH1".to_string(),
        }
    );

    let page = locations
        .list_locations(0, 20, "", LocationFilter::default())
        .await
        .unwrap();
    assert_eq!(page.pagination.total_elements, 1);
    assert_eq!(page.data, vec![wh1.clone()]);

    let id = wh1.location_id.to_string();
    locations.delete_location(&id).await.unwrap();

    let page = locations
        .list_locations(0, 20, "", LocationFilter::default())
        .await
        .unwrap();
    assert_eq!(page.pagination.total_elements, 0);
    assert!(page.data.is_empty());

    assert_eq!(
        locations.get_location(&id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        locations.delete_location(&id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );

    drop(locations);
    system.shutdown().await.expect("Shutdown failed");
}

/// Product P1 with variant V1; V1 must not be reachable through another product.
#[tokio::test]
async fn test_variant_is_scoped_to_its_product() {
    let system = start();
    let products = system.products();
    let variants = system.product_variants();

    let p1 = products.create_product(product("P1")).await.unwrap();
    let p2 = products.create_product(product("P2")).await.unwrap();

    let v1 = variants
        .create_product_variant(ProductVariantCreate {
            product_id: p1.product_id,
            sku: "P1-RED".to_string(),
            name: "Red".to_string(),
            attributes: None,
        })
        .await
        .unwrap();
    assert_eq!(v1.product_id, p1.product_id);

    let found = variants
        .get_product_variant(&p1.product_id.to_string(), &v1.variant_id.to_string())
        .await
        .unwrap();
    assert_eq!(found, v1);

    let err = variants
        .get_product_variant(&p2.product_id.to_string(), &v1.variant_id.to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let listed = variants
        .list_product_variants(&p2.product_id.to_string(), 0, 10, "")
        .await
        .unwrap();
    assert_eq!(listed.pagination.total_elements, 0);

    drop(products);
    drop(variants);
    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_product_delete_waits_for_variants() {
    let system = start();
    let products = system.products();
    let variants = system.product_variants();

    let p1 = products.create_product(product("P1")).await.unwrap();
    let v1 = variants
        .create_product_variant(ProductVariantCreate {
            product_id: p1.product_id,
            sku: "P1-RED".to_string(),
            name: "Red".to_string(),
            attributes: None,
        })
        .await
        .unwrap();

    let id = p1.product_id.to_string();
    let err = products.delete_product(&id).await.unwrap_err();
    assert_eq!(
        err,
        ServiceError::HasDependents {
            entity: "Product".to_string(),
            id: id.clone(),
            dependent: "ProductVariant".to_string(),
            count: 1,
        }
    );
    assert_eq!(products.get_product(&id).await.unwrap(), p1);

    variants
        .delete_product_variant(&v1.variant_id.to_string())
        .await
        .unwrap();
    products.delete_product(&id).await.unwrap();
    assert_eq!(
        products.get_product(&id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );

    drop(products);
    drop(variants);
    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_list_window_sizes() {
    let system = start();
    let uoms = system.units_of_measure();

    for code in ["BOX", "EA", "KG", "L", "M"] {
        uoms.create_unit_of_measure(UnitOfMeasureCreate {
            code: code.to_string(),
            name: code.to_lowercase(),
            base_unit: None,
        })
        .await
        .unwrap();
    }

    let total = 5usize;
    let size = 2usize;
    for page in 0..5usize {
        let result = uoms
            .list_unit_of_measures(page as i32, size as i32, "code,asc")
            .await
            .unwrap();
        let expected = size.min(total.saturating_sub(page * size));
        assert_eq!(result.data.len(), expected, "page {page}");
        assert_eq!(result.pagination.total_elements, total as u64);
        assert_eq!(result.pagination.total_pages, 3);
    }

    let codes: Vec<String> = uoms
        .list_unit_of_measures(0, 10, "code,desc")
        .await
        .unwrap()
        .data
        .into_iter()
        .map(|uom| uom.code)
        .collect();
    assert_eq!(codes, vec!["M", "L", "KG", "EA", "BOX"]);

    drop(uoms);
    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_check_code_exists_agrees_with_get_by_code() {
    let system = start();
    let locations = system.locations();

    locations
        .create_location(location("WH1", "Main"))
        .await
        .unwrap();

    for code in ["WH1", "WH2", "wh1", ""] {
        let exists = locations.check_code_exists(code).await.unwrap();
        let found = locations.get_location_by_code(code).await.is_ok();
        assert_eq!(exists, found, "code {code:?}");
    }

    drop(locations);
    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_raw_invoke_speaks_json() {
    let system = start();
    let dispatcher = system.dispatcher();

    let created = dispatcher
        .invoke(
            location_service::ADDRESS,
            "createLocation",
            vec![
                json!("WH1"),
                json!("Main"),
                json!("WAREHOUSE"),
                json!({ "city": "Lyon" }),
            ],
        )
        .await
        .unwrap();
    assert_eq!(created["code"], "WH1");
    assert_eq!(created["isActive"], true);
    assert_eq!(created["address"]["city"], "Lyon");

    let id = created["locationId"].as_str().unwrap().to_string();
    let fetched: Location = dispatcher
        .call(location_service::ADDRESS, "getLocation", vec![json!(id)])
        .await
        .unwrap();
    assert_eq!(fetched.code, "WH1");

    let page = dispatcher
        .invoke(
            location_service::ADDRESS,
            "listLocations",
            vec![
                json!(0),
                json!(10),
                json!("name,desc"),
                json!("wh"),
                Value::Null,
                Value::Null,
                json!(true),
            ],
        )
        .await
        .unwrap();
    assert_eq!(page["pagination"]["totalElements"], 1);
    assert_eq!(page["pagination"]["totalPages"], 1);
    assert_eq!(page["data"][0]["locationId"], id.as_str());

    let deleted = dispatcher
        .invoke(location_service::ADDRESS, "deleteLocation", vec![json!(id)])
        .await
        .unwrap();
    assert_eq!(deleted, Value::Null);

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_dispatch_failures_are_typed() {
    let system = start();
    let dispatcher = system.dispatcher();

    let err = dispatcher
        .invoke("service.warehouse", "listLocations", vec![])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownAddress);

    let err = dispatcher
        .invoke(uom_service::ADDRESS, "listLocations", vec![])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownOperation);

    let err = dispatcher
        .invoke(product_service::ADDRESS, "getProduct", vec![json!(42)])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArguments);
    assert!(err.kind().is_dispatch());

    let err = dispatcher
        .invoke(
            product_variant_service::ADDRESS,
            "getProductVariant",
            vec![json!("only-one")],
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArguments);

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_domain_failures_cross_the_dispatcher() {
    let system = start();
    let products = system.products();

    let err = products.list_products(0, 10, "price,asc").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSort);

    let err = products.list_products(-1, 10, "").await.unwrap_err();
    assert_eq!(err, ServiceError::InvalidPageRequest { page: -1, size: 10 });

    let err = products.list_products(0, 0, "").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPageRequest);

    let err = products.get_product("not-a-uuid").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = products.create_product(product("")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    products.create_product(product("P1")).await.unwrap();
    let err = products.create_product(product("P1")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateKey);
    let page = products.list_products(0, 10, "").await.unwrap();
    assert_eq!(page.pagination.total_elements, 1);

    drop(products);
    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_systems_are_isolated() {
    let first = start();
    let second = start();

    let a = first.locations();
    let b = second.locations();

    a.create_location(location("WH1", "Main")).await.unwrap();
    b.create_location(location("WH1", "Main")).await.unwrap();

    assert!(a.check_code_exists("WH1").await.unwrap());
    assert!(!b.check_code_exists("WH2").await.unwrap());

    drop(a);
    drop(b);
    first.shutdown().await.expect("Shutdown failed");
    second.shutdown().await.expect("Shutdown failed");
}

/// A product delete racing a variant create must never leave a variant without its product.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_variant_create_and_product_delete_leave_no_orphan() {
    let system = start();
    let products = system.products();
    let variants = system.product_variants();

    for round in 0..200 {
        let parent = products
            .create_product(product(&format!("RACE-{round}")))
            .await
            .unwrap();
        let id = parent.product_id.to_string();

        let creating = {
            let variants = variants.clone();
            let params = ProductVariantCreate {
                product_id: parent.product_id,
                sku: format!("RACE-{round}-V"),
                name: "Variant".to_string(),
                attributes: None,
            };
            tokio::spawn(async move { variants.create_product_variant(params).await })
        };
        let deleting = {
            let products = products.clone();
            let id = id.clone();
            tokio::spawn(async move { products.delete_product(&id).await })
        };

        let created = creating.await.unwrap();
        let deleted = deleting.await.unwrap();

        match (&created, &deleted) {
            (Ok(variant), Err(e)) => {
                assert_eq!(e.kind(), ErrorKind::HasDependents, "round {round}");
                let listed = variants.list_product_variants(&id, 0, 10, "").await.unwrap();
                assert_eq!(listed.data, vec![variant.clone()], "round {round}");
            }
            (Err(e), Ok(())) => {
                assert_eq!(e.kind(), ErrorKind::NotFound, "round {round}");
                assert!(!variants
                    .check_sku_exists(&format!("RACE-{round}-V"))
                    .await
                    .unwrap());
            }
            other => panic!("round {round}: orphaned or lost outcome {other:?}"),
        }
    }

    drop(products);
    drop(variants);
    system.shutdown().await.expect("Shutdown failed");
}

