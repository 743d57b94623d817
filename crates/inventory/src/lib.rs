//! # Inventory Services
//!
//! Locations, products, product variants and units of measure, each exposed as an
//! address-routed service on top of [`service_proxy`].
//!
//! | Address                  | Service                                                   |
//! |--------------------------|-----------------------------------------------------------|
//! | `service.location`       | [`LocationService`](location_service::LocationService)    |
//! | `service.product`        | [`ProductService`](product_service::ProductService)       |
//! | `service.productVariant` | [`ProductVariantService`](product_variant_service::ProductVariantService) |
//! | `service.uom`            | [`UnitOfMeasureService`](uom_service::UnitOfMeasureService) |
//!
//! This library exposes the modules for the demo binary and for integration testing.

pub mod catalog;
pub mod clients;
pub mod lifecycle;
pub mod location_service;
pub mod model;
pub mod product_service;
pub mod product_variant_service;
pub mod uom_service;
