//! # Service Proxies
//!
//! Typed clients that implement each service trait by dispatching to its address. Code
//! written against `dyn LocationService` (and the others) works the same with the local
//! implementation or with these proxies.
//!
//! Every proxy holds a [`Dispatcher`](service_proxy::Dispatcher) clone, and with it the
//! whole registry. Drop proxies before shutting the system down.

pub mod location_client;
pub mod product_client;
pub mod product_variant_client;
pub mod uom_client;

pub use location_client::LocationClient;
pub use product_client::ProductClient;
pub use product_variant_client::ProductVariantClient;
pub use uom_client::UnitOfMeasureClient;
