//! # System Lifecycle & Orchestration
//!
//! Starting, wiring and stopping the inventory backend.
//!
//! ## The InventorySystem Pattern
//!
//! [`InventorySystem`] is the application-lifetime object. It is passed around by value or
//! reference, never reached through a global, so tests can run several isolated systems
//! side by side.
//!
//! ```rust,ignore
//! impl InventorySystem {
//!     pub fn start(config: &SystemConfig) -> Result<Self, LifecycleError> {
//!         // 1. Create store actors and spawn them
//!         // 2. Build each service over its store client(s)
//!         // 3. Register each service at its address
//!         // 4. Freeze the registry inside a Dispatcher
//!     }
//!
//!     pub async fn shutdown(self) -> Result<(), LifecycleError> {
//!         // Drop the dispatcher, then await every store actor
//!     }
//! }
//! ```
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop the dispatcher** - releases the registry, the services and their store clients
//! 2. **Stores detect closure** - `receiver.recv()` returns `None`
//! 3. **Stores log final state** - size at shutdown
//! 4. **Await completion** - all store tasks joined
//!
//! Store clients are shared between services (products read variants and the other way
//! round) but nothing points back at a service, so the graph is acyclic and channel closure
//! is enough to stop everything.
//!
//! ## Configuration
//!
//! [`SystemConfig`] is loaded with figment; see the [`config`] module.

pub mod config;
pub mod inventory_system;

pub use config::SystemConfig;
pub use inventory_system::InventorySystem;

use service_proxy::RegistryError;

/// Failures while starting or stopping the system.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("Failed to load config: {0}")]
    Config(#[from] figment::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Store task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}
