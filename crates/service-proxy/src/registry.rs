//! # Service Registry
//!
//! Maps stable string addresses to operation tables. The registry is an ordinary value: it
//! is filled during startup, then moved into a [`Dispatcher`](crate::Dispatcher), which
//! only ever reads it. Steady-state dispatch therefore needs no locking, and tests can
//! build as many isolated registries as they like.
//!
//! Binding is exclusive: registering an address that is already taken fails with
//! [`RegistryError::AddressConflict`] instead of silently replacing the live handler.

use crate::binder::ServiceHandler;
use crate::error::{RegistryError, ServiceError, ServiceResult};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info};

/// Routing key of a service, e.g. `service.location`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceAddress(String);

impl ServiceAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ServiceAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ServiceAddress {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ServiceAddress {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for ServiceAddress {
    fn from(address: String) -> Self {
        Self(address)
    }
}

/// Address → handler table.
#[derive(Debug, Default)]
pub struct ServiceRegistry {
    services: HashMap<ServiceAddress, Arc<ServiceHandler>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `address`. Fails if the address is already bound.
    pub fn register(
        &mut self,
        address: impl Into<ServiceAddress>,
        handler: ServiceHandler,
    ) -> Result<(), RegistryError> {
        match self.services.entry(address.into()) {
            Entry::Occupied(entry) => Err(RegistryError::AddressConflict {
                address: entry.key().to_string(),
            }),
            Entry::Vacant(entry) => {
                info!(
                    address = %entry.key(),
                    service = handler.service(),
                    operations = ?handler.operation_names(),
                    "Registered service"
                );
                entry.insert(Arc::new(handler));
                Ok(())
            }
        }
    }

    /// Remove the binding for `address`, returning the handler if there was one.
    pub fn unregister(&mut self, address: &str) -> Option<Arc<ServiceHandler>> {
        let removed = self.services.remove(address);
        debug!(address, removed = removed.is_some(), "Unregistered service");
        removed
    }

    /// Look up the handler bound to `address`.
    pub fn resolve(&self, address: &str) -> ServiceResult<Arc<ServiceHandler>> {
        self.services
            .get(address)
            .cloned()
            .ok_or_else(|| ServiceError::UnknownAddress {
                address: address.to_owned(),
            })
    }

    pub fn contains(&self, address: &str) -> bool {
        self.services.contains_key(address)
    }

    /// Bound addresses, sorted.
    pub fn addresses(&self) -> Vec<&ServiceAddress> {
        let mut addresses: Vec<_> = self.services.keys().collect();
        addresses.sort();
        addresses
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
