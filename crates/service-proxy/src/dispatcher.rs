//! # Operation Dispatcher
//!
//! Routes `(address, operation, args)` to a registered handler and hands the caller a
//! [`Pending`] result immediately.
//!
//! Lookup and signature validation happen synchronously, before anything is spawned, so a
//! dispatch failure (`UnknownAddress`, `UnknownOperation`, `InvalidArguments`) never reaches
//! service code. A valid request runs in its own Tokio task. The reply travels over a
//! oneshot channel, which is what guarantees exactly one result per request: the task sends
//! once, and if it ends without sending the caller sees [`ServiceError::Dropped`].

use crate::binder::{check_signature, Arguments, OperationFn};
use crate::error::{ServiceError, ServiceResult};
use crate::registry::ServiceRegistry;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tracing::{debug, info_span, warn, Instrument};

/// Shared, read-only front door to every registered service.
///
/// Cloning is cheap. Each clone keeps the registry (and therefore every service and store
/// client behind it) alive, so drop clones before shutting the system down.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ServiceRegistry>,
}

impl Dispatcher {
    /// Freeze `registry` and start dispatching against it.
    pub fn new(registry: ServiceRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Dispatch one request. Must be called from within a Tokio runtime.
    ///
    /// Dropping the returned [`Pending`] does not cancel the operation; it runs to
    /// completion and its result is discarded.
    pub fn invoke(&self, address: &str, operation: &str, args: Vec<Value>) -> Pending {
        let (respond_to, response) = oneshot::channel();

        match self.prepare(address, operation, &args) {
            Err(e) => {
                warn!(address, operation, error = %e, "Dispatch rejected");
                let _ = respond_to.send(Err(e));
            }
            Ok(body) => {
                let span = info_span!("invoke", address, operation);
                let arguments = Arguments::new(operation, args);
                tokio::spawn(
                    async move {
                        let result = body(arguments).await;
                        if let Err(e) = &result {
                            debug!(kind = %e.kind(), error = %e, "Operation failed");
                        }
                        if respond_to.send(result).is_err() {
                            debug!("Caller dropped the result handle");
                        }
                    }
                    .instrument(span),
                );
            }
        }

        Pending { response }
    }

    /// Dispatch and decode the success value into `R`.
    pub async fn call<R: DeserializeOwned>(
        &self,
        address: &str,
        operation: &str,
        args: Vec<Value>,
    ) -> ServiceResult<R> {
        let value = self.invoke(address, operation, args).await?;
        serde_json::from_value(value).map_err(ServiceError::codec)
    }

    fn prepare(&self, address: &str, operation: &str, args: &[Value]) -> ServiceResult<OperationFn> {
        let handler = self.registry.resolve(address)?;
        let bound = handler
            .operation(operation)
            .ok_or_else(|| ServiceError::UnknownOperation {
                address: address.to_owned(),
                operation: operation.to_owned(),
            })?;
        check_signature(operation, bound.signature(), args)?;
        Ok(bound.body())
    }
}

/// The caller's side of a dispatched request. Resolves exactly once.
#[derive(Debug)]
pub struct Pending {
    response: oneshot::Receiver<ServiceResult<Value>>,
}

impl Future for Pending {
    type Output = ServiceResult<Value>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.response)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(ServiceError::Dropped)))
    }
}
