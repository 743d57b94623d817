//! # Operation Binding
//!
//! A service is exposed at an address by binding each of its operations to a name and a
//! positional signature. [`ServiceBinder`] collects those bindings into a
//! [`ServiceHandler`]: a plain lookup table from operation name to an async closure. The
//! dispatcher validates arguments against the signature before the closure runs, so
//! handlers can read their arguments without re-checking shapes.
//!
//! ```rust
//! use service_proxy::{ArgKind, ServiceBinder, ServiceResult};
//! use std::sync::Arc;
//!
//! struct Greeter;
//!
//! impl Greeter {
//!     async fn greet(&self, name: String) -> ServiceResult<String> {
//!         Ok(format!("hello {name}"))
//!     }
//! }
//!
//! let handler = ServiceBinder::new("greeter", Arc::new(Greeter))
//!     .operation("greet", &[ArgKind::String], |svc, args| async move {
//!         svc.greet(args.string(0)?).await
//!     })
//!     .build();
//!
//! assert!(handler.operation("greet").is_some());
//! ```

use crate::error::{ServiceError, ServiceResult};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future produced by an operation.
pub type OperationFuture = Pin<Box<dyn Future<Output = ServiceResult<Value>> + Send>>;

/// Type-erased operation body.
pub type OperationFn = Arc<dyn Fn(Arguments) -> OperationFuture + Send + Sync>;

/// Expected JSON shape of one positional argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// A number that fits in an `i32`.
    Int,
    Bool,
    String,
    OptString,
    OptBool,
    Object,
    OptObject,
}

impl ArgKind {
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            ArgKind::Int => value
                .as_i64()
                .is_some_and(|n| i32::try_from(n).is_ok()),
            ArgKind::Bool => value.is_boolean(),
            ArgKind::String => value.is_string(),
            ArgKind::OptString => value.is_null() || value.is_string(),
            ArgKind::OptBool => value.is_null() || value.is_boolean(),
            ArgKind::Object => value.is_object(),
            ArgKind::OptObject => value.is_null() || value.is_object(),
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArgKind::Int => "int",
            ArgKind::Bool => "bool",
            ArgKind::String => "string",
            ArgKind::OptString => "string or null",
            ArgKind::OptBool => "bool or null",
            ArgKind::Object => "object",
            ArgKind::OptObject => "object or null",
        })
    }
}

/// Check `args` against `signature`, naming the first offending position.
pub fn check_signature(operation: &str, signature: &[ArgKind], args: &[Value]) -> ServiceResult<()> {
    if args.len() != signature.len() {
        return Err(ServiceError::invalid_arguments(
            operation,
            format!("expected {} argument(s), got {}", signature.len(), args.len()),
        ));
    }
    for (index, (kind, value)) in signature.iter().zip(args).enumerate() {
        if !kind.accepts(value) {
            return Err(ServiceError::invalid_arguments(
                operation,
                format!("argument {index} must be {kind}, got {value}"),
            ));
        }
    }
    Ok(())
}

/// Positional arguments of one invocation.
///
/// Accessors still return `Result` so a handler bound with the wrong signature fails with
/// `InvalidArguments` instead of panicking.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    operation: String,
    values: Vec<Value>,
}

impl Arguments {
    pub fn new(operation: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            operation: operation.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn at(&self, index: usize) -> &Value {
        static NULL: Value = Value::Null;
        self.values.get(index).unwrap_or(&NULL)
    }

    fn mismatch(&self, index: usize, kind: ArgKind) -> ServiceError {
        ServiceError::invalid_arguments(
            self.operation.clone(),
            format!("argument {index} must be {kind}"),
        )
    }

    pub fn int(&self, index: usize) -> ServiceResult<i32> {
        self.at(index)
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| self.mismatch(index, ArgKind::Int))
    }

    pub fn boolean(&self, index: usize) -> ServiceResult<bool> {
        self.at(index)
            .as_bool()
            .ok_or_else(|| self.mismatch(index, ArgKind::Bool))
    }

    pub fn string(&self, index: usize) -> ServiceResult<String> {
        self.at(index)
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| self.mismatch(index, ArgKind::String))
    }

    pub fn opt_string(&self, index: usize) -> ServiceResult<Option<String>> {
        match self.at(index) {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            _ => Err(self.mismatch(index, ArgKind::OptString)),
        }
    }

    pub fn opt_bool(&self, index: usize) -> ServiceResult<Option<bool>> {
        match self.at(index) {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(*b)),
            _ => Err(self.mismatch(index, ArgKind::OptBool)),
        }
    }

    pub fn object(&self, index: usize) -> ServiceResult<Map<String, Value>> {
        match self.at(index) {
            Value::Object(map) => Ok(map.clone()),
            _ => Err(self.mismatch(index, ArgKind::Object)),
        }
    }

    pub fn opt_object(&self, index: usize) -> ServiceResult<Option<Map<String, Value>>> {
        match self.at(index) {
            Value::Null => Ok(None),
            Value::Object(map) => Ok(Some(map.clone())),
            _ => Err(self.mismatch(index, ArgKind::OptObject)),
        }
    }
}

/// One bound operation: its declared signature and its body.
#[derive(Clone)]
pub struct Operation {
    signature: &'static [ArgKind],
    call: OperationFn,
}

impl Operation {
    pub fn signature(&self) -> &'static [ArgKind] {
        self.signature
    }

    pub(crate) fn body(&self) -> OperationFn {
        Arc::clone(&self.call)
    }
}

/// Operation table of one service, ready to be registered at an address.
pub struct ServiceHandler {
    service: &'static str,
    operations: HashMap<&'static str, Operation>,
}

impl ServiceHandler {
    /// Name of the service this table was built for (used in logs).
    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.get(name)
    }

    /// Operation names, sorted.
    pub fn operation_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.operations.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for ServiceHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceHandler")
            .field("service", &self.service)
            .field("operations", &self.operation_names())
            .finish()
    }
}

/// Builds a [`ServiceHandler`] over a shared service instance.
pub struct ServiceBinder<S: ?Sized> {
    service_name: &'static str,
    service: Arc<S>,
    operations: HashMap<&'static str, Operation>,
}

impl<S: ?Sized + Send + Sync + 'static> ServiceBinder<S> {
    pub fn new(service_name: &'static str, service: Arc<S>) -> Self {
        Self {
            service_name,
            service,
            operations: HashMap::new(),
        }
    }

    /// Bind `name` with `signature` to `body`. The success value is serialized to JSON.
    ///
    /// Binding the same name twice keeps the last body.
    pub fn operation<F, Fut, R>(mut self, name: &'static str, signature: &'static [ArgKind], body: F) -> Self
    where
        F: Fn(Arc<S>, Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ServiceResult<R>> + Send + 'static,
        R: Serialize + Send + 'static,
    {
        let service = Arc::clone(&self.service);
        let call: OperationFn = Arc::new(move |args: Arguments| -> OperationFuture {
            let pending = body(Arc::clone(&service), args);
            Box::pin(async move {
                let value = pending.await?;
                serde_json::to_value(value).map_err(ServiceError::codec)
            })
        });

        self.operations.insert(name, Operation { signature, call });
        self
    }

    pub fn build(self) -> ServiceHandler {
        ServiceHandler {
            service: self.service_name,
            operations: self.operations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn signature_checks_arity_first() {
        let err = check_signature("op", &[ArgKind::Int, ArgKind::String], &[json!(1)]).unwrap_err();
        assert_eq!(
            err,
            ServiceError::invalid_arguments("op", "expected 2 argument(s), got 1")
        );
    }

    #[test]
    fn signature_names_the_offending_position() {
        let err = check_signature(
            "op",
            &[ArgKind::Int, ArgKind::OptObject],
            &[json!(3), json!("not an object")],
        )
        .unwrap_err();
        match err {
            ServiceError::InvalidArguments { operation, reason } => {
                assert_eq!(operation, "op");
                assert!(reason.starts_with("argument 1 must be object or null"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn int_rejects_values_outside_i32() {
        assert!(ArgKind::Int.accepts(&json!(-5)));
        assert!(!ArgKind::Int.accepts(&json!(1u64 << 40)));
        assert!(!ArgKind::Int.accepts(&json!(1.5)));
        assert!(!ArgKind::Int.accepts(&json!("1")));
    }

    #[test]
    fn optional_kinds_accept_null() {
        for kind in [ArgKind::OptString, ArgKind::OptBool, ArgKind::OptObject] {
            assert!(kind.accepts(&Value::Null), "{kind} should accept null");
        }
        for kind in [ArgKind::String, ArgKind::Bool, ArgKind::Object, ArgKind::Int] {
            assert!(!kind.accepts(&Value::Null), "{kind} should reject null");
        }
    }

    #[test]
    fn accessors_read_typed_values() {
        let args = Arguments::new(
            "op",
            vec![json!(7), json!("x"), Value::Null, json!({"a": 1}), json!(true)],
        );
        assert_eq!(args.int(0).unwrap(), 7);
        assert_eq!(args.string(1).unwrap(), "x");
        assert_eq!(args.opt_string(2).unwrap(), None);
        assert_eq!(args.opt_object(3).unwrap().unwrap()["a"], 1);
        assert!(args.boolean(4).unwrap());
        assert!(matches!(
            args.string(0),
            Err(ServiceError::InvalidArguments { .. })
        ));
    }

    #[tokio::test]
    async fn bound_operation_serializes_its_result() {
        struct Echo;
        let handler = ServiceBinder::new("echo", Arc::new(Echo))
            .operation("twice", &[ArgKind::Int], |_svc, args| async move {
                Ok::<_, ServiceError>(args.int(0)? * 2)
            })
            .build();

        let operation = handler.operation("twice").unwrap();
        assert_eq!(operation.signature(), &[ArgKind::Int]);

        let value = (operation.body())(Arguments::new("twice", vec![json!(21)]))
            .await
            .unwrap();
        assert_eq!(value, json!(42));
        assert_eq!(handler.operation_names(), vec!["twice"]);
    }
}
