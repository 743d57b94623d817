//! # Service Proxy Framework
//!
//! Building blocks for exposing domain services at string addresses and calling them
//! asynchronously: a caller names a service (`service.location`), an operation
//! (`createLocation`) and a positional argument list, and gets back exactly one result.
//!
//! The crate also carries the generic half of every service: an in-memory persistence
//! collaborator built on the **Actor Model**, and the listing engine (filter, count, sort,
//! page) shared by all entity types.
//!
//! ## Architecture Overview
//!
//! Leaf-first:
//!
//! 1. **Entity Layer** ([`StoredEntity`]) - construction, mutation, filtering and sort keys
//!    of one record type
//! 2. **Store Layer** ([`StoreActor`] / [`StoreClient`] behind [`EntityStore`]) - one actor
//!    per entity type, atomic insert-if-key-absent
//! 3. **Query Layer** ([`SortSpec`], [`PageRequest`], [`Page`]) - deterministic listing
//! 4. **Binding Layer** ([`ServiceBinder`]) - operation name + signature → async closure
//! 5. **Routing Layer** ([`ServiceRegistry`], [`Dispatcher`]) - address → handler, one task
//!    per request
//!
//! Domain services are plain `async-trait` traits. Nothing here knows about them; an
//! application binds each trait method to an operation name at startup.
//!
//! ## End to End
//!
//! ```rust
//! use serde_json::json;
//! use service_proxy::{
//!     ArgKind, Dispatcher, EntityStore, ServiceBinder, ServiceError, ServiceRegistry,
//!     ServiceResult, SharedStore, SortValue, StoreActor, StoredEntity,
//! };
//! use std::sync::Arc;
//! use uuid::Uuid;
//!
//! // 1. An entity
//! #[derive(Clone, Debug, serde::Serialize)]
//! struct Tag { id: Uuid, code: String }
//!
//! #[derive(Debug, Default)]
//! struct TagFilter;
//!
//! impl StoredEntity for Tag {
//!     type Create = String;
//!     type Update = ();
//!     type Filter = TagFilter;
//!     const ENTITY: &'static str = "Tag";
//!     const KEY_FIELD: &'static str = "code";
//!     const DEFAULT_SORT: &'static str = "code";
//!
//!     fn from_create_params(id: Uuid, code: String) -> ServiceResult<Self> {
//!         if code.is_empty() {
//!             return Err(ServiceError::invalid_input("code", "must not be blank"));
//!         }
//!         Ok(Self { id, code })
//!     }
//!     fn id(&self) -> Uuid { self.id }
//!     fn key(&self) -> &str { &self.code }
//!     fn on_update(&mut self, _: ()) -> ServiceResult<()> { Ok(()) }
//!     fn sort_field(name: &str) -> Option<&'static str> { (name == "code").then_some("code") }
//!     fn sort_value(&self, _: &str) -> SortValue<'_> { SortValue::Text(&self.code) }
//! }
//!
//! // 2. A service over a store
//! struct TagService { store: SharedStore<Tag> }
//!
//! impl TagService {
//!     async fn create(&self, code: String) -> ServiceResult<Tag> {
//!         self.store.create(code).await
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, store) = StoreActor::<Tag>::new(16);
//!     let handle = tokio::spawn(actor.run());
//!
//!     // 3. Bind and register
//!     let service = Arc::new(TagService { store: Arc::new(store) });
//!     let handler = ServiceBinder::new("tags", service)
//!         .operation("createTag", &[ArgKind::String], |svc, args| async move {
//!             svc.create(args.string(0)?).await
//!         })
//!         .build();
//!     let mut registry = ServiceRegistry::new();
//!     registry.register("service.tag", handler).unwrap();
//!
//!     // 4. Dispatch
//!     let dispatcher = Dispatcher::new(registry);
//!     let created = dispatcher.invoke("service.tag", "createTag", vec![json!("red")]).await.unwrap();
//!     assert_eq!(created["code"], "red");
//!
//!     let again = dispatcher.invoke("service.tag", "createTag", vec![json!("red")]).await;
//!     assert!(matches!(again, Err(ServiceError::DuplicateKey { .. })));
//!
//!     // 5. Dropping the dispatcher drops the service and its store client
//!     drop(dispatcher);
//!     handle.await.unwrap();
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each dispatched request runs in its own Tokio task; unrelated requests never wait on
//!   each other
//! - Each store actor processes its requests **sequentially**, so uniqueness checks and
//!   inserts cannot interleave
//! - The registry is frozen inside the [`Dispatcher`] and read without locks
//!
//! ## Testing
//!
//! The [`mock`] module builds [`StoreClient`]s backed by a scripted channel instead of an
//! actor, for driving services into states a real store only reaches under races.

pub mod actor;
pub mod binder;
pub mod client;
pub mod dispatcher;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod query;
pub mod registry;
pub mod store;
pub mod telemetry;

// Re-export core types for convenience
pub use actor::StoreActor;
pub use binder::{ArgKind, Arguments, ServiceBinder, ServiceHandler};
pub use client::StoreClient;
pub use dispatcher::{Dispatcher, Pending};
pub use entity::StoredEntity;
pub use error::{ErrorKind, RegistryError, ServiceError, ServiceResult};
pub use message::{Response, StoreRequest};
pub use query::{Page, PageRequest, Pagination, SortDir, SortSpec, SortValue};
pub use registry::{ServiceAddress, ServiceRegistry};
pub use store::{EntityStore, SharedStore};
