//! # Store Actor
//!
//! This module defines the `StoreActor`, the in-memory persistence collaborator behind
//! every domain service. It owns the rows of one entity type and processes requests
//! sequentially, which is what makes "insert if key absent" atomic without a lock.

use crate::client::StoreClient;
use crate::entity::StoredEntity;
use crate::error::{ServiceError, ServiceResult};
use crate::message::StoreRequest;
use crate::query::{self, Page, PageRequest, SortSpec};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// The actor that keeps all entities of type `T`.
///
/// # Concurrency Model
/// Many service operations run concurrently, but they all reach the rows through this
/// actor's channel and the actor handles one request at a time. Two racing `create`
/// requests with the same business key are therefore serialized here: the first one wins
/// and the second one gets `DuplicateKey`. No `Mutex` is needed around `rows`.
///
/// # Usage Pattern
///
/// ```rust
/// use service_proxy::{EntityStore, StoreActor};
/// # use service_proxy::{ServiceResult, SortValue, StoredEntity};
/// # use uuid::Uuid;
/// # #[derive(Clone, Debug)] struct Tag { id: Uuid, code: String }
/// # #[derive(Debug, Default)] struct NoFilter;
/// # impl StoredEntity for Tag {
/// #     type Create = String; type Update = (); type Filter = NoFilter;
/// #     const ENTITY: &'static str = "Tag"; const KEY_FIELD: &'static str = "code";
/// #     const DEFAULT_SORT: &'static str = "code";
/// #     fn from_create_params(id: Uuid, code: String) -> ServiceResult<Self> { Ok(Self { id, code }) }
/// #     fn id(&self) -> Uuid { self.id }
/// #     fn key(&self) -> &str { &self.code }
/// #     fn on_update(&mut self, _: ()) -> ServiceResult<()> { Ok(()) }
/// #     fn sort_field(name: &str) -> Option<&'static str> { (name == "code").then_some("code") }
/// #     fn sort_value(&self, _: &str) -> SortValue<'_> { SortValue::Text(&self.code) }
/// # }
///
/// #[tokio::main]
/// async fn main() {
///     // 1. Create
///     let (actor, store) = StoreActor::<Tag>::new(16);
///
///     // 2. Run
///     let handle = tokio::spawn(actor.run());
///
///     // 3. Use
///     let tag = store.create("red".to_string()).await.unwrap();
///     assert!(store.exists_by_key("red").await.unwrap());
///     assert!(store.create("red".to_string()).await.is_err());
///     assert_eq!(store.get(tag.id).await.unwrap().unwrap().code, "red");
///
///     // 4. Dropping the last client stops the actor
///     drop(store);
///     handle.await.unwrap();
/// }
/// ```
pub struct StoreActor<T: StoredEntity> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    rows: HashMap<Uuid, T>,
    keys: HashMap<String, Uuid>,
}

impl<T: StoredEntity> StoreActor<T> {
    /// Creates a new `StoreActor` and its associated `StoreClient`.
    ///
    /// `buffer_size` is the channel capacity; when it is full, client calls wait for room.
    pub fn new(buffer_size: usize) -> (Self, StoreClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            rows: HashMap::new(),
            keys: HashMap::new(),
        };
        (actor, StoreClient::new(sender))
    }

    /// Processes requests until every client has been dropped.
    pub async fn run(mut self) {
        let entity_type = T::ENTITY;
        info!(entity_type, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let result = self.create(params);
                    match &result {
                        Ok(item) => {
                            info!(entity_type, id = %item.id(), key = item.key(), size = self.rows.len(), "Created")
                        }
                        Err(e) => warn!(entity_type, error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Get { id, respond_to } => {
                    let item = self.rows.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                StoreRequest::GetByKey { key, respond_to } => {
                    let item = self
                        .keys
                        .get(&key)
                        .and_then(|id| self.rows.get(id))
                        .cloned();
                    debug!(entity_type, %key, found = item.is_some(), "GetByKey");
                    let _ = respond_to.send(Ok(item));
                }
                StoreRequest::Query {
                    filter,
                    sort,
                    page,
                    respond_to,
                } => {
                    let result = self.query(&filter, &sort, page);
                    debug!(entity_type, ?filter, ?sort, total = result.total(), returned = result.len(), "Query");
                    let _ = respond_to.send(Ok(result));
                }
                StoreRequest::Count { filter, respond_to } => {
                    let count = self.rows.values().filter(|item| item.matches(&filter)).count() as u64;
                    debug!(entity_type, ?filter, count, "Count");
                    let _ = respond_to.send(Ok(count));
                }
                StoreRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let result = self.update(id, update);
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Updated"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    match self.rows.remove(&id) {
                        Some(item) => {
                            self.keys.remove(item.key());
                            info!(entity_type, %id, size = self.rows.len(), "Deleted");
                            let _ = respond_to.send(Ok(()));
                        }
                        None => {
                            warn!(entity_type, %id, "Not found");
                            let _ = respond_to.send(Err(ServiceError::not_found(T::ENTITY, id)));
                        }
                    }
                }
                StoreRequest::ExistsByKey { key, respond_to } => {
                    let exists = self.keys.contains_key(&key);
                    debug!(entity_type, %key, exists, "ExistsByKey");
                    let _ = respond_to.send(Ok(exists));
                }
            }
        }

        info!(entity_type, size = self.rows.len(), "Shutdown");
    }

    fn create(&mut self, params: T::Create) -> ServiceResult<T> {
        let id = Uuid::now_v7();
        let item = T::from_create_params(id, params)?;

        if self.keys.contains_key(item.key()) {
            return Err(ServiceError::duplicate_key(T::ENTITY, T::KEY_FIELD, item.key()));
        }

        self.keys.insert(item.key().to_owned(), id);
        self.rows.insert(id, item.clone());
        Ok(item)
    }

    fn query(&self, filter: &T::Filter, sort: &SortSpec, page: PageRequest) -> Page<T> {
        query::execute(self.rows.values(), filter, sort, page)
    }

    fn update(&mut self, id: Uuid, update: T::Update) -> ServiceResult<T> {
        let current = self
            .rows
            .get(&id)
            .ok_or_else(|| ServiceError::not_found(T::ENTITY, id))?;

        let mut next = current.clone();
        next.on_update(update)?;

        // Entities are expected to keep their key; reindex if one does not.
        if next.key() != current.key() {
            if self.keys.contains_key(next.key()) {
                return Err(ServiceError::duplicate_key(T::ENTITY, T::KEY_FIELD, next.key()));
            }
            self.keys.remove(current.key());
            self.keys.insert(next.key().to_owned(), id);
        }

        self.rows.insert(id, next.clone());
        Ok(next)
    }
}
