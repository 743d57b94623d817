//! # Store Client
//!
//! The sending half of a [`StoreActor`](crate::StoreActor). It turns each
//! [`EntityStore`] call into a [`StoreRequest`] and waits on the oneshot reply.

use crate::entity::StoredEntity;
use crate::error::{ServiceError, ServiceResult};
use crate::message::{Response, StoreRequest};
use crate::query::{Page, PageRequest, SortSpec};
use crate::store::EntityStore;
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

/// Handle to a running store actor. Cheap to clone: it only holds a channel sender.
pub struct StoreClient<T: StoredEntity> {
    sender: mpsc::Sender<StoreRequest<T>>,
}

impl<T: StoredEntity> Clone for StoreClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: StoredEntity> StoreClient<T> {
    pub fn new(sender: mpsc::Sender<StoreRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> StoreRequest<T>,
    ) -> ServiceResult<R> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| ServiceError::store_unavailable(T::ENTITY))?;
        response
            .await
            .map_err(|_| ServiceError::store_unavailable(T::ENTITY))?
    }
}

#[async_trait]
impl<T: StoredEntity> EntityStore<T> for StoreClient<T> {
    async fn create(&self, params: T::Create) -> ServiceResult<T> {
        self.request(|respond_to| StoreRequest::Create { params, respond_to })
            .await
    }

    async fn get(&self, id: Uuid) -> ServiceResult<Option<T>> {
        self.request(|respond_to| StoreRequest::Get { id, respond_to })
            .await
    }

    async fn get_by_key(&self, key: &str) -> ServiceResult<Option<T>> {
        let key = key.to_owned();
        self.request(|respond_to| StoreRequest::GetByKey { key, respond_to })
            .await
    }

    async fn query(
        &self,
        filter: T::Filter,
        sort: SortSpec,
        page: PageRequest,
    ) -> ServiceResult<Page<T>> {
        self.request(|respond_to| StoreRequest::Query {
            filter,
            sort,
            page,
            respond_to,
        })
        .await
    }

    async fn count(&self, filter: T::Filter) -> ServiceResult<u64> {
        self.request(|respond_to| StoreRequest::Count { filter, respond_to })
            .await
    }

    async fn update(&self, id: Uuid, update: T::Update) -> ServiceResult<T> {
        self.request(|respond_to| StoreRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> ServiceResult<()> {
        self.request(|respond_to| StoreRequest::Delete { id, respond_to })
            .await
    }

    async fn exists_by_key(&self, key: &str) -> ServiceResult<bool> {
        let key = key.to_owned();
        self.request(|respond_to| StoreRequest::ExistsByKey { key, respond_to })
            .await
    }
}
