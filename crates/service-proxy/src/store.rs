//! # EntityStore Trait
//!
//! The persistence collaborator as the domain services see it. Services hold an
//! `Arc<dyn EntityStore<T>>`, so the in-memory [`StoreClient`](crate::StoreClient) can be
//! swapped for a mock or a database-backed implementation without touching service code.
use crate::entity::StoredEntity;
use crate::error::{ServiceError, ServiceResult};
use crate::query::{Page, PageRequest, SortSpec};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Shared handle to a store, as held by services.
pub type SharedStore<T> = Arc<dyn EntityStore<T>>;

/// Storage operations for one entity type.
///
/// `create` is the authoritative uniqueness check: it must insert only if the business key
/// is absent, atomically. `exists_by_key` is a plain read and may be stale by the time the
/// caller acts on it.
#[async_trait]
pub trait EntityStore<T: StoredEntity>: Send + Sync {
    async fn create(&self, params: T::Create) -> ServiceResult<T>;

    async fn get(&self, id: Uuid) -> ServiceResult<Option<T>>;

    async fn get_by_key(&self, key: &str) -> ServiceResult<Option<T>>;

    async fn query(
        &self,
        filter: T::Filter,
        sort: SortSpec,
        page: PageRequest,
    ) -> ServiceResult<Page<T>>;

    async fn count(&self, filter: T::Filter) -> ServiceResult<u64>;

    /// Fails with `NotFound` when `id` is absent.
    async fn update(&self, id: Uuid, update: T::Update) -> ServiceResult<T>;

    /// Fails with `NotFound` when `id` is absent, including on a second delete.
    async fn delete(&self, id: Uuid) -> ServiceResult<()>;

    async fn exists_by_key(&self, key: &str) -> ServiceResult<bool>;

    /// Fetch an entity by id, mapping absence to `NotFound`.
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, id: Uuid) -> ServiceResult<T> {
        self.get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(T::ENTITY, id))
    }
}
