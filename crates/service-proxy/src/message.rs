//! # Store Messages
//!
//! Requests carried from a [`StoreClient`](crate::StoreClient) to its
//! [`StoreActor`](crate::StoreActor). Each request owns a oneshot sender, so every request
//! gets exactly one reply.

use crate::entity::StoredEntity;
use crate::error::ServiceResult;
use crate::query::{Page, PageRequest, SortSpec};
use tokio::sync::oneshot;
use uuid::Uuid;

/// One-shot reply channel used by the store actor.
pub type Response<T> = oneshot::Sender<ServiceResult<T>>;

/// The persistence operations a store understands.
///
/// The variants mirror what a relational backend would offer per table: atomic insert with
/// a unique key, lookups by id and by key, a filtered/sorted/paged query, and by-id update
/// and delete. `T`'s associated types keep payloads of different entities apart.
#[derive(Debug)]
pub enum StoreRequest<T: StoredEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T>,
    },
    Get {
        id: Uuid,
        respond_to: Response<Option<T>>,
    },
    GetByKey {
        key: String,
        respond_to: Response<Option<T>>,
    },
    Query {
        filter: T::Filter,
        sort: SortSpec,
        page: PageRequest,
        respond_to: Response<Page<T>>,
    },
    Count {
        filter: T::Filter,
        respond_to: Response<u64>,
    },
    Update {
        id: Uuid,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: Uuid,
        respond_to: Response<()>,
    },
    ExistsByKey {
        key: String,
        respond_to: Response<bool>,
    },
}
