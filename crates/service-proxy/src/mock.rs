//! # Mock Store
//!
//! Test doubles for the persistence collaborator. A [`StoreClient`] built here talks to a
//! channel the test controls instead of a real [`StoreActor`](crate::StoreActor), which lets
//! a test script exact store replies: a stale `exists_by_key`, a `create` that loses a race,
//! a store that has gone away.
//!
//! Two styles are offered:
//! - [`MockStore`]: queue expectations up front with a fluent API, then [`MockStore::verify`].
//! - [`create_mock_store`] plus the `expect_*` helpers: receive each request by hand and
//!   answer it from the test body.

use crate::client::StoreClient;
use crate::entity::StoredEntity;
use crate::error::{ServiceError, ServiceResult};
use crate::message::{Response, StoreRequest};
use crate::query::Page;
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use uuid::Uuid;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// One scripted store reply.
enum Expectation<T: StoredEntity> {
    Create {
        response: ServiceResult<T>,
    },
    Get {
        id: Uuid,
        response: ServiceResult<Option<T>>,
    },
    GetByKey {
        key: String,
        response: ServiceResult<Option<T>>,
    },
    Query {
        response: ServiceResult<Page<T>>,
    },
    Count {
        response: ServiceResult<u64>,
    },
    Update {
        id: Uuid,
        response: ServiceResult<T>,
    },
    Delete {
        id: Uuid,
        response: ServiceResult<()>,
    },
    ExistsByKey {
        key: String,
        response: ServiceResult<bool>,
    },
}

impl<T: StoredEntity> Expectation<T> {
    fn name(&self) -> &'static str {
        match self {
            Expectation::Create { .. } => "create",
            Expectation::Get { .. } => "get",
            Expectation::GetByKey { .. } => "get_by_key",
            Expectation::Query { .. } => "query",
            Expectation::Count { .. } => "count",
            Expectation::Update { .. } => "update",
            Expectation::Delete { .. } => "delete",
            Expectation::ExistsByKey { .. } => "exists_by_key",
        }
    }
}

fn request_name<T: StoredEntity>(request: &StoreRequest<T>) -> &'static str {
    match request {
        StoreRequest::Create { .. } => "create",
        StoreRequest::Get { .. } => "get",
        StoreRequest::GetByKey { .. } => "get_by_key",
        StoreRequest::Query { .. } => "query",
        StoreRequest::Count { .. } => "count",
        StoreRequest::Update { .. } => "update",
        StoreRequest::Delete { .. } => "delete",
        StoreRequest::ExistsByKey { .. } => "exists_by_key",
    }
}

type Shared<V> = Arc<Mutex<V>>;

fn lock<V>(shared: &Shared<V>) -> MutexGuard<'_, V> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Answer `respond_to` with `response`, recording a mismatch when the request targeted a
/// different id or key than the expectation named.
fn reply<R, K: PartialEq + std::fmt::Display>(
    mismatches: &Shared<Vec<String>>,
    operation: &str,
    actual: K,
    expected: K,
    respond_to: Response<R>,
    response: ServiceResult<R>,
) {
    if actual != expected {
        lock(mismatches).push(format!("{operation}: expected {expected}, got {actual}"));
    }
    let _ = respond_to.send(response);
}

/// A store double that replays queued expectations in order.
///
/// A request that does not match the next expectation is recorded and left unanswered (the
/// caller sees `StoreUnavailable`); [`verify`](Self::verify) then fails the test.
///
/// # Example
/// ```ignore
/// let mut mock = MockStore::<Location>::new();
/// mock.expect_exists_by_key("WH1").return_ok(false);
/// mock.expect_create().return_err(ServiceError::duplicate_key("Location", "code", "WH1"));
///
/// let store = mock.client();
/// // Use store in tests...
/// mock.verify(); // Ensures all expectations were met
/// ```
pub struct MockStore<T: StoredEntity> {
    client: StoreClient<T>,
    expectations: Shared<VecDeque<Expectation<T>>>,
    mismatches: Shared<Vec<String>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: StoredEntity> MockStore<T> {
    /// Creates a mock store with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest<T>>(100);
        let expectations: Shared<VecDeque<Expectation<T>>> = Arc::default();
        let mismatches: Shared<Vec<String>> = Arc::default();
        let queue = Arc::clone(&expectations);
        let errors = Arc::clone(&mismatches);

        // Background task answering requests from the queue
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = lock(&queue).pop_front();

                match (request, expectation) {
                    (StoreRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (StoreRequest::Get { id, respond_to }, Some(Expectation::Get { id: expected, response })) => {
                        reply(&errors, "get", id, expected, respond_to, response);
                    }
                    (
                        StoreRequest::GetByKey { key, respond_to },
                        Some(Expectation::GetByKey { key: expected, response }),
                    ) => {
                        reply(&errors, "get_by_key", key, expected, respond_to, response);
                    }
                    (StoreRequest::Query { respond_to, .. }, Some(Expectation::Query { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (StoreRequest::Count { respond_to, .. }, Some(Expectation::Count { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update { id: expected, response }),
                    ) => {
                        reply(&errors, "update", id, expected, respond_to, response);
                    }
                    (
                        StoreRequest::Delete { id, respond_to },
                        Some(Expectation::Delete { id: expected, response }),
                    ) => {
                        reply(&errors, "delete", id, expected, respond_to, response);
                    }
                    (
                        StoreRequest::ExistsByKey { key, respond_to },
                        Some(Expectation::ExistsByKey { key: expected, response }),
                    ) => {
                        reply(&errors, "exists_by_key", key, expected, respond_to, response);
                    }
                    (request, expectation) => {
                        let expected = expectation.as_ref().map_or("nothing", Expectation::name);
                        lock(&errors).push(format!(
                            "unexpected {} request, expected {expected}",
                            request_name(&request)
                        ));
                    }
                }
            }
        });

        Self {
            client: StoreClient::new(sender),
            expectations,
            mismatches,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> StoreClient<T> {
        self.client.clone()
    }

    fn expect<R: 'static>(
        &mut self,
        make: impl FnOnce(ServiceResult<R>) -> Expectation<T> + Send + 'static,
    ) -> Reply<T, R> {
        Reply {
            expectations: Arc::clone(&self.expectations),
            make: Box::new(make),
            _reply: PhantomData,
        }
    }

    pub fn expect_create(&mut self) -> Reply<T, T> {
        self.expect(|response| Expectation::Create { response })
    }

    pub fn expect_get(&mut self, id: Uuid) -> Reply<T, Option<T>> {
        self.expect(move |response| Expectation::Get { id, response })
    }

    pub fn expect_get_by_key(&mut self, key: &str) -> Reply<T, Option<T>> {
        let key = key.to_owned();
        self.expect(move |response| Expectation::GetByKey { key, response })
    }

    pub fn expect_query(&mut self) -> Reply<T, Page<T>> {
        self.expect(|response| Expectation::Query { response })
    }

    pub fn expect_count(&mut self) -> Reply<T, u64> {
        self.expect(|response| Expectation::Count { response })
    }

    pub fn expect_update(&mut self, id: Uuid) -> Reply<T, T> {
        self.expect(move |response| Expectation::Update { id, response })
    }

    pub fn expect_delete(&mut self, id: Uuid) -> Reply<T, ()> {
        self.expect(move |response| Expectation::Delete { id, response })
    }

    pub fn expect_exists_by_key(&mut self, key: &str) -> Reply<T, bool> {
        let key = key.to_owned();
        self.expect(move |response| Expectation::ExistsByKey { key, response })
    }

    /// Verifies that all expectations were met and nothing unexpected arrived.
    pub fn verify(&self) {
        let mismatches = lock(&self.mismatches);
        if !mismatches.is_empty() {
            panic!("Mock store received unexpected requests: {mismatches:?}");
        }
        let remaining = lock(&self.expectations).len();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

impl<T: StoredEntity> Default for MockStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Completes an expectation with the reply the store should give.
pub struct Reply<T: StoredEntity, R> {
    expectations: Shared<VecDeque<Expectation<T>>>,
    make: Box<dyn FnOnce(ServiceResult<R>) -> Expectation<T> + Send>,
    _reply: PhantomData<fn(R)>,
}

impl<T: StoredEntity, R> Reply<T, R> {
    pub fn return_ok(self, value: R) {
        lock(&self.expectations).push_back((self.make)(Ok(value)));
    }

    pub fn return_err(self, error: ServiceError) {
        lock(&self.expectations).push_back((self.make)(Err(error)));
    }
}

// =============================================================================
// CHANNEL HELPERS
// =============================================================================

/// Creates a store client and the receiver its requests land on.
///
/// # Testing Strategy
/// Use this when a test needs to look at the request payload, or to hold a reply back
/// while something else happens, before answering through the request's oneshot sender.
///
/// **Note**: Consider using [`MockStore`] for a more fluent API.
pub fn create_mock_store<T: StoredEntity>(
    buffer_size: usize,
) -> (StoreClient<T>, mpsc::Receiver<StoreRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StoreClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: StoredEntity>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(T::Create, Response<T>)> {
    match receiver.recv().await {
        Some(StoreRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: StoredEntity>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(Uuid, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(StoreRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an ExistsByKey request
pub async fn expect_exists_by_key<T: StoredEntity>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(String, Response<bool>)> {
    match receiver.recv().await {
        Some(StoreRequest::ExistsByKey { key, respond_to }) => Some((key, respond_to)),
        _ => None,
    }
}
