//! # Location Service
//!
//! CRUD and filtered listing of [`Location`]s, exposed at [`ADDRESS`].
//!
//! The service is a plain trait. [`LocationServiceImpl`] runs it against a store;
//! [`LocationClient`](crate::clients::LocationClient) runs it through the dispatcher. Both
//! behave the same for callers.

use crate::model::{parse_id, Location, LocationCreate, LocationFilter, LocationUpdate};
use async_trait::async_trait;
use service_proxy::{
    ArgKind, Page, PageRequest, RegistryError, ServiceBinder, ServiceError, ServiceRegistry,
    ServiceResult, SharedStore, SortSpec, StoredEntity,
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Public routing key of the location service.
pub const ADDRESS: &str = "service.location";

#[async_trait]
pub trait LocationService: Send + Sync {
    /// One page of locations. Sort is `"field,dir"`; empty selects `code,asc`.
    async fn list_locations(
        &self,
        page: i32,
        size: i32,
        sort: &str,
        filter: LocationFilter,
    ) -> ServiceResult<Page<Location>>;

    /// Fails with `DuplicateKey` if the code is taken.
    async fn create_location(&self, params: LocationCreate) -> ServiceResult<Location>;

    async fn get_location(&self, location_id: &str) -> ServiceResult<Location>;

    async fn get_location_by_code(&self, code: &str) -> ServiceResult<Location>;

    async fn update_location(
        &self,
        location_id: &str,
        update: LocationUpdate,
    ) -> ServiceResult<Location>;

    async fn delete_location(&self, location_id: &str) -> ServiceResult<()>;

    /// Advisory only: the answer may be stale by the time a `create_location` runs, which
    /// checks again atomically.
    async fn check_code_exists(&self, code: &str) -> ServiceResult<bool>;
}

/// Store-backed implementation.
pub struct LocationServiceImpl {
    store: SharedStore<Location>,
}

impl LocationServiceImpl {
    pub fn new(store: SharedStore<Location>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LocationService for LocationServiceImpl {
    #[instrument(skip(self))]
    async fn list_locations(
        &self,
        page: i32,
        size: i32,
        sort: &str,
        filter: LocationFilter,
    ) -> ServiceResult<Page<Location>> {
        let page = PageRequest::new(page, size)?;
        let sort = SortSpec::parse::<Location>(sort)?;
        self.store.query(filter, sort, page).await
    }

    #[instrument(skip(self, params), fields(code = %params.code))]
    async fn create_location(&self, params: LocationCreate) -> ServiceResult<Location> {
        debug!(?params, "create_location called");
        self.store.create(params).await
    }

    #[instrument(skip(self))]
    async fn get_location(&self, location_id: &str) -> ServiceResult<Location> {
        let id = parse_id(Location::ENTITY, location_id)?;
        self.store.fetch(id).await
    }

    #[instrument(skip(self))]
    async fn get_location_by_code(&self, code: &str) -> ServiceResult<Location> {
        self.store
            .get_by_key(code)
            .await?
            .ok_or_else(|| ServiceError::not_found(Location::ENTITY, code))
    }

    #[instrument(skip(self))]
    async fn update_location(
        &self,
        location_id: &str,
        update: LocationUpdate,
    ) -> ServiceResult<Location> {
        let id = parse_id(Location::ENTITY, location_id)?;
        self.store.update(id, update).await
    }

    #[instrument(skip(self))]
    async fn delete_location(&self, location_id: &str) -> ServiceResult<()> {
        let id = parse_id(Location::ENTITY, location_id)?;
        self.store.delete(id).await
    }

    #[instrument(skip(self))]
    async fn check_code_exists(&self, code: &str) -> ServiceResult<bool> {
        self.store.exists_by_key(code).await
    }
}

/// Bind every operation of `service` and register it at [`ADDRESS`].
pub fn register(
    registry: &mut ServiceRegistry,
    service: Arc<dyn LocationService>,
) -> Result<(), RegistryError> {
    let handler = ServiceBinder::new("LocationService", service)
        .operation(
            "listLocations",
            &[
                ArgKind::Int,
                ArgKind::Int,
                ArgKind::String,
                ArgKind::OptString,
                ArgKind::OptString,
                ArgKind::OptString,
                ArgKind::Bool,
            ],
            |svc, args| async move {
                let sort = args.string(2)?;
                let filter = LocationFilter {
                    code: args.opt_string(3)?,
                    name: args.opt_string(4)?,
                    location_type: args.opt_string(5)?,
                    active_only: args.boolean(6)?,
                };
                svc.list_locations(args.int(0)?, args.int(1)?, &sort, filter)
                    .await
            },
        )
        .operation(
            "createLocation",
            &[
                ArgKind::String,
                ArgKind::String,
                ArgKind::String,
                ArgKind::OptObject,
            ],
            |svc, args| async move {
                let params = LocationCreate {
                    code: args.string(0)?,
                    name: args.string(1)?,
                    location_type: args.string(2)?,
                    address: args.opt_object(3)?,
                };
                svc.create_location(params).await
            },
        )
        .operation("getLocation", &[ArgKind::String], |svc, args| async move {
            let id = args.string(0)?;
            svc.get_location(&id).await
        })
        .operation(
            "getLocationByCode",
            &[ArgKind::String],
            |svc, args| async move {
                let code = args.string(0)?;
                svc.get_location_by_code(&code).await
            },
        )
        .operation(
            "updateLocation",
            &[
                ArgKind::String,
                ArgKind::OptString,
                ArgKind::OptString,
                ArgKind::OptObject,
                ArgKind::OptBool,
            ],
            |svc, args| async move {
                let id = args.string(0)?;
                let update = LocationUpdate {
                    name: args.opt_string(1)?,
                    location_type: args.opt_string(2)?,
                    address: args.opt_object(3)?,
                    is_active: args.opt_bool(4)?,
                };
                svc.update_location(&id, update).await
            },
        )
        .operation("deleteLocation", &[ArgKind::String], |svc, args| async move {
            let id = args.string(0)?;
            svc.delete_location(&id).await
        })
        .operation("checkCodeExists", &[ArgKind::String], |svc, args| async move {
            let code = args.string(0)?;
            svc.check_code_exists(&code).await
        })
        .build();

    registry.register(ADDRESS, handler)
}
