//! # Query Engine
//!
//! Shared listing algorithm used by every store: filter, count, sort, then cut the page
//! window. The order is significant. The total reflects the filter only, and the window is
//! taken from the fully sorted set, so page `n` of an unchanged data set is always the same
//! slice.
//!
//! Sorting is total: entities that tie on the requested field are ordered by identifier
//! ascending, whatever the direction.

use crate::entity::StoredEntity;
use crate::error::{ServiceError, ServiceResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

/// A validated `"field,dir"` sort specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    field: &'static str,
    dir: SortDir,
}

impl SortSpec {
    /// Parse `"field"` or `"field,asc|desc"` against the sortable fields of `T`.
    ///
    /// An empty string selects `T::DEFAULT_SORT` ascending. Unknown fields and unknown
    /// directions fail with `InvalidSort`; nothing is silently ignored.
    pub fn parse<T: StoredEntity>(raw: &str) -> ServiceResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self {
                field: T::DEFAULT_SORT,
                dir: SortDir::Asc,
            });
        }

        let (name, dir) = match raw.split_once(',') {
            Some((name, dir)) => (name.trim(), dir.trim()),
            None => (raw, ""),
        };

        let field = T::sort_field(name).ok_or_else(|| ServiceError::InvalidSort {
            field: name.to_owned(),
            reason: format!("{} has no sortable field with this name", T::ENTITY),
        })?;

        let dir = if dir.is_empty() || dir.eq_ignore_ascii_case("asc") {
            SortDir::Asc
        } else if dir.eq_ignore_ascii_case("desc") {
            SortDir::Desc
        } else {
            return Err(ServiceError::InvalidSort {
                field: name.to_owned(),
                reason: format!("unknown direction '{dir}'"),
            });
        };

        Ok(Self { field, dir })
    }

    pub fn new(field: &'static str, dir: SortDir) -> Self {
        Self { field, dir }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn dir(&self) -> SortDir {
        self.dir
    }
}

/// Comparable projection of one entity field.
///
/// A given field always yields the same variant, so cross-variant ordering never matters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue<'a> {
    Missing,
    Bool(bool),
    Text(&'a str),
    Time(DateTime<Utc>),
    Id(Uuid),
}

impl<'a> From<Option<&'a str>> for SortValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(SortValue::Missing, SortValue::Text)
    }
}

/// A validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// `page` must be non-negative and `size` strictly positive.
    pub fn new(page: i32, size: i32) -> ServiceResult<Self> {
        match (u32::try_from(page), u32::try_from(size)) {
            (Ok(page), Ok(size)) if size > 0 => Ok(Self { page, size }),
            _ => Err(ServiceError::InvalidPageRequest {
                page: page.into(),
                size: size.into(),
            }),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn offset(&self) -> usize {
        (self.page as usize).saturating_mul(self.size as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

/// One page of a listing plus the total number of matching entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            data,
            pagination: Pagination {
                page: request.page,
                size: request.size,
                total_elements: total,
                total_pages: total.div_ceil(u64::from(request.size)),
            },
        }
    }

    pub fn total(&self) -> u64 {
        self.pagination.total_elements
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Order two entities by `sort`, falling back to identifier ascending.
pub fn compare<T: StoredEntity>(a: &T, b: &T, sort: &SortSpec) -> Ordering {
    let by_field = a.sort_value(sort.field).cmp(&b.sort_value(sort.field));
    let by_field = match sort.dir {
        SortDir::Asc => by_field,
        SortDir::Desc => by_field.reverse(),
    };
    by_field.then_with(|| a.id().cmp(&b.id()))
}

/// Filter, count, sort and window `items`.
pub fn execute<'a, T: StoredEntity>(
    items: impl IntoIterator<Item = &'a T>,
    filter: &T::Filter,
    sort: &SortSpec,
    request: PageRequest,
) -> Page<T> {
    let mut matching: Vec<&T> = items.into_iter().filter(|item| item.matches(filter)).collect();
    let total = matching.len() as u64;

    matching.sort_by(|a, b| compare(*a, *b, sort));

    let data = matching
        .into_iter()
        .skip(request.offset())
        .take(request.size as usize)
        .cloned()
        .collect();

    Page::new(data, request, total)
}
