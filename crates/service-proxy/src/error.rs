//! # Service Errors
//!
//! Every failure an operation can report, whatever layer raised it, is a variant of
//! [`ServiceError`]. The variants carry structured fields (which field, which key, which id)
//! so a transport can render a precise message, and [`ServiceError::kind`] gives callers a
//! stable discriminant to branch on without parsing message text.
//!
//! Registration problems are not operation results and live in [`RegistryError`].

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Result alias used by stores, services and the dispatcher.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure half of an operation result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceError {
    // --- dispatch level: resolved before any service code runs ---
    #[error("No service registered at address '{address}'")]
    UnknownAddress { address: String },

    #[error("Service '{address}' has no operation '{operation}'")]
    UnknownOperation { address: String, operation: String },

    #[error("Invalid arguments for '{operation}': {reason}")]
    InvalidArguments { operation: String, reason: String },

    // --- domain level ---
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Cannot sort by '{field}': {reason}")]
    InvalidSort { field: String, reason: String },

    #[error("Invalid page request: page={page}, size={size}")]
    InvalidPageRequest { page: i64, size: i64 },

    #[error("{entity} with {field} '{key}' already exists")]
    DuplicateKey {
        entity: String,
        field: String,
        key: String,
    },

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("{entity} {id} still has {count} {dependent} record(s)")]
    HasDependents {
        entity: String,
        id: String,
        dependent: String,
        count: u64,
    },

    // --- plumbing ---
    #[error("{entity} store is not running")]
    StoreUnavailable { entity: String },

    #[error("Handler finished without replying")]
    Dropped,

    #[error("Value encoding failed: {reason}")]
    Codec { reason: String },
}

/// Machine-readable discriminant of a [`ServiceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    UnknownAddress,
    UnknownOperation,
    InvalidArguments,
    InvalidInput,
    InvalidSort,
    InvalidPageRequest,
    DuplicateKey,
    NotFound,
    HasDependents,
    StoreUnavailable,
    Dropped,
    Codec,
}

impl ErrorKind {
    /// Stable code, identical to the `kind` tag of the serialized error.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::UnknownAddress => "UNKNOWN_ADDRESS",
            ErrorKind::UnknownOperation => "UNKNOWN_OPERATION",
            ErrorKind::InvalidArguments => "INVALID_ARGUMENTS",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::InvalidSort => "INVALID_SORT",
            ErrorKind::InvalidPageRequest => "INVALID_PAGE_REQUEST",
            ErrorKind::DuplicateKey => "DUPLICATE_KEY",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::HasDependents => "HAS_DEPENDENTS",
            ErrorKind::StoreUnavailable => "STORE_UNAVAILABLE",
            ErrorKind::Dropped => "DROPPED",
            ErrorKind::Codec => "CODEC",
        }
    }

    /// True for failures the dispatcher raises before invoking a service.
    pub fn is_dispatch(self) -> bool {
        matches!(
            self,
            ErrorKind::UnknownAddress | ErrorKind::UnknownOperation | ErrorKind::InvalidArguments
        )
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::UnknownAddress { .. } => ErrorKind::UnknownAddress,
            ServiceError::UnknownOperation { .. } => ErrorKind::UnknownOperation,
            ServiceError::InvalidArguments { .. } => ErrorKind::InvalidArguments,
            ServiceError::InvalidInput { .. } => ErrorKind::InvalidInput,
            ServiceError::InvalidSort { .. } => ErrorKind::InvalidSort,
            ServiceError::InvalidPageRequest { .. } => ErrorKind::InvalidPageRequest,
            ServiceError::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            ServiceError::NotFound { .. } => ErrorKind::NotFound,
            ServiceError::HasDependents { .. } => ErrorKind::HasDependents,
            ServiceError::StoreUnavailable { .. } => ErrorKind::StoreUnavailable,
            ServiceError::Dropped => ErrorKind::Dropped,
            ServiceError::Codec { .. } => ErrorKind::Codec,
        }
    }

    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_arguments(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    pub fn duplicate_key(entity: &str, field: &str, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            entity: entity.to_owned(),
            field: field.to_owned(),
            key: key.into(),
        }
    }

    pub fn not_found(entity: &str, id: impl Display) -> Self {
        Self::NotFound {
            entity: entity.to_owned(),
            id: id.to_string(),
        }
    }

    pub fn store_unavailable(entity: &str) -> Self {
        Self::StoreUnavailable {
            entity: entity.to_owned(),
        }
    }

    pub fn codec(err: impl Display) -> Self {
        Self::Codec {
            reason: err.to_string(),
        }
    }
}

/// Failures raised while binding handlers to addresses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Address '{address}' is already bound to a service")]
    AddressConflict { address: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_kind_matches_code() {
        let err = ServiceError::duplicate_key("Location", "code", "WH1");
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["kind"], err.kind().code());
        assert_eq!(json["key"], "WH1");
        assert_eq!(json["field"], "code");
    }

    #[test]
    fn errors_survive_a_json_round_trip() {
        let err = ServiceError::HasDependents {
            entity: "Product".into(),
            id: "p-1".into(),
            dependent: "ProductVariant".into(),
            count: 2,
        };
        let back: ServiceError = serde_json::from_str(&serde_json::to_string(&err).unwrap()).unwrap();
        assert_eq!(back, err);

        let back: ServiceError =
            serde_json::from_str(&serde_json::to_string(&ServiceError::Dropped).unwrap()).unwrap();
        assert_eq!(back.kind(), ErrorKind::Dropped);
    }

    #[test]
    fn dispatch_kinds_are_flagged() {
        assert!(ErrorKind::UnknownAddress.is_dispatch());
        assert!(ErrorKind::InvalidArguments.is_dispatch());
        assert!(!ErrorKind::NotFound.is_dispatch());
        assert!(!ErrorKind::DuplicateKey.is_dispatch());
    }
}
