//! Core use-case services.
//!
//! # Responsibility
//! - Enforce request validation and uniqueness rules above the stores.
//! - Build denormalized response views for callers.
//! - Keep presentation/import layers decoupled from storage details.
//!
//! # Invariants
//! - Services never cache denormalized data between calls.
//! - Lookups by id never fail for a missing record; they return `None`.

use crate::model::person::PersonValidationError;
use crate::repo::RepoError;
use thiserror::Error;
use uuid::Uuid;

pub mod countries_service;
pub mod persons_service;
pub mod query;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for directory use-cases.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Required request object was absent.
    #[error("request `{0}` can't be null")]
    NullRequest(&'static str),
    /// A required field failed validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A country with the same exact name already exists.
    #[error("given country name `{0}` already exists")]
    DuplicateName(String),
    /// Update target does not exist.
    #[error("given person id doesn't exist: {0}")]
    NotFound(Uuid),
    /// Required id parameter was absent.
    #[error("argument `{0}` can't be null")]
    NullArgument(&'static str),
    /// Storage failure; propagated without retries.
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl ServiceError {
    /// Whether this error belongs to the broad "bad argument" category
    /// (invalid field, duplicate name or unknown id).
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::DuplicateName(_) | Self::NotFound(_)
        )
    }
}

impl From<PersonValidationError> for ServiceError {
    fn from(value: PersonValidationError) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}
