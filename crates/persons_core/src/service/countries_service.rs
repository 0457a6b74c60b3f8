//! Country use-case service.
//!
//! # Responsibility
//! - Validate and create countries with generated ids.
//! - Expose read views over the country store.
//!
//! # Invariants
//! - No two countries share a `country_name` (exact comparison).
//! - Missing ids are reported as `Ok(None)`, never as errors.

use crate::model::country::{CountryAddRequest, CountryId, CountryResponse};
use crate::repo::country_repo::CountryRepository;
use crate::repo::RepoError;
use crate::service::{ServiceError, ServiceResult};
use log::{info, warn};

/// Use-case service wrapper over a country store.
pub struct CountriesService<R: CountryRepository> {
    repo: R,
}

impl<R: CountryRepository> CountriesService<R> {
    /// Creates a service using the provided store implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds a country after checking presence, non-emptiness and uniqueness
    /// of its name.
    ///
    /// # Errors
    /// - `NullRequest` when `request` is `None`.
    /// - `InvalidArgument` when the name is absent or empty.
    /// - `DuplicateName` when a country with the exact same name exists.
    pub fn add_country(
        &self,
        request: Option<&CountryAddRequest>,
    ) -> ServiceResult<CountryResponse> {
        let request = request.ok_or(ServiceError::NullRequest("CountryAddRequest"))?;

        let name = match request.country_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => {
                return Err(ServiceError::InvalidArgument(
                    "CountryName can't be null or empty".to_string(),
                ))
            }
        };

        if self.repo.count_by_name(name)? > 0 {
            warn!("event=country_add module=service status=rejected reason=duplicate_name");
            return Err(ServiceError::DuplicateName(name.to_string()));
        }

        let country = request.to_country();
        self.repo.insert(&country).map_err(|err| match err {
            RepoError::DuplicateName(name) => {
                warn!("event=country_add module=service status=rejected reason=duplicate_name");
                ServiceError::DuplicateName(name)
            }
            other => ServiceError::from(other),
        })?;
        info!(
            "event=country_add module=service status=ok country_id={}",
            country.country_id
        );

        Ok(CountryResponse::from(country))
    }

    /// Returns every country in storage order.
    pub fn get_all_countries(&self) -> ServiceResult<Vec<CountryResponse>> {
        Ok(self
            .repo
            .list()?
            .into_iter()
            .map(CountryResponse::from)
            .collect())
    }

    /// Gets one country by id; `None` for an absent or unknown id.
    pub fn get_country_by_id(
        &self,
        country_id: Option<CountryId>,
    ) -> ServiceResult<Option<CountryResponse>> {
        let Some(country_id) = country_id else {
            return Ok(None);
        };
        Ok(self.repo.find_by_id(country_id)?.map(CountryResponse::from))
    }

    /// Finds a country by its exact name.
    pub fn find_country_by_name(&self, name: &str) -> ServiceResult<Option<CountryResponse>> {
        Ok(self
            .repo
            .list()?
            .into_iter()
            .find(|country| country.country_name == name)
            .map(CountryResponse::from))
    }
}
