//! Person use-case service.
//!
//! # Responsibility
//! - Validate add/update requests and delegate persistence to the store.
//! - Denormalize the current country name onto every response view.
//! - Provide search and sort over the full response set.
//!
//! # Invariants
//! - `update_person` is a full replacement of mutable fields; `person_id`
//!   and `tax_identification_number` never change.
//! - Country names are looked up on every read, never cached.

use crate::model::person::{
    Person, PersonAddRequest, PersonId, PersonResponse, PersonUpdateRequest,
};
use crate::repo::country_repo::CountryRepository;
use crate::repo::person_repo::PersonRepository;
use crate::service::countries_service::CountriesService;
use crate::service::query::{filter_persons, sort_persons, SortOrder};
use crate::service::{ServiceError, ServiceResult};
use chrono::{Local, NaiveDate};
use log::{info, warn};

/// Use-case service wrapper over a person store.
pub struct PersonsService<P: PersonRepository, C: CountryRepository> {
    repo: P,
    countries: CountriesService<C>,
    today: fn() -> NaiveDate,
}

impl<P: PersonRepository, C: CountryRepository> PersonsService<P, C> {
    /// Creates a service over `repo`, resolving country names through
    /// `countries`.
    pub fn new(repo: P, countries: CountriesService<C>) -> Self {
        Self {
            repo,
            countries,
            today: local_today,
        }
    }

    /// Replaces the clock used to compute ages.
    #[must_use]
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Country service used for denormalization.
    pub fn countries(&self) -> &CountriesService<C> {
        &self.countries
    }

    /// Adds a person with a generated id.
    ///
    /// # Errors
    /// - `NullRequest` when `request` is `None`.
    /// - `InvalidArgument` when `person_name` is `None`.
    pub fn add_person(&self, request: Option<&PersonAddRequest>) -> ServiceResult<PersonResponse> {
        let request = request.ok_or(ServiceError::NullRequest("PersonAddRequest"))?;
        request.validate()?;

        let person = request.to_person();
        self.repo.insert(&person)?;
        info!(
            "event=person_add module=service status=ok person_id={}",
            person.person_id
        );

        self.to_response(&person)
    }

    /// Returns every person as a response view, in storage order.
    pub fn get_all_persons(&self) -> ServiceResult<Vec<PersonResponse>> {
        self.repo
            .list()?
            .iter()
            .map(|person| self.to_response(person))
            .collect()
    }

    /// Gets one person by id; `None` for an absent or unknown id.
    pub fn get_person_by_id(
        &self,
        person_id: Option<PersonId>,
    ) -> ServiceResult<Option<PersonResponse>> {
        let Some(person_id) = person_id else {
            return Ok(None);
        };
        match self.repo.find_by_id(person_id)? {
            Some(person) => Ok(Some(self.to_response(&person)?)),
            None => Ok(None),
        }
    }

    /// Returns persons whose `search_by` field contains `search_text`.
    ///
    /// See [`filter_persons`] for the exact matching rules; empty or
    /// unknown inputs return every person.
    pub fn get_filtered_persons(
        &self,
        search_by: Option<&str>,
        search_text: Option<&str>,
    ) -> ServiceResult<Vec<PersonResponse>> {
        let all = self.get_all_persons()?;
        Ok(filter_persons(all, search_by, search_text))
    }

    /// Stable sort of `persons` by `sort_by` in `order`.
    pub fn get_sorted_persons(
        &self,
        persons: Vec<PersonResponse>,
        sort_by: Option<&str>,
        order: SortOrder,
    ) -> Vec<PersonResponse> {
        sort_persons(persons, sort_by, order)
    }

    /// Overwrites every mutable field of an existing person.
    ///
    /// # Errors
    /// - `NullRequest` when `request` is `None`.
    /// - `InvalidArgument` when `person_name` is `None`.
    /// - `NotFound` when no person has `request.person_id`.
    pub fn update_person(
        &self,
        request: Option<&PersonUpdateRequest>,
    ) -> ServiceResult<PersonResponse> {
        let request = request.ok_or(ServiceError::NullRequest("PersonUpdateRequest"))?;
        request.validate()?;

        let Some(mut person) = self.repo.find_by_id(request.person_id)? else {
            warn!(
                "event=person_update module=service status=rejected reason=not_found person_id={}",
                request.person_id
            );
            return Err(ServiceError::NotFound(request.person_id));
        };

        request.apply_to(&mut person);
        self.repo.update(&person)?;
        info!(
            "event=person_update module=service status=ok person_id={}",
            person.person_id
        );

        self.to_response(&person)
    }

    /// Deletes a person by id.
    ///
    /// Returns `Ok(false)` when no person matches.
    ///
    /// # Errors
    /// - `NullArgument` when `person_id` is `None`.
    pub fn delete_person(&self, person_id: Option<PersonId>) -> ServiceResult<bool> {
        let person_id = person_id.ok_or(ServiceError::NullArgument("person_id"))?;
        let removed = self.repo.remove(person_id)?;
        info!(
            "event=person_delete module=service status=ok person_id={person_id} removed={removed}"
        );
        Ok(removed)
    }

    fn to_response(&self, person: &Person) -> ServiceResult<PersonResponse> {
        let country = self
            .countries
            .get_country_by_id(person.country_id)?
            .map(|country| country.country_name);
        Ok(PersonResponse::from_person(person, country, (self.today)()))
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
