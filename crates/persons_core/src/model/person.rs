//! Person entity, request payloads and the denormalized response view.
//!
//! # Invariants
//! - `person_id` is stable and never reused for another person.
//! - `person_name` must be present (not `None`) on add and update; an empty
//!   string is accepted.
//! - `tax_identification_number` is set once on creation and is not touched
//!   by updates.

use crate::model::country::CountryId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Stable identifier of a person.
pub type PersonId = Uuid;

/// Value assigned to `tax_identification_number` when none is supplied.
pub const DEFAULT_TAX_IDENTIFICATION_NUMBER: &str = "ABC12345";

/// Date format used for storage, search matching and import/export.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Closed set of gender options, stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown gender `{0}`; expected Male|Female|Other")]
pub struct ParseGenderError(pub String);

impl FromStr for Gender {
    type Err = ParseGenderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            _ => Err(ParseGenderError(value.to_string())),
        }
    }
}

/// Stored person record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub person_id: PersonId,
    pub person_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    /// Not checked for existence; dangling references are tolerated.
    pub country_id: Option<CountryId>,
    pub address: Option<String>,
    pub receive_news_letters: bool,
    pub tax_identification_number: Option<String>,
}

/// Field-level validation failures detected by the core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersonValidationError {
    #[error("PersonName can't be null")]
    MissingPersonName,
}

/// Add-request for a new person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonAddRequest {
    pub person_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub country_id: Option<CountryId>,
    pub address: Option<String>,
    pub receive_news_letters: bool,
}

impl PersonAddRequest {
    /// Checks the invariants the core enforces regardless of the input layer.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if self.person_name.is_none() {
            return Err(PersonValidationError::MissingPersonName);
        }
        Ok(())
    }

    /// Converts the request into a stored record with a fresh id and the
    /// default tax identification number.
    pub fn to_person(&self) -> Person {
        Person {
            person_id: Uuid::new_v4(),
            person_name: self.person_name.clone(),
            email: self.email.clone(),
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            country_id: self.country_id,
            address: self.address.clone(),
            receive_news_letters: self.receive_news_letters,
            tax_identification_number: Some(DEFAULT_TAX_IDENTIFICATION_NUMBER.to_string()),
        }
    }
}

/// Update-request: full replacement of every mutable field, keyed by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonUpdateRequest {
    pub person_id: PersonId,
    pub person_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub country_id: Option<CountryId>,
    pub address: Option<String>,
    pub receive_news_letters: bool,
}

impl PersonUpdateRequest {
    /// Same rules as [`PersonAddRequest::validate`].
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if self.person_name.is_none() {
            return Err(PersonValidationError::MissingPersonName);
        }
        Ok(())
    }

    /// Overwrites the mutable fields of `person` in place.
    ///
    /// `person_id` and `tax_identification_number` are left untouched.
    pub fn apply_to(&self, person: &mut Person) {
        person.person_name = self.person_name.clone();
        person.email = self.email.clone();
        person.date_of_birth = self.date_of_birth;
        person.gender = self.gender;
        person.country_id = self.country_id;
        person.address = self.address.clone();
        person.receive_news_letters = self.receive_news_letters;
    }
}

/// Denormalized read view of a person.
///
/// `age` and `country` are computed when the view is built and are never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonResponse {
    pub person_id: PersonId,
    pub person_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub country_id: Option<CountryId>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub receive_news_letters: bool,
    pub tax_identification_number: Option<String>,
}

impl PersonResponse {
    /// Builds the view for `person` as of `today`, attaching the current
    /// name of its country.
    pub fn from_person(person: &Person, country: Option<String>, today: NaiveDate) -> Self {
        Self {
            person_id: person.person_id,
            person_name: person.person_name.clone(),
            email: person.email.clone(),
            date_of_birth: person.date_of_birth,
            age: person.date_of_birth.and_then(|dob| age_on(dob, today)),
            gender: person.gender,
            country_id: person.country_id,
            country,
            address: person.address.clone(),
            receive_news_letters: person.receive_news_letters,
            tax_identification_number: person.tax_identification_number.clone(),
        }
    }

    /// Pre-fills an update request from this view (edit form flow).
    pub fn to_update_request(&self) -> PersonUpdateRequest {
        PersonUpdateRequest {
            person_id: self.person_id,
            person_name: self.person_name.clone(),
            email: self.email.clone(),
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            country_id: self.country_id,
            address: self.address.clone(),
            receive_news_letters: self.receive_news_letters,
        }
    }
}

/// Whole calendar years between `date_of_birth` and `today`.
///
/// Returns `None` for birth dates after `today`.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    today.years_since(date_of_birth)
}

#[cfg(test)]
mod tests {
    use super::{age_on, Gender, PersonAddRequest, PersonUpdateRequest};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_counts_completed_years_only() {
        let dob = date(2000, 6, 15);
        assert_eq!(age_on(dob, date(2020, 6, 14)), Some(19));
        assert_eq!(age_on(dob, date(2020, 6, 15)), Some(20));
        assert_eq!(age_on(dob, date(2000, 6, 15)), Some(0));
    }

    #[test]
    fn age_is_absent_for_future_birth_date() {
        assert_eq!(age_on(date(2030, 1, 1), date(2020, 1, 1)), None);
    }

    #[test]
    fn gender_parses_case_insensitively() {
        assert_eq!(" female ".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("OTHER".parse::<Gender>().unwrap(), Gender::Other);
        assert!("unknown".parse::<Gender>().is_err());
        assert_eq!(Gender::Male.to_string(), "Male");
    }

    #[test]
    fn empty_name_is_valid_but_missing_name_is_not() {
        let mut request = PersonAddRequest {
            person_name: Some(String::new()),
            ..PersonAddRequest::default()
        };
        assert!(request.validate().is_ok());

        request.person_name = None;
        assert!(request.validate().is_err());
    }

    #[test]
    fn new_person_gets_default_tax_identification_number() {
        let person = PersonAddRequest {
            person_name: Some("Maria".to_string()),
            ..PersonAddRequest::default()
        }
        .to_person();
        assert_eq!(person.tax_identification_number.as_deref(), Some("ABC12345"));
        assert!(!person.person_id.is_nil());
    }

    #[test]
    fn update_request_keeps_id_and_tax_number() {
        let mut person = PersonAddRequest {
            person_name: Some("Before".to_string()),
            ..PersonAddRequest::default()
        }
        .to_person();
        person.tax_identification_number = Some("XYZ98765".to_string());
        let original_id = person.person_id;

        let update = PersonUpdateRequest {
            person_id: Uuid::new_v4(),
            person_name: Some("After".to_string()),
            email: Some("after@example.com".to_string()),
            date_of_birth: Some(date(1990, 1, 1)),
            gender: Some(Gender::Other),
            country_id: None,
            address: Some("Street 1".to_string()),
            receive_news_letters: true,
        };
        update.apply_to(&mut person);

        assert_eq!(person.person_id, original_id);
        assert_eq!(person.person_name.as_deref(), Some("After"));
        assert_eq!(person.tax_identification_number.as_deref(), Some("XYZ98765"));
        assert!(person.receive_news_letters);
    }
}
