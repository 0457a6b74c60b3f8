//! Country entity and its request/response shapes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a country.
pub type CountryId = Uuid;

/// Stored country record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub country_id: CountryId,
    /// Unique across all countries (exact, case-sensitive comparison).
    pub country_name: String,
}

/// Add-request for a new country.
///
/// `country_name` is optional so that a missing name can be reported as an
/// argument error instead of failing at deserialization time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryAddRequest {
    pub country_name: Option<String>,
}

impl CountryAddRequest {
    pub fn new(country_name: impl Into<String>) -> Self {
        Self {
            country_name: Some(country_name.into()),
        }
    }

    /// Converts the request into a stored record with a fresh id.
    ///
    /// Callers must have validated `country_name` first; a missing name maps
    /// to an empty string here.
    pub fn to_country(&self) -> Country {
        Country {
            country_id: Uuid::new_v4(),
            country_name: self.country_name.clone().unwrap_or_default(),
        }
    }
}

/// Read view of a country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryResponse {
    pub country_id: CountryId,
    pub country_name: String,
}

impl From<&Country> for CountryResponse {
    fn from(country: &Country) -> Self {
        Self {
            country_id: country.country_id,
            country_name: country.country_name.clone(),
        }
    }
}

impl From<Country> for CountryResponse {
    fn from(country: Country) -> Self {
        Self {
            country_id: country.country_id,
            country_name: country.country_name,
        }
    }
}
