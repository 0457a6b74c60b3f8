//! Search and sort dispatch over person response views.
//!
//! Field identifiers are the exact property names exposed to callers
//! (`PersonName`, `Email`, ...). Each table is built once and maps an
//! identifier to an extractor or a comparator; unknown identifiers are inert.

use crate::model::person::{PersonResponse, DATE_FORMAT};
use once_cell::sync::Lazy;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

type FieldExtractor = fn(&PersonResponse) -> Option<String>;
type FieldComparator = fn(&PersonResponse, &PersonResponse) -> Ordering;

/// Searchable fields with their display labels, in presentation order.
pub const SEARCH_FIELDS: &[(&str, &str)] = &[
    ("PersonName", "Person Name"),
    ("Email", "Email"),
    ("DateOfBirth", "Date of Birth"),
    ("Gender", "Gender"),
    ("CountryID", "Country"),
    ("Address", "Address"),
];

/// Whether `field` names one of [`SEARCH_FIELDS`].
pub fn is_search_field(field: &str) -> bool {
    SEARCH_FIELDS.iter().any(|(id, _)| *id == field)
}

static SEARCH_EXTRACTORS: Lazy<HashMap<&'static str, FieldExtractor>> = Lazy::new(|| {
    let mut table: HashMap<&'static str, FieldExtractor> = HashMap::new();
    table.insert("PersonName", |p| p.person_name.clone());
    table.insert("Email", |p| p.email.clone());
    table.insert("DateOfBirth", |p| {
        p.date_of_birth
            .map(|date| date.format(DATE_FORMAT).to_string())
    });
    table.insert("Gender", |p| p.gender.map(|g| g.as_str().to_string()));
    // Matched against the denormalized country name, not the raw id.
    table.insert("CountryID", |p| p.country.clone());
    table.insert("Address", |p| p.address.clone());
    table
});

static SORT_COMPARATORS: Lazy<HashMap<&'static str, FieldComparator>> = Lazy::new(|| {
    let mut table: HashMap<&'static str, FieldComparator> = HashMap::new();
    table.insert("PersonName", |a, b| {
        compare_text(a.person_name.as_deref(), b.person_name.as_deref())
    });
    table.insert("Email", |a, b| {
        compare_text(a.email.as_deref(), b.email.as_deref())
    });
    table.insert("DateOfBirth", |a, b| a.date_of_birth.cmp(&b.date_of_birth));
    table.insert("Age", |a, b| a.age.cmp(&b.age));
    table.insert("Gender", |a, b| {
        compare_text(
            a.gender.map(|g| g.as_str()),
            b.gender.map(|g| g.as_str()),
        )
    });
    table.insert("Country", |a, b| {
        compare_text(a.country.as_deref(), b.country.as_deref())
    });
    table.insert("Address", |a, b| {
        compare_text(a.address.as_deref(), b.address.as_deref())
    });
    table.insert("ReceiveNewsLetters", |a, b| {
        a.receive_news_letters.cmp(&b.receive_news_letters)
    });
    table
});

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort order `{0}`; expected ASC|DESC")]
pub struct ParseSortOrderError(pub String);

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            _ => Err(ParseSortOrderError(value.to_string())),
        }
    }
}

/// Keeps persons whose `search_by` field contains `search_text`
/// (case-insensitive).
///
/// Rules:
/// - Empty/absent field or text returns `persons` unchanged, including
///   records whose field is empty.
/// - Unknown field identifiers return `persons` unchanged.
/// - A record whose field value is empty or absent passes through.
pub fn filter_persons(
    persons: Vec<PersonResponse>,
    search_by: Option<&str>,
    search_text: Option<&str>,
) -> Vec<PersonResponse> {
    let (Some(field), Some(text)) = (non_empty(search_by), non_empty(search_text)) else {
        return persons;
    };
    let Some(extract) = SEARCH_EXTRACTORS.get(field) else {
        return persons;
    };

    let needle = text.to_lowercase();
    persons
        .into_iter()
        .filter(|person| match extract(person) {
            Some(value) if !value.is_empty() => value.to_lowercase().contains(&needle),
            _ => true,
        })
        .collect()
}

/// Stable sort of `persons` by the `sort_by` field.
///
/// Text fields compare case-insensitively; absent values sort first in
/// ascending order. Empty or unknown `sort_by` returns the input unchanged.
pub fn sort_persons(
    mut persons: Vec<PersonResponse>,
    sort_by: Option<&str>,
    order: SortOrder,
) -> Vec<PersonResponse> {
    let Some(compare) = non_empty(sort_by).and_then(|field| SORT_COMPARATORS.get(field)) else {
        return persons;
    };

    match order {
        SortOrder::Asc => persons.sort_by(|a, b| compare(a, b)),
        SortOrder::Desc => persons.sort_by(|a, b| compare(b, a)),
    }
    persons
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

fn compare_text(left: Option<&str>, right: Option<&str>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.to_uppercase().cmp(&right.to_uppercase()),
        (left, right) => left.is_some().cmp(&right.is_some()),
    }
}
