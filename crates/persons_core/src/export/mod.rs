//! Tabular export of person response views.
//!
//! # Responsibility
//! - Render person lists as CSV or single-sheet `.xlsx` byte streams.
//!
//! # Invariants
//! - Both formats share one header row and column order.
//! - Dates are written as `yyyy-MM-dd` text so they re-import unchanged.

use crate::model::person::{PersonResponse, DATE_FORMAT};
use thiserror::Error;

mod csv_export;
mod xlsx;

pub use csv_export::persons_to_csv;
pub use xlsx::{persons_to_excel, write_workbook};

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("xlsx export failed: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Column headers shared by every export format.
pub const PERSON_EXPORT_HEADERS: &[&str] = &[
    "PersonName",
    "Email",
    "DateOfBirth",
    "Age",
    "Gender",
    "Country",
    "Address",
    "ReceiveNewsLetters",
    "TaxIdentificationNumber",
];

/// Flattens one person into export cells, in `PERSON_EXPORT_HEADERS` order.
pub(crate) fn person_cells(person: &PersonResponse) -> Vec<String> {
    vec![
        person.person_name.clone().unwrap_or_default(),
        person.email.clone().unwrap_or_default(),
        person
            .date_of_birth
            .map(|date| date.format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
        person.age.map(|age| age.to_string()).unwrap_or_default(),
        person
            .gender
            .map(|gender| gender.as_str().to_string())
            .unwrap_or_default(),
        person.country.clone().unwrap_or_default(),
        person.address.clone().unwrap_or_default(),
        person.receive_news_letters.to_string(),
        person.tax_identification_number.clone().unwrap_or_default(),
    ]
}
