//! Bulk import of countries and persons from `.xlsx` uploads.
//!
//! # Responsibility
//! - Read the first worksheet of a workbook into header-addressed rows.
//! - Turn each data row into an add-request and delegate to the services.
//!
//! # Invariants
//! - Rows are processed strictly in sheet order.
//! - A row rejected by the service (duplicate or invalid) is skipped; prior
//!   rows stay inserted and later rows are still processed.
//! - Storage failures abort the import and propagate unchanged.

use crate::service::ServiceError;
use thiserror::Error;

mod rows;
mod upload;

pub use rows::{import_countries_from_excel, import_persons_from_excel};
pub use upload::ensure_xlsx_upload;

pub type ImportResult<T> = Result<T, ImportError>;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("please select an xlsx file")]
    EmptyUpload,
    #[error("unsupported file `{0}`; 'xlsx' file is expected")]
    UnsupportedFile(String),
    #[error("unreadable spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),
    #[error("workbook contains no worksheet")]
    EmptyWorkbook,
    #[error("worksheet has no `{0}` column")]
    MissingColumn(&'static str),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Outcome of one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records successfully added.
    pub inserted: usize,
    /// Non-blank rows rejected by validation or uniqueness rules.
    pub skipped: usize,
}
