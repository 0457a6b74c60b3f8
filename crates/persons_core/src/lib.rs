//! Core domain logic for the persons/countries directory.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod export;
pub mod import;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError};
pub use export::{persons_to_csv, persons_to_excel, ExportError};
pub use import::{
    ensure_xlsx_upload, import_countries_from_excel, import_persons_from_excel, ImportError,
    ImportSummary,
};
pub use logging::{default_log_level, init_logging, logging_status, parse_level, LoggingError};
pub use model::country::{Country, CountryAddRequest, CountryId, CountryResponse};
pub use model::person::{
    Gender, Person, PersonAddRequest, PersonId, PersonResponse, PersonUpdateRequest,
    DEFAULT_TAX_IDENTIFICATION_NUMBER,
};
pub use repo::country_repo::{
    CountryRepository, InMemoryCountryRepository, SqliteCountryRepository,
};
pub use repo::person_repo::{InMemoryPersonRepository, PersonRepository, SqlitePersonRepository};
pub use repo::{RepoError, RepoResult};
pub use service::countries_service::CountriesService;
pub use service::persons_service::PersonsService;
pub use service::query::{is_search_field, SortOrder, SEARCH_FIELDS};
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
