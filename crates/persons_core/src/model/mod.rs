//! Directory domain model: entities, requests and response views.
//!
//! # Responsibility
//! - Define the stored record shapes for countries and persons.
//! - Define the add/update request payloads accepted by services.
//! - Define the denormalized response views returned to callers.
//!
//! # Invariants
//! - `CountryId` and `PersonId` are generated once and never reassigned.
//! - Response views are derived at read time and never persisted.

pub mod country;
pub mod person;
