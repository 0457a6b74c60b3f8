//! Country store contract with SQLite and in-memory implementations.
//!
//! # Invariants
//! - Country names are compared exactly (case-sensitive) by `count_by_name`.
//! - `insert` refuses a second country with the same exact name
//!   (`RepoError::DuplicateName`); SQLite backs this with a unique index.
//! - Countries are never updated or removed through this store.

use crate::model::country::{Country, CountryId};
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE;
use rusqlite::{params, Connection, Row};
use std::cell::RefCell;

const COUNTRY_COLUMNS: &[&str] = &["country_id", "country_name"];

/// Store interface for country records.
pub trait CountryRepository {
    fn insert(&self, country: &Country) -> RepoResult<CountryId>;
    fn list(&self) -> RepoResult<Vec<Country>>;
    fn find_by_id(&self, id: CountryId) -> RepoResult<Option<Country>>;
    /// Number of countries whose name equals `name` exactly.
    fn count_by_name(&self, name: &str) -> RepoResult<usize>;
}

impl<R: CountryRepository + ?Sized> CountryRepository for &R {
    fn insert(&self, country: &Country) -> RepoResult<CountryId> {
        (**self).insert(country)
    }

    fn list(&self) -> RepoResult<Vec<Country>> {
        (**self).list()
    }

    fn find_by_id(&self, id: CountryId) -> RepoResult<Option<Country>> {
        (**self).find_by_id(id)
    }

    fn count_by_name(&self, name: &str) -> RepoResult<usize> {
        (**self).count_by_name(name)
    }
}

/// SQLite-backed country store.
pub struct SqliteCountryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCountryRepository<'conn> {
    /// Constructs a store from a migrated connection.
    ///
    /// Rejects connections that are not migrated to the latest schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "countries", COUNTRY_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl CountryRepository for SqliteCountryRepository<'_> {
    fn insert(&self, country: &Country) -> RepoResult<CountryId> {
        self.conn
            .execute(
                "INSERT INTO countries (country_id, country_name) VALUES (?1, ?2);",
                params![country.country_id.to_string(), country.country_name.as_str()],
            )
            .map_err(|err| {
                let unique_violation = err
                    .sqlite_error()
                    .is_some_and(|failure| failure.extended_code == SQLITE_CONSTRAINT_UNIQUE);
                if unique_violation {
                    RepoError::DuplicateName(country.country_name.clone())
                } else {
                    RepoError::from(err)
                }
            })?;
        Ok(country.country_id)
    }

    fn list(&self) -> RepoResult<Vec<Country>> {
        let mut stmt = self.conn.prepare(
            "SELECT country_id, country_name
             FROM countries
             ORDER BY rowid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut countries = Vec::new();
        while let Some(row) = rows.next()? {
            countries.push(parse_country_row(row)?);
        }
        Ok(countries)
    }

    fn find_by_id(&self, id: CountryId) -> RepoResult<Option<Country>> {
        let mut stmt = self.conn.prepare(
            "SELECT country_id, country_name
             FROM countries
             WHERE country_id = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_country_row(row)?)),
            None => Ok(None),
        }
    }

    fn count_by_name(&self, name: &str) -> RepoResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM countries WHERE country_name = ?1;",
            [name],
            |row| row.get(0),
        )?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative country count `{count}`")))
    }
}

fn parse_country_row(row: &Row<'_>) -> RepoResult<Country> {
    let id_text: String = row.get("country_id")?;
    Ok(Country {
        country_id: parse_uuid(&id_text, "countries.country_id")?,
        country_name: row.get("country_name")?,
    })
}

/// Process-local country store; storage order is insertion order.
#[derive(Debug, Default)]
pub struct InMemoryCountryRepository {
    countries: RefCell<Vec<Country>>,
}

impl InMemoryCountryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `countries`.
    pub fn with_countries(countries: Vec<Country>) -> Self {
        Self {
            countries: RefCell::new(countries),
        }
    }
}

impl CountryRepository for InMemoryCountryRepository {
    fn insert(&self, country: &Country) -> RepoResult<CountryId> {
        let mut countries = self.countries.borrow_mut();
        if countries
            .iter()
            .any(|existing| existing.country_id == country.country_id)
        {
            return Err(RepoError::DuplicateId(country.country_id));
        }
        if countries
            .iter()
            .any(|existing| existing.country_name == country.country_name)
        {
            return Err(RepoError::DuplicateName(country.country_name.clone()));
        }
        countries.push(country.clone());
        Ok(country.country_id)
    }

    fn list(&self) -> RepoResult<Vec<Country>> {
        Ok(self.countries.borrow().clone())
    }

    fn find_by_id(&self, id: CountryId) -> RepoResult<Option<Country>> {
        Ok(self
            .countries
            .borrow()
            .iter()
            .find(|country| country.country_id == id)
            .cloned())
    }

    fn count_by_name(&self, name: &str) -> RepoResult<usize> {
        Ok(self
            .countries
            .borrow()
            .iter()
            .filter(|country| country.country_name == name)
            .count())
    }
}
