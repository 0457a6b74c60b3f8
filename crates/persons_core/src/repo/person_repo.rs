//! Person store contract with SQLite and in-memory implementations.
//!
//! # Responsibility
//! - Provide insert/list/find/update/remove over person records.
//! - Keep text encodings of dates, genders and flags inside this module.
//!
//! # Invariants
//! - `update` replaces every stored column except `person_id`.
//! - `update` of a missing id fails with `RepoError::NotFound`.
//! - `remove` reports a missing id with `Ok(false)`, not an error.

use crate::model::person::{Gender, Person, PersonId, DATE_FORMAT};
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::cell::RefCell;

const PERSON_SELECT_SQL: &str = "SELECT
    person_id,
    person_name,
    email,
    date_of_birth,
    gender,
    country_id,
    address,
    receive_news_letters,
    tax_identification_number
FROM persons";

const PERSON_COLUMNS: &[&str] = &[
    "person_id",
    "person_name",
    "email",
    "date_of_birth",
    "gender",
    "country_id",
    "address",
    "receive_news_letters",
    "tax_identification_number",
];

/// Store interface for person records.
pub trait PersonRepository {
    fn insert(&self, person: &Person) -> RepoResult<PersonId>;
    fn list(&self) -> RepoResult<Vec<Person>>;
    fn find_by_id(&self, id: PersonId) -> RepoResult<Option<Person>>;
    fn update(&self, person: &Person) -> RepoResult<()>;
    /// Returns whether a record was removed.
    fn remove(&self, id: PersonId) -> RepoResult<bool>;
}

impl<R: PersonRepository + ?Sized> PersonRepository for &R {
    fn insert(&self, person: &Person) -> RepoResult<PersonId> {
        (**self).insert(person)
    }

    fn list(&self) -> RepoResult<Vec<Person>> {
        (**self).list()
    }

    fn find_by_id(&self, id: PersonId) -> RepoResult<Option<Person>> {
        (**self).find_by_id(id)
    }

    fn update(&self, person: &Person) -> RepoResult<()> {
        (**self).update(person)
    }

    fn remove(&self, id: PersonId) -> RepoResult<bool> {
        (**self).remove(id)
    }
}

/// SQLite-backed person store.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Constructs a store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "persons", PERSON_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn insert(&self, person: &Person) -> RepoResult<PersonId> {
        self.conn.execute(
            "INSERT INTO persons (
                person_id,
                person_name,
                email,
                date_of_birth,
                gender,
                country_id,
                address,
                receive_news_letters,
                tax_identification_number
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                person.person_id.to_string(),
                person.person_name.as_deref(),
                person.email.as_deref(),
                person.date_of_birth.map(date_to_db),
                person.gender.map(Gender::as_str),
                person.country_id.map(|id| id.to_string()),
                person.address.as_deref(),
                bool_to_int(person.receive_news_letters),
                person.tax_identification_number.as_deref(),
            ],
        )?;

        Ok(person.person_id)
    }

    fn list(&self) -> RepoResult<Vec<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut persons = Vec::new();
        while let Some(row) = rows.next()? {
            persons.push(parse_person_row(row)?);
        }
        Ok(persons)
    }

    fn find_by_id(&self, id: PersonId) -> RepoResult<Option<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} WHERE person_id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(row)?));
        }
        Ok(None)
    }

    fn update(&self, person: &Person) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE persons
             SET
                person_name = ?1,
                email = ?2,
                date_of_birth = ?3,
                gender = ?4,
                country_id = ?5,
                address = ?6,
                receive_news_letters = ?7,
                tax_identification_number = ?8
             WHERE person_id = ?9;",
            params![
                person.person_name.as_deref(),
                person.email.as_deref(),
                person.date_of_birth.map(date_to_db),
                person.gender.map(Gender::as_str),
                person.country_id.map(|id| id.to_string()),
                person.address.as_deref(),
                bool_to_int(person.receive_news_letters),
                person.tax_identification_number.as_deref(),
                person.person_id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(person.person_id));
        }

        Ok(())
    }

    fn remove(&self, id: PersonId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM persons WHERE person_id = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let id_text: String = row.get("person_id")?;
    let person_id = parse_uuid(&id_text, "persons.person_id")?;

    let date_of_birth = match row.get::<_, Option<String>>("date_of_birth")? {
        Some(value) => Some(NaiveDate::parse_from_str(&value, DATE_FORMAT).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid date `{value}` in persons.date_of_birth"
            ))
        })?),
        None => None,
    };

    let gender = match row.get::<_, Option<String>>("gender")? {
        Some(value) => Some(value.parse::<Gender>().map_err(|_| {
            RepoError::InvalidData(format!("invalid gender `{value}` in persons.gender"))
        })?),
        None => None,
    };

    let country_id = match row.get::<_, Option<String>>("country_id")? {
        Some(value) => Some(parse_uuid(&value, "persons.country_id")?),
        None => None,
    };

    let receive_news_letters = match row.get::<_, i64>("receive_news_letters")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid receive_news_letters value `{other}` in persons.receive_news_letters"
            )));
        }
    };

    Ok(Person {
        person_id,
        person_name: row.get("person_name")?,
        email: row.get("email")?,
        date_of_birth,
        gender,
        country_id,
        address: row.get("address")?,
        receive_news_letters,
        tax_identification_number: row.get("tax_identification_number")?,
    })
}

fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

/// Process-local person store; storage order is insertion order.
#[derive(Debug, Default)]
pub struct InMemoryPersonRepository {
    persons: RefCell<Vec<Person>>,
}

impl InMemoryPersonRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `persons`.
    pub fn with_persons(persons: Vec<Person>) -> Self {
        Self {
            persons: RefCell::new(persons),
        }
    }
}

impl PersonRepository for InMemoryPersonRepository {
    fn insert(&self, person: &Person) -> RepoResult<PersonId> {
        let mut persons = self.persons.borrow_mut();
        if persons
            .iter()
            .any(|existing| existing.person_id == person.person_id)
        {
            return Err(RepoError::DuplicateId(person.person_id));
        }
        persons.push(person.clone());
        Ok(person.person_id)
    }

    fn list(&self) -> RepoResult<Vec<Person>> {
        Ok(self.persons.borrow().clone())
    }

    fn find_by_id(&self, id: PersonId) -> RepoResult<Option<Person>> {
        Ok(self
            .persons
            .borrow()
            .iter()
            .find(|person| person.person_id == id)
            .cloned())
    }

    fn update(&self, person: &Person) -> RepoResult<()> {
        let mut persons = self.persons.borrow_mut();
        let slot = persons
            .iter_mut()
            .find(|existing| existing.person_id == person.person_id)
            .ok_or(RepoError::NotFound(person.person_id))?;
        *slot = person.clone();
        Ok(())
    }

    fn remove(&self, id: PersonId) -> RepoResult<bool> {
        let mut persons = self.persons.borrow_mut();
        let before = persons.len();
        persons.retain(|person| person.person_id != id);
        Ok(persons.len() != before)
    }
}
