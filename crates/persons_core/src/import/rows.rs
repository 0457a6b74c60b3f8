use super::{ImportError, ImportResult, ImportSummary};
use crate::model::country::CountryAddRequest;
use crate::model::person::{Gender, PersonAddRequest, DATE_FORMAT};
use crate::repo::country_repo::CountryRepository;
use crate::repo::person_repo::PersonRepository;
use crate::service::countries_service::CountriesService;
use crate::service::persons_service::PersonsService;
use crate::service::{ServiceError, ServiceResult};
use calamine::{Data, Reader, Xlsx};
use chrono::NaiveDate;
use log::{info, warn};
use std::io::Cursor;

/// First worksheet of a workbook, addressed by header text.
struct SheetTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl SheetTable {
    fn read(bytes: &[u8]) -> ImportResult<Self> {
        let mut workbook = Xlsx::new(Cursor::new(bytes))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(ImportError::EmptyWorkbook)??;

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
        let headers = rows.next().unwrap_or_default();
        Ok(Self {
            headers,
            rows: rows.collect(),
        })
    }

    fn column(&self, header: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|name| name.eq_ignore_ascii_case(header))
    }

    fn required_column(&self, header: &'static str) -> ImportResult<usize> {
        self.column(header).ok_or(ImportError::MissingColumn(header))
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.trim().to_string(),
        Data::DateTime(value) => value
            .as_datetime()
            .map(|datetime| datetime.date().format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
        other => other.to_string(),
    }
}

fn cell(row: &[String], column: Option<usize>) -> &str {
    column
        .and_then(|index| row.get(index))
        .map_or("", String::as_str)
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|value| value.is_empty())
}

/// Records one add outcome; argument errors skip the row, anything else
/// aborts the import.
fn tally<T>(
    summary: &mut ImportSummary,
    entity: &str,
    row_number: usize,
    outcome: ServiceResult<T>,
) -> ImportResult<()> {
    match outcome {
        Ok(_) => summary.inserted += 1,
        Err(err) if err.is_argument_error() => {
            warn!(
                "event={entity}_import module=import status=skipped row={row_number} error={err}"
            );
            summary.skipped += 1;
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

/// Adds one country per data row of the `CountryName` column.
///
/// # Errors
/// - `Spreadsheet`/`EmptyWorkbook` when the bytes are not a readable workbook.
/// - `MissingColumn` when the header row has no `CountryName` column.
/// - `Service` for storage failures.
pub fn import_countries_from_excel<R: CountryRepository>(
    countries: &CountriesService<R>,
    bytes: &[u8],
) -> ImportResult<ImportSummary> {
    let table = SheetTable::read(bytes)?;
    let name_column = table.required_column("CountryName")?;

    let mut summary = ImportSummary::default();
    for (index, row) in table.rows.iter().enumerate() {
        if is_blank(row) {
            continue;
        }
        let request = CountryAddRequest::new(cell(row, Some(name_column)));
        tally(
            &mut summary,
            "country",
            index + 2,
            countries.add_country(Some(&request)),
        )?;
    }

    info!(
        "event=country_import module=import status=ok inserted={} skipped={}",
        summary.inserted, summary.skipped
    );
    Ok(summary)
}

/// Adds one person per data row.
///
/// Recognised columns: `PersonName` (required), `Email`, `DateOfBirth`,
/// `Gender`, `Country` (matched by exact name), `Address`,
/// `ReceiveNewsLetters`. Rows with unparseable values are skipped.
pub fn import_persons_from_excel<P: PersonRepository, C: CountryRepository>(
    persons: &PersonsService<P, C>,
    bytes: &[u8],
) -> ImportResult<ImportSummary> {
    let table = SheetTable::read(bytes)?;
    let columns = PersonColumns {
        name: table.required_column("PersonName")?,
        email: table.column("Email"),
        date_of_birth: table.column("DateOfBirth"),
        gender: table.column("Gender"),
        country: table.column("Country"),
        address: table.column("Address"),
        receive_news_letters: table.column("ReceiveNewsLetters"),
    };

    let mut summary = ImportSummary::default();
    for (index, row) in table.rows.iter().enumerate() {
        if is_blank(row) {
            continue;
        }
        let row_number = index + 2;
        let request = match person_request(persons.countries(), &columns, row) {
            Ok(request) => request,
            Err(RowError::Invalid(reason)) => {
                warn!(
                    "event=person_import module=import status=skipped row={row_number} reason={reason}"
                );
                summary.skipped += 1;
                continue;
            }
            Err(RowError::Service(err)) => return Err(err.into()),
        };
        tally(
            &mut summary,
            "person",
            row_number,
            persons.add_person(Some(&request)),
        )?;
    }

    info!(
        "event=person_import module=import status=ok inserted={} skipped={}",
        summary.inserted, summary.skipped
    );
    Ok(summary)
}

struct PersonColumns {
    name: usize,
    email: Option<usize>,
    date_of_birth: Option<usize>,
    gender: Option<usize>,
    country: Option<usize>,
    address: Option<usize>,
    receive_news_letters: Option<usize>,
}

enum RowError {
    Invalid(&'static str),
    Service(ServiceError),
}

fn person_request<R: CountryRepository>(
    countries: &CountriesService<R>,
    columns: &PersonColumns,
    row: &[String],
) -> Result<PersonAddRequest, RowError> {
    let date_of_birth = match cell(row, columns.date_of_birth) {
        "" => None,
        value => Some(
            NaiveDate::parse_from_str(value, DATE_FORMAT)
                .map_err(|_| RowError::Invalid("invalid_date_of_birth"))?,
        ),
    };

    let gender = match cell(row, columns.gender) {
        "" => None,
        value => Some(
            value
                .parse::<Gender>()
                .map_err(|_| RowError::Invalid("invalid_gender"))?,
        ),
    };

    let country_id = match cell(row, columns.country) {
        "" => None,
        name => countries
            .find_country_by_name(name)
            .map_err(RowError::Service)?
            .map(|country| country.country_id),
    };

    let receive_news_letters = parse_flag(cell(row, columns.receive_news_letters))
        .ok_or(RowError::Invalid("invalid_receive_news_letters"))?;

    Ok(PersonAddRequest {
        person_name: optional_text(cell(row, Some(columns.name))),
        email: optional_text(cell(row, columns.email)),
        date_of_birth,
        gender,
        country_id,
        address: optional_text(cell(row, columns.address)),
        receive_news_letters,
    })
}

fn optional_text(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "" | "false" | "no" | "0" => Some(false),
        "true" | "yes" | "1" => Some(true),
        _ => None,
    }
}
