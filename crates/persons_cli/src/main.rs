//! Command-line front end for the persons/countries directory.
//!
//! # Responsibility
//! - Parse arguments and resolve configuration and database location.
//! - Delegate every operation to `persons_core` services.
//! - Print JSON for record views and plain text for counts.

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use persons_core::db::{open_db, open_db_in_memory, seed_sample_data};
use persons_core::{
    ensure_xlsx_upload, import_countries_from_excel, import_persons_from_excel, init_logging,
    is_search_field, persons_to_csv, persons_to_excel, AppConfig, CountriesService,
    CountryAddRequest, CountryId, CountryRepository, Gender, ImportSummary, PersonAddRequest,
    PersonId, PersonRepository, PersonsService, SortOrder, SqliteCountryRepository,
    SqlitePersonRepository, SEARCH_FIELDS,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "persons")]
#[command(about = "Manage a directory of persons and countries", version)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file; overrides `database.path` from the config.
    /// Without either, an in-memory database is used.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Insert sample countries and persons into an empty database
    Seed,
    /// Country operations
    #[command(subcommand)]
    Countries(CountriesCommand),
    /// Person operations
    #[command(subcommand)]
    Persons(PersonsCommand),
}

#[derive(Subcommand)]
enum CountriesCommand {
    /// Add a country by name
    Add { name: String },
    /// List every country
    List,
    /// Bulk-add countries from the `CountryName` column of an xlsx file
    Import { file: PathBuf },
}

#[derive(Subcommand)]
enum PersonsCommand {
    /// Add a person
    Add(PersonArgs),
    /// List persons, optionally filtered and sorted
    List(ListArgs),
    /// Show one person
    Get { id: PersonId },
    /// Replace fields of an existing person; omitted fields keep their value
    Update {
        id: PersonId,
        #[command(flatten)]
        fields: PersonArgs,
    },
    /// Delete one person
    Delete { id: PersonId },
    /// Bulk-add persons from an xlsx file
    Import { file: PathBuf },
    /// List the field ids accepted by `list --search-by`
    SearchFields,
    /// Write every person to a CSV or xlsx file
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Args)]
struct PersonArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    /// Date of birth as yyyy-mm-dd
    #[arg(long)]
    dob: Option<NaiveDate>,
    /// Male, Female or Other
    #[arg(long)]
    gender: Option<Gender>,
    /// Country name; must already exist
    #[arg(long)]
    country: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    news_letters: Option<bool>,
}

#[derive(Args)]
struct ListArgs {
    /// Field to search in; see `persons search-fields`
    #[arg(long, value_parser = parse_search_field)]
    search_by: Option<String>,
    /// Text the field must contain
    #[arg(long)]
    search: Option<String>,
    /// Field to sort by
    #[arg(long, default_value = "PersonName")]
    sort_by: String,
    /// ASC or DESC
    #[arg(long, default_value_t = SortOrder::Asc)]
    order: SortOrder,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Xlsx,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("failed to load config `{}`", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(dir) = &config.logging.dir {
        init_logging(&config.logging.level, dir)
            .context("failed to initialize logging")?;
    }

    let conn = match cli.db.as_ref().or(config.database.path.as_ref()) {
        Some(path) => open_db(path)
            .with_context(|| format!("failed to open database `{}`", path.display()))?,
        None => open_db_in_memory()?,
    };

    match cli.command {
        Command::Seed => {
            let inserted = seed_sample_data(&conn)?;
            println!("inserted {inserted} rows");
            Ok(())
        }
        Command::Countries(command) => {
            let country_repo = SqliteCountryRepository::try_new(&conn)?;
            run_countries(&CountriesService::new(&country_repo), command)
        }
        Command::Persons(command) => {
            let country_repo = SqliteCountryRepository::try_new(&conn)?;
            let person_repo = SqlitePersonRepository::try_new(&conn)?;
            let persons = PersonsService::new(&person_repo, CountriesService::new(&country_repo));
            run_persons(&persons, command)
        }
    }
}

fn parse_search_field(value: &str) -> Result<String, String> {
    if is_search_field(value) {
        return Ok(value.to_string());
    }
    let known: Vec<&str> = SEARCH_FIELDS.iter().map(|(id, _)| *id).collect();
    Err(format!("expected one of {}", known.join(", ")))
}

fn run_countries<R: CountryRepository>(
    countries: &CountriesService<R>,
    command: CountriesCommand,
) -> anyhow::Result<()> {
    match command {
        CountriesCommand::Add { name } => {
            let added = countries.add_country(Some(&CountryAddRequest::new(name)))?;
            print_json(&added)
        }
        CountriesCommand::List => print_json(&countries.get_all_countries()?),
        CountriesCommand::Import { file } => {
            let bytes = read_upload(&file)?;
            let summary = import_countries_from_excel(countries, &bytes)?;
            print_summary(summary);
            Ok(())
        }
    }
}

fn run_persons<P: PersonRepository, C: CountryRepository>(
    persons: &PersonsService<P, C>,
    command: PersonsCommand,
) -> anyhow::Result<()> {
    match command {
        PersonsCommand::Add(fields) => {
            let request = PersonAddRequest {
                person_name: fields.name,
                email: fields.email,
                date_of_birth: fields.dob,
                gender: fields.gender,
                country_id: resolve_country(persons.countries(), fields.country.as_deref())?,
                address: fields.address,
                receive_news_letters: fields.news_letters.unwrap_or(false),
            };
            print_json(&persons.add_person(Some(&request))?)
        }
        PersonsCommand::List(args) => {
            let filtered =
                persons.get_filtered_persons(args.search_by.as_deref(), args.search.as_deref())?;
            let sorted = persons.get_sorted_persons(filtered, Some(&args.sort_by), args.order);
            print_json(&sorted)
        }
        PersonsCommand::Get { id } => match persons.get_person_by_id(Some(id))? {
            Some(person) => print_json(&person),
            None => bail!("person {id} not found"),
        },
        PersonsCommand::Update { id, fields } => {
            let Some(current) = persons.get_person_by_id(Some(id))? else {
                bail!("person {id} not found");
            };
            let mut request = current.to_update_request();
            if let Some(name) = fields.name {
                request.person_name = Some(name);
            }
            if let Some(email) = fields.email {
                request.email = Some(email);
            }
            if let Some(dob) = fields.dob {
                request.date_of_birth = Some(dob);
            }
            if let Some(gender) = fields.gender {
                request.gender = Some(gender);
            }
            if fields.country.is_some() {
                request.country_id =
                    resolve_country(persons.countries(), fields.country.as_deref())?;
            }
            if let Some(address) = fields.address {
                request.address = Some(address);
            }
            if let Some(flag) = fields.news_letters {
                request.receive_news_letters = flag;
            }
            print_json(&persons.update_person(Some(&request))?)
        }
        PersonsCommand::Delete { id } => {
            if persons.delete_person(Some(id))? {
                println!("deleted {id}");
            } else {
                println!("person {id} not found");
            }
            Ok(())
        }
        PersonsCommand::Import { file } => {
            let bytes = read_upload(&file)?;
            let summary = import_persons_from_excel(persons, &bytes)?;
            print_summary(summary);
            Ok(())
        }
        PersonsCommand::SearchFields => {
            for (id, label) in SEARCH_FIELDS {
                println!("{id}\t{label}");
            }
            Ok(())
        }
        PersonsCommand::Export { format, out } => {
            let all = persons.get_all_persons()?;
            let bytes = match format {
                ExportFormat::Csv => persons_to_csv(&all)?,
                ExportFormat::Xlsx => persons_to_excel(&all)?,
            };
            std::fs::write(&out, bytes)
                .with_context(|| format!("failed to write `{}`", out.display()))?;
            info!(
                "event=persons_export module=cli status=ok path={}",
                out.display()
            );
            println!("exported {} persons to {}", all.len(), out.display());
            Ok(())
        }
    }
}

fn resolve_country<R: CountryRepository>(
    countries: &CountriesService<R>,
    name: Option<&str>,
) -> anyhow::Result<Option<CountryId>> {
    let Some(name) = name else {
        return Ok(None);
    };
    match countries.find_country_by_name(name)? {
        Some(country) => Ok(Some(country.country_id)),
        None => bail!("country `{name}` does not exist"),
    }
}

fn read_upload(path: &Path) -> anyhow::Result<Vec<u8>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read `{}`", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    ensure_xlsx_upload(&file_name, &bytes)?;
    Ok(bytes)
}

fn print_summary(summary: ImportSummary) {
    println!("inserted {}, skipped {}", summary.inserted, summary.skipped);
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
