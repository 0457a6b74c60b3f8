use persons_core::db::open_db_in_memory;
use persons_core::{
    CountriesService, Country, CountryAddRequest, CountryId, CountryRepository, CountryResponse,
    InMemoryCountryRepository, RepoResult, ServiceError, SqliteCountryRepository,
};
use uuid::Uuid;

#[test]
fn add_country_rejects_null_request() {
    let conn = open_db_in_memory().unwrap();
    let service = CountriesService::new(SqliteCountryRepository::try_new(&conn).unwrap());

    let err = service.add_country(None).unwrap_err();
    assert!(matches!(err, ServiceError::NullRequest(_)));
}

#[test]
fn add_country_rejects_null_or_empty_name() {
    let conn = open_db_in_memory().unwrap();
    let service = CountriesService::new(SqliteCountryRepository::try_new(&conn).unwrap());

    let null_name = CountryAddRequest { country_name: None };
    let err = service.add_country(Some(&null_name)).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));
    assert!(err.is_argument_error());

    let empty_name = CountryAddRequest::new("");
    let err = service.add_country(Some(&empty_name)).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));

    assert!(service.get_all_countries().unwrap().is_empty());
}

#[test]
fn add_country_rejects_duplicate_name_and_keeps_one_record() {
    let conn = open_db_in_memory().unwrap();
    let service = CountriesService::new(SqliteCountryRepository::try_new(&conn).unwrap());

    service
        .add_country(Some(&CountryAddRequest::new("USA")))
        .unwrap();
    let err = service
        .add_country(Some(&CountryAddRequest::new("USA")))
        .unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateName(ref name) if name == "USA"));
    assert!(err.is_argument_error());

    let all = service.get_all_countries().unwrap();
    assert_eq!(all.len(), 1);
}

#[test]
fn country_name_uniqueness_is_case_sensitive() {
    let conn = open_db_in_memory().unwrap();
    let service = CountriesService::new(SqliteCountryRepository::try_new(&conn).unwrap());

    service
        .add_country(Some(&CountryAddRequest::new("India")))
        .unwrap();
    service
        .add_country(Some(&CountryAddRequest::new("india")))
        .unwrap();

    assert_eq!(service.get_all_countries().unwrap().len(), 2);
}

#[test]
fn add_country_with_proper_name_is_listed() {
    let conn = open_db_in_memory().unwrap();
    let service = CountriesService::new(SqliteCountryRepository::try_new(&conn).unwrap());

    let added = service
        .add_country(Some(&CountryAddRequest::new("Japan")))
        .unwrap();
    assert!(!added.country_id.is_nil());
    assert_eq!(added.country_name, "Japan");

    let all = service.get_all_countries().unwrap();
    assert!(all.contains(&added));
}

#[test]
fn get_all_countries_is_empty_by_default_and_keeps_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let service = CountriesService::new(SqliteCountryRepository::try_new(&conn).unwrap());
    assert!(service.get_all_countries().unwrap().is_empty());

    let names = ["USA", "Canada", "Australia"];
    for name in names {
        service
            .add_country(Some(&CountryAddRequest::new(name)))
            .unwrap();
    }

    let listed: Vec<String> = service
        .get_all_countries()
        .unwrap()
        .into_iter()
        .map(|country| country.country_name)
        .collect();
    assert_eq!(listed, names);
}

#[test]
fn get_country_by_id_handles_absent_unknown_and_known_ids() {
    let conn = open_db_in_memory().unwrap();
    let service = CountriesService::new(SqliteCountryRepository::try_new(&conn).unwrap());

    assert!(service.get_country_by_id(None).unwrap().is_none());
    assert!(service
        .get_country_by_id(Some(Uuid::new_v4()))
        .unwrap()
        .is_none());

    let added = service
        .add_country(Some(&CountryAddRequest::new("China")))
        .unwrap();
    let fetched = service
        .get_country_by_id(Some(added.country_id))
        .unwrap()
        .unwrap();
    assert_eq!(fetched, added);
}

#[test]
fn find_country_by_name_matches_exactly() {
    let repo = InMemoryCountryRepository::new();
    let service = CountriesService::new(&repo);
    let added = service
        .add_country(Some(&CountryAddRequest::new("UK")))
        .unwrap();

    assert_eq!(service.find_country_by_name("UK").unwrap(), Some(added));
    assert!(service.find_country_by_name("uk").unwrap().is_none());
}

#[test]
fn in_memory_store_enforces_the_same_rules() {
    let repo = InMemoryCountryRepository::new();
    let service = CountriesService::new(&repo);

    service
        .add_country(Some(&CountryAddRequest::new("Brazil")))
        .unwrap();
    let err = service
        .add_country(Some(&CountryAddRequest::new("Brazil")))
        .unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateName(_)));

    assert_eq!(repo.count_by_name("Brazil").unwrap(), 1);
    assert_eq!(repo.list().unwrap().len(), 1);
}

#[test]
fn prepopulated_store_is_visible_through_the_service() {
    let existing = Country {
        country_id: Uuid::new_v4(),
        country_name: "Peru".to_string(),
    };
    let service = CountriesService::new(InMemoryCountryRepository::with_countries(vec![
        existing.clone(),
    ]));

    assert_eq!(
        service.get_all_countries().unwrap(),
        vec![CountryResponse::from(&existing)]
    );
    let err = service
        .add_country(Some(&CountryAddRequest::new("Peru")))
        .unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateName(_)));
}

/// Store whose name count lags behind its writes.
struct StaleCountStore(InMemoryCountryRepository);

impl CountryRepository for StaleCountStore {
    fn insert(&self, country: &Country) -> RepoResult<CountryId> {
        self.0.insert(country)
    }

    fn list(&self) -> RepoResult<Vec<Country>> {
        self.0.list()
    }

    fn find_by_id(&self, id: CountryId) -> RepoResult<Option<Country>> {
        self.0.find_by_id(id)
    }

    fn count_by_name(&self, _name: &str) -> RepoResult<usize> {
        Ok(0)
    }
}

#[test]
fn duplicate_name_rejected_by_the_store_surfaces_as_duplicate_name() {
    let service = CountriesService::new(StaleCountStore(InMemoryCountryRepository::new()));
    service
        .add_country(Some(&CountryAddRequest::new("Kenya")))
        .unwrap();

    let err = service
        .add_country(Some(&CountryAddRequest::new("Kenya")))
        .unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateName(ref name) if name == "Kenya"));
    assert!(err.is_argument_error());
    assert_eq!(service.get_all_countries().unwrap().len(), 1);
}
