use chrono::NaiveDate;
use persons_core::db::open_db_in_memory;
use persons_core::{
    CountriesService, CountryAddRequest, CountryRepository, Gender, InMemoryCountryRepository,
    InMemoryPersonRepository, PersonAddRequest, PersonRepository, PersonResponse, PersonsService,
    ServiceError, SortOrder, SqliteCountryRepository, SqlitePersonRepository,
    DEFAULT_TAX_IDENTIFICATION_NUMBER, SEARCH_FIELDS,
};
use uuid::Uuid;

fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn request(name: &str, email: &str, country_id: Option<Uuid>) -> PersonAddRequest {
    PersonAddRequest {
        person_name: Some(name.to_string()),
        email: Some(email.to_string()),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 7, 15),
        gender: Some(Gender::Male),
        country_id,
        address: Some("sample address".to_string()),
        receive_news_letters: true,
    }
}

fn add_sample_persons<P: PersonRepository, C: CountryRepository>(
    service: &PersonsService<P, C>,
) -> Vec<PersonResponse> {
    let usa = service
        .countries()
        .add_country(Some(&CountryAddRequest::new("USA")))
        .unwrap();
    let india = service
        .countries()
        .add_country(Some(&CountryAddRequest::new("India")))
        .unwrap();

    [
        request("Smith", "smith@example.com", Some(usa.country_id)),
        request("Mary", "mary@example.com", Some(india.country_id)),
        request("rahman", "rahman@example.com", Some(india.country_id)),
        request("John", "john@example.com", None),
    ]
    .iter()
    .map(|req| service.add_person(Some(req)).unwrap())
    .collect()
}

#[test]
fn add_person_rejects_null_request() {
    let persons = InMemoryPersonRepository::new();
    let service = PersonsService::new(
        &persons,
        CountriesService::new(InMemoryCountryRepository::new()),
    );

    let err = service.add_person(None).unwrap_err();
    assert!(matches!(err, ServiceError::NullRequest(_)));
}

#[test]
fn add_person_rejects_null_name_without_storing() {
    let persons = InMemoryPersonRepository::new();
    let service = PersonsService::new(
        &persons,
        CountriesService::new(InMemoryCountryRepository::new()),
    );

    let err = service
        .add_person(Some(&PersonAddRequest::default()))
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));
    assert!(persons.list().unwrap().is_empty());
}

#[test]
fn add_person_accepts_empty_name() {
    let persons = InMemoryPersonRepository::new();
    let service = PersonsService::new(
        &persons,
        CountriesService::new(InMemoryCountryRepository::new()),
    );

    let added = service
        .add_person(Some(&PersonAddRequest {
            person_name: Some(String::new()),
            ..PersonAddRequest::default()
        }))
        .unwrap();
    assert_eq!(added.person_name.as_deref(), Some(""));
}

#[test]
fn add_person_with_full_details_is_listed_with_derived_fields() {
    let conn = open_db_in_memory().unwrap();
    let person_repo = SqlitePersonRepository::try_new(&conn).unwrap();
    let country_repo = SqliteCountryRepository::try_new(&conn).unwrap();
    let service = PersonsService::new(&person_repo, CountriesService::new(&country_repo))
        .with_today(fixed_today);

    let country = service
        .countries()
        .add_country(Some(&CountryAddRequest::new("Canada")))
        .unwrap();
    let added = service
        .add_person(Some(&request(
            "Person name",
            "person@example.com",
            Some(country.country_id),
        )))
        .unwrap();

    assert!(!added.person_id.is_nil());
    assert_eq!(added.country.as_deref(), Some("Canada"));
    assert_eq!(added.age, Some(33));
    assert_eq!(
        added.tax_identification_number.as_deref(),
        Some(DEFAULT_TAX_IDENTIFICATION_NUMBER)
    );
    assert!(service.get_all_persons().unwrap().contains(&added));
}

#[test]
fn dangling_country_reference_has_no_country_name() {
    let persons = InMemoryPersonRepository::new();
    let service = PersonsService::new(
        &persons,
        CountriesService::new(InMemoryCountryRepository::new()),
    );

    let added = service
        .add_person(Some(&request("Ghost", "ghost@example.com", Some(Uuid::new_v4()))))
        .unwrap();
    assert!(added.country_id.is_some());
    assert!(added.country.is_none());
}

#[test]
fn get_person_by_id_handles_absent_unknown_and_known_ids() {
    let persons = InMemoryPersonRepository::new();
    let service = PersonsService::new(
        &persons,
        CountriesService::new(InMemoryCountryRepository::new()),
    );
    let added = add_sample_persons(&service);

    assert!(service.get_person_by_id(None).unwrap().is_none());
    assert!(service
        .get_person_by_id(Some(Uuid::new_v4()))
        .unwrap()
        .is_none());
    assert_eq!(
        service.get_person_by_id(Some(added[1].person_id)).unwrap(),
        Some(added[1].clone())
    );
}

#[test]
fn get_all_persons_is_empty_by_default_and_keeps_insertion_order() {
    let persons = InMemoryPersonRepository::new();
    let service = PersonsService::new(
        &persons,
        CountriesService::new(InMemoryCountryRepository::new()),
    );
    assert!(service.get_all_persons().unwrap().is_empty());

    let added = add_sample_persons(&service);
    assert_eq!(service.get_all_persons().unwrap(), added);
}

#[test]
fn filtered_persons_with_empty_search_text_returns_everyone() {
    let persons = InMemoryPersonRepository::new();
    let service = PersonsService::new(
        &persons,
        CountriesService::new(InMemoryCountryRepository::new()),
    );
    let added = add_sample_persons(&service);

    let filtered = service
        .get_filtered_persons(Some("PersonName"), Some(""))
        .unwrap();
    assert_eq!(filtered, added);

    let unknown_field = service
        .get_filtered_persons(Some("Nickname"), Some("ma"))
        .unwrap();
    assert_eq!(unknown_field, added);
}

/// Adds `full` with every field set, `blank` with every searchable field
/// empty, and `partial` with a different value in each field.
fn add_sparse_persons<P: PersonRepository, C: CountryRepository>(
    service: &PersonsService<P, C>,
) -> Vec<PersonResponse> {
    let india = service
        .countries()
        .add_country(Some(&CountryAddRequest::new("India")))
        .unwrap();
    let brazil = service
        .countries()
        .add_country(Some(&CountryAddRequest::new("Brazil")))
        .unwrap();

    let full = PersonAddRequest {
        person_name: Some("full".to_string()),
        email: Some("full@x.io".to_string()),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 1),
        gender: Some(Gender::Male),
        country_id: Some(india.country_id),
        address: Some("12 Main St".to_string()),
        receive_news_letters: true,
    };
    let blank = PersonAddRequest {
        person_name: Some(String::new()),
        email: Some(String::new()),
        address: Some(String::new()),
        ..PersonAddRequest::default()
    };
    let partial = PersonAddRequest {
        person_name: Some("partial".to_string()),
        email: Some("partial@y.org".to_string()),
        date_of_birth: NaiveDate::from_ymd_opt(1985, 11, 20),
        gender: Some(Gender::Female),
        country_id: Some(brazil.country_id),
        address: Some("Elm road".to_string()),
        receive_news_letters: false,
    };

    [full, blank, partial]
        .iter()
        .map(|req| service.add_person(Some(req)).unwrap())
        .collect()
}

fn person_names(persons: &[PersonResponse]) -> Vec<&str> {
    persons
        .iter()
        .filter_map(|p| p.person_name.as_deref())
        .collect()
}

#[test]
fn empty_search_text_returns_everyone_for_every_search_field() {
    let persons = InMemoryPersonRepository::new();
    let service = PersonsService::new(
        &persons,
        CountriesService::new(InMemoryCountryRepository::new()),
    );
    add_sparse_persons(&service);
    let all = service.get_all_persons().unwrap();

    for (field, _) in SEARCH_FIELDS {
        let filtered = service.get_filtered_persons(Some(*field), Some("")).unwrap();
        assert_eq!(filtered, all, "{field}");

        let filtered = service.get_filtered_persons(Some(*field), None).unwrap();
        assert_eq!(filtered, all, "{field}");
    }
}

#[test]
fn filtered_persons_by_email_and_address_pass_empty_values_through() {
    let persons = InMemoryPersonRepository::new();
    let service = PersonsService::new(
        &persons,
        CountriesService::new(InMemoryCountryRepository::new()),
    );
    add_sparse_persons(&service);

    let cases = [
        ("Email", "X.IO", vec!["full", ""]),
        ("Email", "@y", vec!["", "partial"]),
        ("Address", "MAIN", vec!["full", ""]),
        ("Address", "road", vec!["", "partial"]),
        ("DateOfBirth", "1985-11", vec!["", "partial"]),
        ("CountryID", "INDIA", vec!["full", ""]),
        ("Gender", "female", vec!["", "partial"]),
        ("PersonName", "PART", vec!["", "partial"]),
    ];
    for (field, text, expected) in cases {
        let filtered = service.get_filtered_persons(Some(field), Some(text)).unwrap();
        assert_eq!(person_names(&filtered), expected, "{field} ~ {text}");
    }
}

#[test]
fn sorted_persons_by_each_field_in_both_directions() {
    let persons = InMemoryPersonRepository::new();
    let service = PersonsService::new(
        &persons,
        CountriesService::new(InMemoryCountryRepository::new()),
    );
    add_sparse_persons(&service);

    // `blank` has empty text and no date, gender or country.
    let cases = [
        ("Email", vec!["", "full", "partial"]),
        ("Address", vec!["", "full", "partial"]),
        ("Gender", vec!["", "partial", "full"]),
        ("Country", vec!["", "partial", "full"]),
        ("DateOfBirth", vec!["", "partial", "full"]),
    ];
    for (field, ascending) in cases {
        let all = service.get_all_persons().unwrap();
        let sorted = service.get_sorted_persons(all, Some(field), SortOrder::Asc);
        assert_eq!(person_names(&sorted), ascending, "{field} ASC");

        let all = service.get_all_persons().unwrap();
        let sorted = service.get_sorted_persons(all, Some(field), SortOrder::Desc);
        let descending: Vec<&str> = ascending.iter().rev().copied().collect();
        assert_eq!(person_names(&sorted), descending, "{field} DESC");
    }
}

#[test]
fn filtered_persons_by_name_match_case_insensitively() {
    let persons = InMemoryPersonRepository::new();
    let service = PersonsService::new(
        &persons,
        CountriesService::new(InMemoryCountryRepository::new()),
    );
    add_sample_persons(&service);

    let filtered = service
        .get_filtered_persons(Some("PersonName"), Some("ma"))
        .unwrap();
    let names: Vec<&str> = filtered
        .iter()
        .filter_map(|p| p.person_name.as_deref())
        .collect();

    assert_eq!(names, vec!["Mary", "rahman"]);
    for person in &filtered {
        let name = person.person_name.as_deref().unwrap();
        assert!(name.to_lowercase().contains("ma"));
    }
}

#[test]
fn filtered_persons_by_country_match_the_country_name() {
    let persons = InMemoryPersonRepository::new();
    let service = PersonsService::new(
        &persons,
        CountriesService::new(InMemoryCountryRepository::new()),
    );
    add_sample_persons(&service);

    let filtered = service
        .get_filtered_persons(Some("CountryID"), Some("ind"))
        .unwrap();
    let names: Vec<&str> = filtered
        .iter()
        .filter_map(|p| p.person_name.as_deref())
        .collect();

    // John has no country and passes through.
    assert_eq!(names, vec!["Mary", "rahman", "John"]);
}

#[test]
fn sorted_persons_descending_by_name() {
    let persons = InMemoryPersonRepository::new();
    let service = PersonsService::new(
        &persons,
        CountriesService::new(InMemoryCountryRepository::new()),
    );
    add_sample_persons(&service);

    let all = service.get_all_persons().unwrap();
    let sorted = service.get_sorted_persons(all.clone(), Some("PersonName"), SortOrder::Desc);
    assert_eq!(sorted.len(), all.len());

    let names: Vec<&str> = sorted
        .iter()
        .filter_map(|p| p.person_name.as_deref())
        .collect();
    assert_eq!(names, vec!["Smith", "rahman", "Mary", "John"]);

    for pair in sorted.windows(2) {
        let left = pair[0].person_name.as_deref().unwrap().to_uppercase();
        let right = pair[1].person_name.as_deref().unwrap().to_uppercase();
        assert!(left >= right);
    }
}

#[test]
fn sorted_persons_with_unknown_field_keep_input_order() {
    let persons = InMemoryPersonRepository::new();
    let service = PersonsService::new(
        &persons,
        CountriesService::new(InMemoryCountryRepository::new()),
    );
    let added = add_sample_persons(&service);

    let sorted = service.get_sorted_persons(added.clone(), Some("Height"), SortOrder::Asc);
    assert_eq!(sorted, added);
    let sorted = service.get_sorted_persons(added.clone(), None, SortOrder::Desc);
    assert_eq!(sorted, added);
}

#[test]
fn update_person_rejects_null_request() {
    let persons = InMemoryPersonRepository::new();
    let service = PersonsService::new(
        &persons,
        CountriesService::new(InMemoryCountryRepository::new()),
    );

    let err = service.update_person(None).unwrap_err();
    assert!(matches!(err, ServiceError::NullRequest(_)));
}

#[test]
fn update_person_with_unknown_id_returns_not_found() {
    let persons = InMemoryPersonRepository::new();
    let service = PersonsService::new(
        &persons,
        CountriesService::new(InMemoryCountryRepository::new()),
    );
    let added = add_sample_persons(&service);

    let mut update = added[0].to_update_request();
    update.person_id = Uuid::new_v4();
    let err = service.update_person(Some(&update)).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(id) if id == update.person_id));
    assert!(err.is_argument_error());
}

#[test]
fn update_person_with_null_name_leaves_record_unchanged() {
    let persons = InMemoryPersonRepository::new();
    let service = PersonsService::new(
        &persons,
        CountriesService::new(InMemoryCountryRepository::new()),
    );
    let added = add_sample_persons(&service);

    let mut update = added[0].to_update_request();
    update.person_name = None;
    update.email = Some("changed@example.com".to_string());
    let err = service.update_person(Some(&update)).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));

    let stored = service
        .get_person_by_id(Some(added[0].person_id))
        .unwrap()
        .unwrap();
    assert_eq!(stored, added[0]);
}

#[test]
fn update_person_replaces_fields_and_keeps_tax_identification_number() {
    let conn = open_db_in_memory().unwrap();
    let person_repo = SqlitePersonRepository::try_new(&conn).unwrap();
    let country_repo = SqliteCountryRepository::try_new(&conn).unwrap();
    let service = PersonsService::new(&person_repo, CountriesService::new(&country_repo));
    let added = add_sample_persons(&service);

    let mut update = added[0].to_update_request();
    update.person_name = Some("William".to_string());
    update.email = Some("william@example.com".to_string());
    update.country_id = None;
    update.receive_news_letters = false;

    let updated = service.update_person(Some(&update)).unwrap();
    assert_eq!(updated.person_id, added[0].person_id);
    assert_eq!(updated.person_name.as_deref(), Some("William"));
    assert_eq!(updated.email.as_deref(), Some("william@example.com"));
    assert!(updated.country.is_none());
    assert!(!updated.receive_news_letters);
    assert_eq!(
        updated.tax_identification_number,
        added[0].tax_identification_number
    );

    let stored = service
        .get_person_by_id(Some(added[0].person_id))
        .unwrap()
        .unwrap();
    assert_eq!(stored, updated);
}

#[test]
fn delete_person_reports_whether_a_person_was_removed() {
    let conn = open_db_in_memory().unwrap();
    let person_repo = SqlitePersonRepository::try_new(&conn).unwrap();
    let country_repo = SqliteCountryRepository::try_new(&conn).unwrap();
    let service = PersonsService::new(&person_repo, CountriesService::new(&country_repo));
    let added = add_sample_persons(&service);

    assert!(service.delete_person(Some(added[2].person_id)).unwrap());
    assert!(service
        .get_person_by_id(Some(added[2].person_id))
        .unwrap()
        .is_none());
    assert_eq!(service.get_all_persons().unwrap().len(), added.len() - 1);

    assert!(!service.delete_person(Some(Uuid::new_v4())).unwrap());
    assert_eq!(service.get_all_persons().unwrap().len(), added.len() - 1);
}

#[test]
fn delete_person_rejects_absent_id() {
    let persons = InMemoryPersonRepository::new();
    let service = PersonsService::new(
        &persons,
        CountriesService::new(InMemoryCountryRepository::new()),
    );

    let err = service.delete_person(None).unwrap_err();
    assert!(matches!(err, ServiceError::NullArgument(_)));
}

#[test]
fn person_response_serializes_derived_fields() {
    let persons = InMemoryPersonRepository::new();
    let service = PersonsService::new(
        &persons,
        CountriesService::new(InMemoryCountryRepository::new()),
    )
    .with_today(fixed_today);
    let country = service
        .countries()
        .add_country(Some(&CountryAddRequest::new("Japan")))
        .unwrap();
    let added = service
        .add_person(Some(&request("Ken", "ken@example.com", Some(country.country_id))))
        .unwrap();

    let json = serde_json::to_value(&added).unwrap();
    assert_eq!(json["country"], "Japan");
    assert_eq!(json["age"], 33);
    assert_eq!(json["gender"], "Male");
    assert_eq!(json["date_of_birth"], "1990-07-15");
    assert_eq!(json["tax_identification_number"], DEFAULT_TAX_IDENTIFICATION_NUMBER);
}

#[test]
fn prepopulated_person_store_is_visible_through_the_service() {
    let stored = PersonAddRequest {
        person_name: Some("Seeded".to_string()),
        ..PersonAddRequest::default()
    }
    .to_person();
    let persons = InMemoryPersonRepository::with_persons(vec![stored.clone()]);
    let service = PersonsService::new(
        &persons,
        CountriesService::new(InMemoryCountryRepository::new()),
    );

    let listed = service.get_all_persons().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].person_id, stored.person_id);
    assert_eq!(listed[0].person_name.as_deref(), Some("Seeded"));
}
