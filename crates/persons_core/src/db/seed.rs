//! Sample directory content for demos and manual testing.

use super::DbResult;
use log::info;
use rusqlite::{params, Connection};

const SAMPLE_COUNTRIES: &[(&str, &str)] = &[
    ("0c5b9025-a178-422f-9772-b83cf42f3fba", "USA"),
    ("148fecc0-f5aa-43a1-9744-1da4289c7a5a", "Australia"),
    ("206418e0-f767-4689-bac9-b0aa7696e60a", "Canada"),
    ("b7d4a259-c1df-42a1-b9cb-1d833d1580a3", "UK"),
    ("f7f1e057-cc8d-4c34-b03f-32387397daa2", "India"),
];

struct SamplePerson {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    date_of_birth: &'static str,
    gender: &'static str,
    country_id: &'static str,
    address: &'static str,
    receive_news_letters: bool,
}

const SAMPLE_PERSONS: &[SamplePerson] = &[
    SamplePerson {
        id: "2f4322b9-d231-4d6c-89da-eb0821467fbb",
        name: "Tory Oventon",
        email: "toventon0@ucla.edu",
        date_of_birth: "2009-09-11",
        gender: "Female",
        country_id: "0c5b9025-a178-422f-9772-b83cf42f3fba",
        address: "Apt 841",
        receive_news_letters: true,
    },
    SamplePerson {
        id: "a116271c-7443-4323-84c5-d41ba2d96be9",
        name: "Rosy Hessay",
        email: "rhessay1@jalbum.net",
        date_of_birth: "1997-12-24",
        gender: "Female",
        country_id: "148fecc0-f5aa-43a1-9744-1da4289c7a5a",
        address: "6th Floor",
        receive_news_letters: false,
    },
    SamplePerson {
        id: "3b372230-d9b4-4952-99f4-3e9369fa0db4",
        name: "Holly Fishlee",
        email: "hfishlee2@ucoz.com",
        date_of_birth: "1992-11-14",
        gender: "Male",
        country_id: "f7f1e057-cc8d-4c34-b03f-32387397daa2",
        address: "PO Box 5286",
        receive_news_letters: true,
    },
    SamplePerson {
        id: "b0da6468-792d-4649-b1dd-62d6f9c22735",
        name: "Teresita Palleske",
        email: "tpalleske3@weibo.com",
        date_of_birth: "2015-12-18",
        gender: "Other",
        country_id: "206418e0-f767-4689-bac9-b0aa7696e60a",
        address: "Room 861",
        receive_news_letters: true,
    },
    SamplePerson {
        id: "b4e88afa-ba23-4861-bc66-2deebc899239",
        name: "Brana Yarrow",
        email: "byarrow4@utexas.edu",
        date_of_birth: "2013-09-15",
        gender: "Female",
        country_id: "f7f1e057-cc8d-4c34-b03f-32387397daa2",
        address: "2nd Floor",
        receive_news_letters: true,
    },
    SamplePerson {
        id: "3cd4ad95-b7d4-43a9-b1a8-c09a3ffe8612",
        name: "Nicola McCullen",
        email: "nmccullen5@national.com",
        date_of_birth: "2024-04-17",
        gender: "Female",
        country_id: "206418e0-f767-4689-bac9-b0aa7696e60a",
        address: "Suite 59",
        receive_news_letters: false,
    },
    SamplePerson {
        id: "0ecabf09-8d29-4cab-9593-ffda5c1016f0",
        name: "Peyter Harman",
        email: "pharman4@github.com",
        date_of_birth: "1995-08-02",
        gender: "Male",
        country_id: "148fecc0-f5aa-43a1-9744-1da4289c7a5a",
        address: "PO Box 53534",
        receive_news_letters: false,
    },
    SamplePerson {
        id: "1884cf5f-9cac-4d2e-8407-ae688f39adc8",
        name: "Erroll Thoma",
        email: "ethoma6@mozilla.com",
        date_of_birth: "2006-07-17",
        gender: "Male",
        country_id: "206418e0-f767-4689-bac9-b0aa7696e60a",
        address: "Room 1638",
        receive_news_letters: false,
    },
    SamplePerson {
        id: "b32c879f-c578-4f6f-b6a6-de5069ae2f4b",
        name: "Serge Ewebank",
        email: "sewebank7@blogs.com",
        date_of_birth: "2003-10-03",
        gender: "Male",
        country_id: "0c5b9025-a178-422f-9772-b83cf42f3fba",
        address: "Apt 1481",
        receive_news_letters: true,
    },
    SamplePerson {
        id: "47f724a7-7851-46f5-8b1c-c3f3b9d29eb9",
        name: "Boothe Chiverton",
        email: "bchiverton2@ucsd.edu",
        date_of_birth: "1990-04-06",
        gender: "Other",
        country_id: "b7d4a259-c1df-42a1-b9cb-1d833d1580a3",
        address: "5th Floor",
        receive_news_letters: true,
    },
];

/// Inserts the sample countries and persons into a migrated database.
///
/// Returns the number of inserted rows (countries + persons). Does nothing
/// and returns `0` when any country already exists.
pub fn seed_sample_data(conn: &Connection) -> DbResult<usize> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM countries;", [], |row| row.get(0))?;
    if existing > 0 {
        info!("event=db_seed module=db status=skipped reason=not_empty");
        return Ok(0);
    }

    let tx = conn.unchecked_transaction()?;
    let mut inserted = 0;
    for (id, name) in SAMPLE_COUNTRIES {
        inserted += tx.execute(
            "INSERT INTO countries (country_id, country_name) VALUES (?1, ?2);",
            params![id, name],
        )?;
    }
    for person in SAMPLE_PERSONS {
        inserted += tx.execute(
            "INSERT INTO persons (
                person_id,
                person_name,
                email,
                date_of_birth,
                gender,
                country_id,
                address,
                receive_news_letters
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                person.id,
                person.name,
                person.email,
                person.date_of_birth,
                person.gender,
                person.country_id,
                person.address,
                i64::from(person.receive_news_letters),
            ],
        )?;
    }
    tx.commit()?;

    info!("event=db_seed module=db status=ok rows={inserted}");
    Ok(inserted)
}
