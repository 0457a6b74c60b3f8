use super::{person_cells, ExportResult, PERSON_EXPORT_HEADERS};
use crate::model::person::PersonResponse;
use log::info;

/// Renders `persons` as CSV with a header row.
pub fn persons_to_csv(persons: &[PersonResponse]) -> ExportResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(PERSON_EXPORT_HEADERS)?;
    for person in persons {
        writer.write_record(person_cells(person))?;
    }
    writer.flush()?;
    let bytes = writer
        .into_inner()
        .map_err(|err| std::io::Error::other(err.to_string()))?;

    info!(
        "event=persons_export module=export status=ok format=csv rows={}",
        persons.len()
    );
    Ok(bytes)
}
