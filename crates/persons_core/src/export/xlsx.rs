//! Minimal single-sheet `.xlsx` writer.
//!
//! Cells are written as inline strings; no shared-string table or styles
//! part is emitted.

use super::{person_cells, ExportResult, PERSON_EXPORT_HEADERS};
use crate::model::person::PersonResponse;
use log::info;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

/// Renders `persons` as a single-sheet workbook named `Persons`.
pub fn persons_to_excel(persons: &[PersonResponse]) -> ExportResult<Vec<u8>> {
    let rows: Vec<Vec<String>> = persons.iter().map(person_cells).collect();
    let bytes = write_workbook("Persons", PERSON_EXPORT_HEADERS, &rows)?;
    info!(
        "event=persons_export module=export status=ok format=xlsx rows={}",
        persons.len()
    );
    Ok(bytes)
}

/// Writes one worksheet with a header row followed by `rows`.
///
/// Empty cells are omitted from the sheet.
pub fn write_workbook(
    sheet_name: &str,
    headers: &[&str],
    rows: &[Vec<String>],
) -> ExportResult<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES_XML.as_bytes())?;
    zip.start_file("_rels/.rels", options)?;
    zip.write_all(ROOT_RELS_XML.as_bytes())?;
    zip.start_file("xl/workbook.xml", options)?;
    zip.write_all(workbook_xml(sheet_name).as_bytes())?;
    zip.start_file("xl/_rels/workbook.xml.rels", options)?;
    zip.write_all(WORKBOOK_RELS_XML.as_bytes())?;
    zip.start_file("xl/worksheets/sheet1.xml", options)?;
    zip.write_all(sheet_xml(headers, rows).as_bytes())?;

    Ok(zip.finish()?.into_inner())
}

fn workbook_xml(sheet_name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        escape_xml(sheet_name)
    )
}

fn sheet_xml(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    push_row(&mut xml, 1, headers.iter().copied());
    for (index, row) in rows.iter().enumerate() {
        push_row(&mut xml, index + 2, row.iter().map(String::as_str));
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn push_row<'a>(xml: &mut String, row_number: usize, cells: impl Iterator<Item = &'a str>) {
    xml.push_str(&format!(r#"<row r="{row_number}">"#));
    for (column, value) in cells.enumerate() {
        if value.is_empty() {
            continue;
        }
        xml.push_str(&format!(
            r#"<c r="{}{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
            column_name(column),
            row_number,
            escape_xml(value)
        ));
    }
    xml.push_str("</row>");
}

/// Spreadsheet column letters for a zero-based index (`0 -> A`, `26 -> AA`).
fn column_name(index: usize) -> String {
    let mut name = Vec::new();
    let mut remaining = index + 1;
    while remaining > 0 {
        let offset = (remaining - 1) % 26;
        name.push(b'A' + offset as u8);
        remaining = (remaining - 1) / 26;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
