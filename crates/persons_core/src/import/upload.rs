use super::{ImportError, ImportResult};
use std::path::Path;

/// Rejects empty uploads and file names without an `.xlsx` extension.
pub fn ensure_xlsx_upload(file_name: &str, bytes: &[u8]) -> ImportResult<()> {
    if bytes.is_empty() {
        return Err(ImportError::EmptyUpload);
    }

    let is_xlsx = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
    if !is_xlsx {
        return Err(ImportError::UnsupportedFile(file_name.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ensure_xlsx_upload;
    use crate::import::ImportError;

    #[test]
    fn accepts_xlsx_in_any_case() {
        assert!(ensure_xlsx_upload("countries.XLSX", b"PK").is_ok());
        assert!(ensure_xlsx_upload("dir/countries.xlsx", b"PK").is_ok());
    }

    #[test]
    fn rejects_other_extensions_and_empty_uploads() {
        assert!(matches!(
            ensure_xlsx_upload("countries.csv", b"a,b"),
            Err(ImportError::UnsupportedFile(_))
        ));
        assert!(matches!(
            ensure_xlsx_upload("countries", b"PK"),
            Err(ImportError::UnsupportedFile(_))
        ));
        assert!(matches!(
            ensure_xlsx_upload("countries.xlsx", b""),
            Err(ImportError::EmptyUpload)
        ));
    }
}
