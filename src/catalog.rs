//! CSV catalog loading.
//!
//! The first row supplies the column names. Rows may be shorter or longer
//! than the header; missing cells are simply absent from the record.

use csv::ReaderBuilder;
use std::path::Path;

use crate::error::CatalogError;
use crate::record::FirmwareRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Firmware,
    FtpMirror,
}

impl CatalogKind {
    pub fn label(self) -> &'static str {
        match self {
            CatalogKind::Firmware => "firmware",
            CatalogKind::FtpMirror => "FTP mirror",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CatalogKind::Firmware => "Main firmware download list",
            CatalogKind::FtpMirror => "FTP firmware list",
        }
    }
}

pub fn load_catalog(path: &Path) -> Result<Vec<FirmwareRecord>, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let read_failure = |source: csv::Error| CatalogError::ReadFailure {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(read_failure)?;
    let headers = reader.headers().map_err(read_failure)?.clone();

    let mut records: Vec<FirmwareRecord> = Vec::new();
    for row in reader.records() {
        let row = row.map_err(read_failure)?;
        records.push(headers.iter().zip(row.iter()).collect());
    }
    Ok(records)
}

/// Loads a catalog, reporting failures through the log and degrading to an
/// empty sequence instead of propagating them.
pub fn load_or_report(path: &Path, kind: CatalogKind) -> Vec<FirmwareRecord> {
    match load_catalog(path) {
        Ok(records) => {
            tracing::info!(
                "Loaded {} {} entries from {}",
                records.len(),
                kind.label(),
                path.display()
            );
            records
        }
        Err(err @ CatalogError::MissingFile { .. }) => {
            tracing::error!(catalog = kind.label(), path = %err.path().display(), "{err}");
            if let Ok(cwd) = std::env::current_dir() {
                tracing::debug!("current working directory: {}", cwd.display());
            }
            Vec::new()
        }
        Err(err) => {
            tracing::error!(catalog = kind.label(), path = %err.path().display(), "{err}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "fw_filter_catalog_test_{}_{}_{}",
            std::process::id(),
            nanos,
            name
        ))
    }

    #[test]
    fn load_catalog_uses_header_row_as_columns() -> anyhow::Result<()> {
        let path = temp_path("ok.csv");
        std::fs::write(
            &path,
            "vendor,product,url\nTP-Link,Archer C7 Router,http://x/c7.bin\nAcme,\"Smart, Thermostat\",http://x/therm.bin\n",
        )?;

        let records = load_catalog(&path)?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].vendor(), "TP-Link");
        assert_eq!(records[0].url(), "http://x/c7.bin");
        assert_eq!(records[1].product(), "Smart, Thermostat");

        std::fs::remove_file(path)?;
        Ok(())
    }

    #[test]
    fn short_rows_leave_trailing_columns_empty() -> anyhow::Result<()> {
        let path = temp_path("short.csv");
        std::fs::write(&path, "vendor,product,url\nAcme,Thermostat\n")?;

        let records = load_catalog(&path)?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].product(), "Thermostat");
        assert_eq!(records[0].url(), "");

        std::fs::remove_file(path)?;
        Ok(())
    }

    #[test]
    fn missing_file_is_reported_and_degrades_to_empty() {
        let path = temp_path("does_not_exist.csv");
        let err = load_catalog(&path).unwrap_err();
        assert!(matches!(err, CatalogError::MissingFile { .. }));
        assert_eq!(err.path(), path.as_path());
        assert!(load_or_report(&path, CatalogKind::Firmware).is_empty());
    }

    #[test]
    fn invalid_utf8_is_a_read_failure() -> anyhow::Result<()> {
        let path = temp_path("latin1.csv");
        std::fs::write(&path, b"vendor,product,url\nAcme,Caf\xe9 Router,http://x/a.bin\n")?;

        let err = load_catalog(&path).unwrap_err();
        assert!(matches!(err, CatalogError::ReadFailure { .. }));
        assert!(load_or_report(&path, CatalogKind::FtpMirror).is_empty());

        std::fs::remove_file(path)?;
        Ok(())
    }
}
