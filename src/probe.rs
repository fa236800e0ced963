//! Catalog accessibility checks for `--test-csv`.

use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::catalog::CatalogKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeStatus {
    Readable {
        header: String,
        first_line: String,
    },
    Unreadable {
        error: String,
    },
    Missing {
        cwd: Option<PathBuf>,
        parent: PathBuf,
        /// Entries of `parent`, or `None` when it does not exist either.
        parent_entries: Option<Vec<String>>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogProbe {
    pub description: &'static str,
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: ProbeStatus,
}

impl CatalogProbe {
    pub fn is_ok(&self) -> bool {
        matches!(self.status, ProbeStatus::Readable { .. })
    }
}

pub fn probe_catalog(path: &Path, kind: CatalogKind) -> CatalogProbe {
    let status = if path.exists() {
        match read_head(path) {
            Ok((header, first_line)) => ProbeStatus::Readable { header, first_line },
            Err(err) => ProbeStatus::Unreadable {
                error: err.to_string(),
            },
        }
    } else {
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        ProbeStatus::Missing {
            cwd: std::env::current_dir().ok(),
            parent_entries: list_dir(&parent),
            parent,
        }
    };

    CatalogProbe {
        description: kind.description(),
        path: path.to_path_buf(),
        status,
    }
}

/// Header line and first data line (empty when the file has no data rows).
fn read_head(path: &Path) -> std::io::Result<(String, String)> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut header = String::new();
    reader.read_line(&mut header)?;
    let mut first_line = String::new();
    reader.read_line(&mut first_line)?;
    Ok((header.trim().to_string(), first_line.trim().to_string()))
}

fn list_dir(dir: &Path) -> Option<Vec<String>> {
    let entries = std::fs::read_dir(dir).ok()?;
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    Some(names)
}
