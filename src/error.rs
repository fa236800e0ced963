use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("failed to read catalog {}: {source}", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl CatalogError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            CatalogError::MissingFile { path } | CatalogError::ReadFailure { path, .. } => {
                path.as_path()
            }
        }
    }
}
