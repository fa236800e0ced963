//! Unpacking of downloaded firmware archives.
//!
//! The output directory is walked for archives; each one is extracted into
//! `<stem>_extracted` beside it. A failing archive is logged and the walk
//! moves on to the next one.

use anyhow::{Context, Result, bail};
use memmap2::Mmap;
use serde::Serialize;
use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::Command;
use zip::ZipArchive;

use crate::config::{BINWALK_ENV, resolve_program};
use crate::scan::{ARCHIVE_EXTENSIONS, extraction_dir, scan_archives};

#[derive(Debug, Clone, Serialize)]
pub struct ExtractedArchive {
    pub archive: String,
    pub destination: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedUnpack {
    pub archive: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UnpackReport {
    pub extracted: Vec<ExtractedArchive>,
    pub failed: Vec<FailedUnpack>,
}

pub trait Unpacker {
    fn name(&self) -> &'static str;

    fn extract_archive(&self, archive: &Path, destination: &Path) -> Result<()>;

    fn unpack(&self, directory: &Path) -> Result<UnpackReport> {
        let mut report = UnpackReport::default();
        if !directory.is_dir() {
            tracing::warn!("nothing to unpack, {} is not a directory", directory.display());
            return Ok(report);
        }

        for archive in scan_archives(directory, ARCHIVE_EXTENSIONS)? {
            let destination = extraction_dir(&archive);
            let result = std::fs::create_dir_all(&destination)
                .with_context(|| format!("Failed to create directory: {}", destination.display()))
                .and_then(|()| self.extract_archive(&archive, &destination));

            match result {
                Ok(()) => {
                    tracing::info!("Unpacked {} using {}", archive.display(), self.name());
                    report.extracted.push(ExtractedArchive {
                        archive: archive.to_string_lossy().to_string(),
                        destination: destination.to_string_lossy().to_string(),
                    });
                }
                Err(err) => {
                    tracing::error!(
                        "Failed to unpack {} using {}: {err:#}",
                        archive.display(),
                        self.name()
                    );
                    report.failed.push(FailedUnpack {
                        archive: archive.to_string_lossy().to_string(),
                        error: format!("{err:#}"),
                    });
                }
            }
        }

        Ok(report)
    }
}

#[derive(Debug, Clone)]
pub struct BinwalkUnpacker {
    program: PathBuf,
}

impl BinwalkUnpacker {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }

    pub fn from_env() -> Self {
        Self::new(resolve_program(BINWALK_ENV, "binwalk"))
    }
}

impl Unpacker for BinwalkUnpacker {
    fn name(&self) -> &'static str {
        "binwalk"
    }

    fn extract_archive(&self, archive: &Path, destination: &Path) -> Result<()> {
        let output = Command::new(&self.program)
            .arg("-e")
            .arg(archive)
            .arg("--directory")
            .arg(destination)
            .output()
            .with_context(|| {
                format!(
                    "Failed to execute {} (ensure binwalk is installed, or use --extractor zip)",
                    self.program.display()
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("binwalk failed ({}): {}", output.status, stderr.trim());
        }
        Ok(())
    }
}

/// Extracts zip archives in-process.
#[derive(Debug, Clone, Default)]
pub struct ZipUnpacker;

impl Unpacker for ZipUnpacker {
    fn name(&self) -> &'static str {
        "zip"
    }

    fn extract_archive(&self, archive: &Path, destination: &Path) -> Result<()> {
        let file = File::open(archive)
            .with_context(|| format!("Failed to open archive: {}", archive.display()))?;
        // SAFETY: The file is opened read-only and outlives the mapping.
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("Failed to mmap archive: {}", archive.display()))?;
        let mut zip = ZipArchive::new(Cursor::new(&mmap[..]))
            .with_context(|| format!("Not a readable zip archive: {}", archive.display()))?;
        zip.extract(destination)
            .with_context(|| format!("Failed to extract into {}", destination.display()))?;
        Ok(())
    }
}
