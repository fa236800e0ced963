//! Batch firmware downloader.
//!
//! URLs are fetched one after another by an external `curl` process. A
//! failed URL is logged and skipped; the batch always runs to the end.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::{CURL_ENV, resolve_program};

pub trait Downloader {
    fn download(&self, urls: &[String], destination: &Path) -> Result<DownloadReport>;
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadedFile {
    pub url: String,
    pub path: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedDownload {
    pub url: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DownloadReport {
    pub requested: usize,
    pub downloaded: Vec<DownloadedFile>,
    pub failed: Vec<FailedDownload>,
}

#[derive(Debug, Clone)]
pub struct CurlDownloader {
    program: PathBuf,
}

impl CurlDownloader {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }

    pub fn from_env() -> Self {
        Self::new(resolve_program(CURL_ENV, "curl"))
    }

    fn fetch(&self, url: &str, target: &Path) -> Result<()> {
        let output = Command::new(&self.program)
            .args(["-L", "--fail", "--silent", "--show-error", "-o"])
            .arg(target)
            .arg(url)
            .output()
            .with_context(|| {
                format!(
                    "Failed to execute {} (ensure curl is installed)",
                    self.program.display()
                )
            })?;

        if !output.status.success() {
            let _ = std::fs::remove_file(target);
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("curl failed ({}): {}", output.status, stderr.trim());
        }
        Ok(())
    }
}

impl Downloader for CurlDownloader {
    fn download(&self, urls: &[String], destination: &Path) -> Result<DownloadReport> {
        std::fs::create_dir_all(destination).with_context(|| {
            format!("Failed to create output directory: {}", destination.display())
        })?;

        let mut report = DownloadReport {
            requested: urls.len(),
            ..Default::default()
        };
        let mut used_names = HashSet::new();

        for (idx, url) in urls.iter().enumerate() {
            let name = unique_file_name(&file_name_for_url(url, idx), &mut used_names);
            let target = destination.join(&name);

            match self.fetch(url, &target).and_then(|()| hash_file(&target)) {
                Ok(sha256) => {
                    tracing::info!("Downloaded {url} -> {}", target.display());
                    report.downloaded.push(DownloadedFile {
                        url: url.clone(),
                        path: target.to_string_lossy().to_string(),
                        sha256,
                    });
                }
                Err(err) => {
                    tracing::error!("Failed to download {url}: {err:#}");
                    report.failed.push(FailedDownload {
                        url: url.clone(),
                        error: format!("{err:#}"),
                    });
                }
            }
        }

        Ok(report)
    }
}

/// Last path segment of `url` with query and fragment removed, or
/// `firmware_<idx>.bin` when there is none.
pub fn file_name_for_url(url: &str, idx: usize) -> String {
    let without_suffix = url.split(['?', '#']).next().unwrap_or("");
    let path = without_suffix
        .split_once("://")
        .map(|(_, rest)| rest.split_once('/').map(|(_, p)| p).unwrap_or(""))
        .unwrap_or(without_suffix);

    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() && name != "." && name != ".." => name.to_string(),
        _ => format!("firmware_{idx}.bin"),
    }
}

fn unique_file_name(name: &str, used: &mut HashSet<String>) -> String {
    if used.insert(name.to_string()) {
        return name.to_string();
    }

    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    let mut n = 1usize;
    loop {
        let candidate = match ext {
            Some(ext) => format!("{stem}_{n}.{ext}"),
            None => format!("{name}_{n}"),
        };
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

pub fn hash_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read downloaded file: {}", path.display()))?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
