//! Command orchestration: catalog diagnostics, tag listings, and the
//! load -> filter -> report -> download -> unpack flow.
//!
//! Everything user-facing is written to `out`; progress and failures go to
//! the log. Nothing in here turns a data problem into an error: missing
//! catalogs, empty matches and failed downloads are reported and the run
//! ends normally.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::catalog::{CatalogKind, load_or_report};
use crate::cli::{Cli, OutputFormat};
use crate::config::Paths;
use crate::download::{DownloadReport, Downloader};
use crate::filter::{FilterCriteria, filter_records};
use crate::keywords::{
    DOMAIN_KEYWORDS, INDUSTRY_KEYWORDS, KeywordTable, listing_lines, lookup, tags,
};
use crate::probe::{CatalogProbe, ProbeStatus, probe_catalog};
use crate::record::FirmwareRecord;
use crate::unpack::{UnpackReport, Unpacker};

/// Number of matches printed by the text report.
pub const PREVIEW_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Probed { all_ok: bool },
    Listed,
    NoData,
    Filtered {
        matched: usize,
        downloaded: Option<usize>,
        unpacked: Option<usize>,
    },
}

#[derive(Debug, Serialize)]
struct RunReport<'a> {
    filter: String,
    criteria: &'a FilterCriteria,
    total_entries: usize,
    matched: usize,
    entries: &'a [FirmwareRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    download: Option<&'a DownloadReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unpack: Option<&'a UnpackReport>,
}

pub struct Dispatcher<'a> {
    pub paths: Paths,
    pub downloader: &'a dyn Downloader,
    pub unpacker: &'a dyn Unpacker,
}

impl Dispatcher<'_> {
    pub fn run(&self, cli: &Cli, out: &mut dyn Write) -> Result<Outcome> {
        if cli.test_csv {
            return self.test_catalogs(cli.format, out);
        }
        if cli.list_domains {
            list_tags("Available application domains:", DOMAIN_KEYWORDS, cli.format, out)?;
            return Ok(Outcome::Listed);
        }
        if cli.list_industries {
            list_tags("Available industries:", INDUSTRY_KEYWORDS, cli.format, out)?;
            return Ok(Outcome::Listed);
        }
        self.filter_and_fetch(cli, out)
    }

    fn test_catalogs(&self, format: OutputFormat, out: &mut dyn Write) -> Result<Outcome> {
        let probes = [
            probe_catalog(&self.paths.firmware_csv, CatalogKind::Firmware),
            probe_catalog(&self.paths.ftp_csv, CatalogKind::FtpMirror),
        ];
        let all_ok = probes.iter().all(CatalogProbe::is_ok);

        match format {
            OutputFormat::Json => {
                let doc = serde_json::json!({ "catalogs": probes, "all_ok": all_ok });
                writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
            }
            OutputFormat::Text => {
                for probe in &probes {
                    write_probe(probe, out)?;
                }
                if all_ok {
                    writeln!(out, "\nSUCCESS: All CSV files can be accessed and read.")?;
                } else {
                    writeln!(out, "\nWARNING: Some CSV files could not be accessed or read.")?;
                }
            }
        }

        Ok(Outcome::Probed { all_ok })
    }

    fn filter_and_fetch(&self, cli: &Cli, out: &mut dyn Write) -> Result<Outcome> {
        let firmware = load_or_report(&self.paths.firmware_csv, CatalogKind::Firmware);
        let ftp = load_or_report(&self.paths.ftp_csv, CatalogKind::FtpMirror);

        if firmware.is_empty() && ftp.is_empty() {
            match cli.format {
                OutputFormat::Json => {
                    let doc = serde_json::json!({ "error": "could not load any firmware data" });
                    writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
                }
                OutputFormat::Text => writeln!(out, "Error: Could not load any firmware data.")?,
            }
            return Ok(Outcome::NoData);
        }
        if firmware.is_empty() || ftp.is_empty() {
            tracing::warn!("continuing with a partial dataset, one catalog is empty or unreadable");
        }

        let total_entries = firmware.len() + ftp.len();
        let criteria = cli.criteria();
        let filter_desc = criteria.describe();

        let matches = if cli.include_ftp {
            let mut all = firmware;
            all.extend(ftp);
            filter_records(&all, &criteria)
        } else {
            filter_records(&firmware, &criteria)
        };

        if cli.format == OutputFormat::Text {
            writeln!(out, "Total firmware entries available: {total_entries}")?;
            write_preview(&matches, &filter_desc, out)?;
        }

        let mut download = None;
        let mut unpack = None;
        if !cli.list_only && !matches.is_empty() {
            let urls = download_urls(&matches, cli.limit);
            if cli.format == OutputFormat::Text {
                writeln!(
                    out,
                    "Downloading {} firmware files to {}...",
                    urls.len(),
                    self.paths.output.display()
                )?;
            }

            match self.downloader.download(&urls, &self.paths.output) {
                Ok(report) => {
                    if cli.format == OutputFormat::Text {
                        writeln!(out, "Downloaded {} firmware files", report.downloaded.len())?;
                        if !report.failed.is_empty() {
                            writeln!(out, "Failed to download {} firmware files", report.failed.len())?;
                        }
                    }
                    download = Some(report);
                }
                Err(err) => tracing::error!("download aborted: {err:#}"),
            }

            if cli.unpack && download.is_some() {
                if cli.format == OutputFormat::Text {
                    writeln!(out, "Unpacking downloaded firmware...")?;
                }
                match self.unpacker.unpack(&self.paths.output) {
                    Ok(report) => {
                        if cli.format == OutputFormat::Text {
                            writeln!(out, "Unpacked {} archives", report.extracted.len())?;
                        }
                        unpack = Some(report);
                    }
                    Err(err) => tracing::error!("unpack aborted: {err:#}"),
                }
            }
        }

        if cli.format == OutputFormat::Json {
            let report = RunReport {
                filter: filter_desc,
                criteria: &criteria,
                total_entries,
                matched: matches.len(),
                entries: &matches,
                download: download.as_ref(),
                unpack: unpack.as_ref(),
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }

        Ok(Outcome::Filtered {
            matched: matches.len(),
            downloaded: download.as_ref().map(|r| r.downloaded.len()),
            unpacked: unpack.as_ref().map(|r| r.extracted.len()),
        })
    }
}

/// URLs of `matches` in order, capped at `limit` when it is non-zero.
pub fn download_urls(matches: &[FirmwareRecord], limit: usize) -> Vec<String> {
    let take = if limit > 0 { limit } else { matches.len() };
    matches
        .iter()
        .take(take)
        .map(|r| r.url().to_string())
        .collect()
}

fn write_preview(matches: &[FirmwareRecord], filter_desc: &str, out: &mut dyn Write) -> Result<()> {
    writeln!(
        out,
        "Found {} firmware entries matching {filter_desc}",
        matches.len()
    )?;
    if matches.is_empty() {
        return Ok(());
    }

    writeln!(out, "\nFiltered Firmware List:")?;
    for (i, record) in matches.iter().take(PREVIEW_LIMIT).enumerate() {
        writeln!(
            out,
            "{}. Vendor: {}, Product: {}, URL: {}",
            i + 1,
            record.vendor(),
            record.product(),
            record.url()
        )?;
    }
    if matches.len() > PREVIEW_LIMIT {
        writeln!(out, "... and {} more", matches.len() - PREVIEW_LIMIT)?;
    }
    Ok(())
}

fn list_tags(
    title: &str,
    table: KeywordTable,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = tags(table)
                .map(|tag| (tag.to_string(), serde_json::json!(lookup(table, tag))))
                .collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&map)?)?;
        }
        OutputFormat::Text => {
            writeln!(out, "{title}")?;
            for line in listing_lines(table) {
                writeln!(out, "{line}")?;
            }
        }
    }
    Ok(())
}

fn write_probe(probe: &CatalogProbe, out: &mut dyn Write) -> Result<()> {
    let path = probe.path.display();
    writeln!(out, "\nTesting access to {}: {path}", probe.description)?;

    match &probe.status {
        ProbeStatus::Readable { header, first_line } => {
            writeln!(out, "SUCCESS: CSV file exists at {path}")?;
            writeln!(out, "CSV header: {header}")?;
            writeln!(out, "First data line: {first_line}")?;
            writeln!(out, "CSV file can be read successfully.")?;
        }
        ProbeStatus::Unreadable { error } => {
            writeln!(out, "SUCCESS: CSV file exists at {path}")?;
            writeln!(out, "ERROR: CSV file exists but cannot be read: {error}")?;
        }
        ProbeStatus::Missing {
            cwd,
            parent,
            parent_entries,
        } => {
            writeln!(out, "ERROR: CSV file not found at {path}")?;
            if let Some(cwd) = cwd {
                writeln!(out, "Current working directory: {}", cwd.display())?;
            }
            match parent_entries {
                Some(entries) => {
                    writeln!(out, "The directory {} exists. Contents:", parent.display())?;
                    for entry in entries {
                        writeln!(out, "  - {entry}")?;
                    }
                }
                None => writeln!(out, "The directory {} does not exist.", parent.display())?,
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::cell::RefCell;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    #[derive(Default)]
    struct RecordingDownloader {
        calls: RefCell<Vec<(Vec<String>, PathBuf)>>,
    }

    impl Downloader for RecordingDownloader {
        fn download(&self, urls: &[String], destination: &Path) -> Result<DownloadReport> {
            self.calls
                .borrow_mut()
                .push((urls.to_vec(), destination.to_path_buf()));
            Ok(DownloadReport {
                requested: urls.len(),
                ..Default::default()
            })
        }
    }

    #[derive(Default)]
    struct RecordingUnpacker {
        dirs: RefCell<Vec<PathBuf>>,
    }

    impl Unpacker for RecordingUnpacker {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn extract_archive(&self, _archive: &Path, _destination: &Path) -> Result<()> {
            Ok(())
        }

        fn unpack(&self, directory: &Path) -> Result<UnpackReport> {
            self.dirs.borrow_mut().push(directory.to_path_buf());
            Ok(UnpackReport::default())
        }
    }

    fn temp_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "fw_filter_dispatch_test_{}_{}_{}",
            std::process::id(),
            nanos,
            name
        ))
    }

    struct Fixture {
        base: PathBuf,
        paths: Paths,
        downloader: RecordingDownloader,
        unpacker: RecordingUnpacker,
    }

    impl Fixture {
        fn new(name: &str, firmware_csv: Option<&str>, ftp_csv: Option<&str>) -> Self {
            let base = temp_dir(name);
            fs::create_dir_all(&base).unwrap();
            let paths = Paths {
                output: base.join("fws"),
                firmware_csv: base.join("firmware_download_list.csv"),
                ftp_csv: base.join("firmware_ftp_list.csv"),
            };
            if let Some(content) = firmware_csv {
                fs::write(&paths.firmware_csv, content).unwrap();
            }
            if let Some(content) = ftp_csv {
                fs::write(&paths.ftp_csv, content).unwrap();
            }
            Self {
                base,
                paths,
                downloader: RecordingDownloader::default(),
                unpacker: RecordingUnpacker::default(),
            }
        }

        fn run(&self, args: &[&str]) -> (Outcome, String) {
            let mut argv = vec!["fw-filter"];
            argv.extend_from_slice(args);
            let cli = Cli::parse_from(argv);
            let dispatcher = Dispatcher {
                paths: self.paths.clone(),
                downloader: &self.downloader,
                unpacker: &self.unpacker,
            };
            let mut out = Vec::new();
            let outcome = dispatcher.run(&cli, &mut out).unwrap();
            (outcome, String::from_utf8(out).unwrap())
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.base);
        }
    }

    const CATALOG: &str = "vendor,product,url\n\
TP-Link,Archer C7 Router,http://x/c7.bin\n\
Acme,Smart Thermostat,http://x/therm.bin\n";

    const FTP: &str = "vendor,product,url\nNetgear,Nighthawk R7000 Router,ftp://m/r7000.zip\n";

    #[test]
    fn list_only_previews_without_downloading() {
        let fx = Fixture::new("list_only", Some(CATALOG), Some(FTP));
        let (outcome, out) = fx.run(&["--domain", "wifi", "--list-only"]);

        assert_eq!(
            outcome,
            Outcome::Filtered {
                matched: 1,
                downloaded: None,
                unpacked: None
            }
        );
        assert!(out.contains("Total firmware entries available: 3"));
        assert!(out.contains("Found 1 firmware entries matching domain 'wifi'"));
        assert!(out.contains("1. Vendor: TP-Link, Product: Archer C7 Router, URL: http://x/c7.bin"));
        assert!(fx.downloader.calls.borrow().is_empty());
    }

    #[test]
    fn vendor_filter_downloads_and_unpacks_matches() {
        let fx = Fixture::new("download", Some(CATALOG), None);
        let (outcome, out) = fx.run(&["--vendor", "acme", "--unpack"]);

        assert!(matches!(outcome, Outcome::Filtered { matched: 1, .. }));
        let calls = fx.downloader.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, vec!["http://x/therm.bin".to_string()]);
        assert_eq!(calls[0].1, fx.paths.output);
        assert_eq!(*fx.unpacker.dirs.borrow(), vec![fx.paths.output.clone()]);
        assert!(out.contains("Downloading 1 firmware files to"));
        // counts files the downloader reported as fetched, not URLs handed over
        assert!(out.contains("Downloaded 0 firmware files"));
        assert!(out.contains("Unpacking downloaded firmware..."));
    }

    #[test]
    fn limit_caps_forwarded_urls() {
        let fx = Fixture::new("limit", Some(CATALOG), None);
        fx.run(&["--keyword", "x/", "--limit", "1"]);

        let calls = fx.downloader.calls.borrow();
        assert_eq!(calls[0].0, vec!["http://x/c7.bin".to_string()]);
        assert!(fx.unpacker.dirs.borrow().is_empty());
    }

    #[test]
    fn no_criteria_finds_nothing_and_skips_download() {
        let fx = Fixture::new("no_criteria", Some(CATALOG), None);
        let (outcome, out) = fx.run(&[]);

        assert!(matches!(outcome, Outcome::Filtered { matched: 0, .. }));
        assert!(out.contains("Found 0 firmware entries matching no filters"));
        assert!(!out.contains("Filtered Firmware List"));
        assert!(fx.downloader.calls.borrow().is_empty());
    }

    #[test]
    fn both_catalogs_missing_halts_before_filtering() {
        let fx = Fixture::new("no_data", None, None);
        let (outcome, out) = fx.run(&["--domain", "wifi"]);

        assert_eq!(outcome, Outcome::NoData);
        assert!(out.contains("Error: Could not load any firmware data."));
        assert!(!out.contains("Found"));
        assert!(fx.downloader.calls.borrow().is_empty());
    }

    #[test]
    fn ftp_entries_are_filtered_only_when_requested() {
        let fx = Fixture::new("ftp", None, Some(FTP));

        let (outcome, _) = fx.run(&["--domain", "wifi", "--list-only"]);
        assert!(matches!(outcome, Outcome::Filtered { matched: 0, .. }));

        let (outcome, out) = fx.run(&["--domain", "wifi", "--list-only", "--include-ftp"]);
        assert!(matches!(outcome, Outcome::Filtered { matched: 1, .. }));
        assert!(out.contains("Nighthawk R7000"));
    }

    #[test]
    fn preview_is_truncated_with_overflow_count() {
        let mut csv = String::from("vendor,product,url\n");
        for i in 0..25 {
            csv.push_str(&format!("Acme,Router {i},http://x/{i}.bin\n"));
        }
        let fx = Fixture::new("overflow", Some(&csv), None);
        let (_, out) = fx.run(&["--domain", "wifi", "--list-only"]);

        assert!(out.contains("20. Vendor: Acme, Product: Router 19"));
        assert!(!out.contains("21. Vendor"));
        assert!(out.contains("... and 5 more"));
    }

    #[test]
    fn listing_modes_return_before_loading() {
        let fx = Fixture::new("listing", None, None);

        let (outcome, out) = fx.run(&["--list-domains"]);
        assert_eq!(outcome, Outcome::Listed);
        assert!(out.starts_with("Available application domains:\n- wifi: router, access point, ap..."));

        let (_, out) = fx.run(&["--list-industries"]);
        assert!(out.contains("- smart_home: smart home, home automation, thermostat..."));
        assert!(!out.contains("Could not load"));
    }

    #[test]
    fn json_tag_listing_keeps_table_order() {
        let fx = Fixture::new("listing_json", None, None);
        let (_, out) = fx.run(&["--list-domains", "--format", "json"]);

        let doc: serde_json::Value = serde_json::from_str(&out).unwrap();
        let keys: Vec<&str> = doc
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            keys,
            vec!["wifi", "iot", "camera", "storage", "printer", "voip", "modem"]
        );
        assert!(out.find("\"wifi\"").unwrap() < out.find("\"camera\"").unwrap());
    }

    #[test]
    fn test_csv_reports_each_catalog() {
        let fx = Fixture::new("probe", Some(CATALOG), None);
        let (outcome, out) = fx.run(&["--test-csv", "--domain", "wifi"]);

        assert_eq!(outcome, Outcome::Probed { all_ok: false });
        assert!(out.contains("CSV header: vendor,product,url"));
        assert!(out.contains("First data line: TP-Link,Archer C7 Router,http://x/c7.bin"));
        assert!(out.contains("ERROR: CSV file not found at"));
        assert!(out.contains("  - firmware_download_list.csv"));
        assert!(out.contains("WARNING: Some CSV files could not be accessed or read."));
        assert!(fx.downloader.calls.borrow().is_empty());
    }

    #[test]
    fn json_report_lists_every_match() {
        let fx = Fixture::new("json", Some(CATALOG), Some(FTP));
        let (_, out) = fx.run(&["--vendor", "TP-LINK", "--list-only", "--format", "json"]);

        let doc: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(doc["total_entries"], 3);
        assert_eq!(doc["matched"], 1);
        assert_eq!(doc["filter"], "vendor 'TP-LINK'");
        assert_eq!(doc["entries"][0]["product"], "Archer C7 Router");
        assert!(doc.get("download").is_none());
    }

    #[test]
    fn download_urls_respects_zero_as_unlimited() {
        let records: Vec<FirmwareRecord> = (0..3)
            .map(|i| [("url", format!("http://x/{i}.bin"))].into_iter().collect())
            .collect();
        assert_eq!(download_urls(&records, 0).len(), 3);
        assert_eq!(download_urls(&records, 2), vec!["http://x/0.bin", "http://x/1.bin"]);
        assert_eq!(download_urls(&records, 10).len(), 3);
    }
}
