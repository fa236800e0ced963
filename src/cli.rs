use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::filter::FilterCriteria;

#[derive(Debug, Clone, Parser)]
#[command(name = "fw-filter")]
#[command(about = "Filter and download firmware from a firmware catalog")]
pub struct Cli {
    /// Application domain (e.g. wifi, iot, camera)
    #[arg(long, value_name = "TAG")]
    pub domain: Option<String>,

    /// Industry vertical (e.g. healthcare, industrial)
    #[arg(long, value_name = "TAG")]
    pub industry: Option<String>,

    /// Vendor name, compared case-insensitively (e.g. tp-link, netgear)
    #[arg(long, value_name = "NAME")]
    pub vendor: Option<String>,

    /// Additional keyword to filter by; may be repeated
    #[arg(long = "keyword", value_name = "WORD")]
    pub keywords: Vec<String>,

    #[arg(long)]
    pub list_domains: bool,

    #[arg(long)]
    pub list_industries: bool,

    /// Only list matching firmware, don't download
    #[arg(long)]
    pub list_only: bool,

    /// Check that both catalog files exist and can be read
    #[arg(long = "test-csv")]
    pub test_csv: bool,

    /// Maximum number of firmware images to download (0 = no limit)
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub limit: usize,

    /// Unpack downloaded archives
    #[arg(long)]
    pub unpack: bool,

    #[arg(long, value_enum, default_value_t = ExtractorKind::Binwalk)]
    pub extractor: ExtractorKind,

    /// Output directory for downloaded firmware
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Firmware download list
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Firmware FTP list
    #[arg(long = "ftp-csv", value_name = "FILE")]
    pub ftp_csv: Option<PathBuf>,

    /// Also filter entries of the FTP list
    #[arg(long)]
    pub include_ftp: bool,

    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            domain: self.domain.clone().filter(|d| !d.is_empty()),
            industry: self.industry.clone().filter(|i| !i.is_empty()),
            vendor: self.vendor.clone().filter(|v| !v.is_empty()),
            keywords: self.keywords.clone(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ExtractorKind {
    Binwalk,
    Zip,
}
