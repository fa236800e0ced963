use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::cli::Cli;

pub const DEFAULT_OUTPUT_DIR: &str = "../fws";
pub const DEFAULT_FIRMWARE_CSV: &str = "../dat/firmware_download_list.csv";
pub const DEFAULT_FTP_CSV: &str = "../dat/firmware_ftp_list.csv";

pub const OUTPUT_ENV: &str = "FW_FILTER_OUTPUT";
pub const FIRMWARE_CSV_ENV: &str = "FW_FILTER_CSV";
pub const FTP_CSV_ENV: &str = "FW_FILTER_FTP_CSV";
pub const CURL_ENV: &str = "FW_FILTER_CURL";
pub const BINWALK_ENV: &str = "FW_FILTER_BINWALK";

/// Paths the dispatcher works with, after flags, environment and defaults
/// have been applied in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub output: PathBuf,
    pub firmware_csv: PathBuf,
    pub ftp_csv: PathBuf,
}

impl Paths {
    pub fn resolve(cli: &Cli) -> Self {
        Self::resolve_with(cli, |key| env::var_os(key))
    }

    fn resolve_with(cli: &Cli, lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let pick = |flag: &Option<PathBuf>, key: &str, default: &str| {
            if let Some(p) = flag.clone() {
                return p;
            }
            if let Some(p) = lookup(key).filter(|v| !v.is_empty()) {
                return PathBuf::from(p);
            }
            PathBuf::from(default)
        };

        Self {
            output: pick(&cli.output, OUTPUT_ENV, DEFAULT_OUTPUT_DIR),
            firmware_csv: pick(&cli.csv, FIRMWARE_CSV_ENV, DEFAULT_FIRMWARE_CSV),
            ftp_csv: pick(&cli.ftp_csv, FTP_CSV_ENV, DEFAULT_FTP_CSV),
        }
    }
}

/// Program used for an external tool: the environment override or `default`.
pub fn resolve_program(key: &str, default: &str) -> PathBuf {
    env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
