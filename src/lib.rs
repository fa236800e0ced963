//! # fw-filter
//!
//! Selects firmware images from a firmware catalog by application domain,
//! industry, vendor or free keyword, then downloads and unpacks them.
//!
//! ## Architecture
//!
//! - **keywords**: Static domain and industry keyword tables
//! - **record**: Catalog row with defaulting column accessors
//! - **catalog**: CSV catalog loading with reported, non-fatal failures
//! - **filter**: Keyword/vendor filter engine
//! - **probe**: Catalog accessibility diagnostics
//! - **download**: Batch downloader backed by `curl`
//! - **scan**: Archive discovery in the output directory
//! - **unpack**: Archive extraction via `binwalk` or in-process zip
//! - **dispatch**: Orchestration of the command-line flows
//! - **config**: Path and program resolution (flag > environment > default)

pub mod catalog;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod download;
pub mod error;
pub mod filter;
pub mod keywords;
pub mod logging;
pub mod probe;
pub mod record;
pub mod scan;
pub mod unpack;
