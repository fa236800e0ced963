//! Keyword filter engine.
//!
//! A record is selected when it passes the vendor filter (if any) and, when
//! any keyword-bearing criterion is present, at least one active keyword is
//! a case-insensitive substring of its product name or its URL. With no
//! criteria at all nothing is selected.

use serde::Serialize;

use crate::keywords::{domain_keywords, industry_keywords};
use crate::record::FirmwareRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub domain: Option<String>,
    pub industry: Option<String>,
    pub vendor: Option<String>,
    pub keywords: Vec<String>,
}

impl FilterCriteria {
    pub fn domain(&self) -> Option<&str> {
        non_empty(&self.domain)
    }

    pub fn industry(&self) -> Option<&str> {
        non_empty(&self.industry)
    }

    /// An empty vendor string counts as no vendor filter.
    pub fn vendor(&self) -> Option<&str> {
        non_empty(&self.vendor)
    }

    /// Domain keywords, then industry keywords, then custom keywords verbatim.
    pub fn active_keywords(&self) -> Vec<String> {
        let mut active: Vec<String> = Vec::new();
        if let Some(domain) = self.domain() {
            active.extend(domain_keywords(domain).iter().map(|k| k.to_string()));
        }
        if let Some(industry) = self.industry() {
            active.extend(industry_keywords(industry).iter().map(|k| k.to_string()));
        }
        active.extend(self.keywords.iter().cloned());
        active
    }

    /// Human-readable summary, e.g. `domain 'wifi' and vendor 'acme'`.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(domain) = self.domain() {
            parts.push(format!("domain '{domain}'"));
        }
        if let Some(industry) = self.industry() {
            parts.push(format!("industry '{industry}'"));
        }
        if let Some(vendor) = self.vendor() {
            parts.push(format!("vendor '{vendor}'"));
        }
        if !self.keywords.is_empty() {
            let quoted: Vec<String> = self.keywords.iter().map(|k| format!("'{k}'")).collect();
            parts.push(format!("custom keywords [{}]", quoted.join(", ")));
        }

        if parts.is_empty() {
            "no filters".to_string()
        } else {
            parts.join(" and ")
        }
    }
}

pub fn filter_records(records: &[FirmwareRecord], criteria: &FilterCriteria) -> Vec<FirmwareRecord> {
    let keywords: Vec<String> = criteria
        .active_keywords()
        .iter()
        .map(|k| k.to_lowercase())
        .collect();
    let vendor = criteria.vendor().map(str::to_lowercase);

    if keywords.is_empty() && vendor.is_none() {
        tracing::warn!("No filtering criteria provided");
        return Vec::new();
    }

    records
        .iter()
        .filter(|record| is_selected(record, vendor.as_deref(), &keywords))
        .cloned()
        .collect()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// `vendor` and `keywords` must already be lowercase.
fn is_selected(record: &FirmwareRecord, vendor: Option<&str>, keywords: &[String]) -> bool {
    if let Some(vendor) = vendor
        && record.vendor().to_lowercase() != vendor
    {
        return false;
    }

    if keywords.is_empty() {
        return true;
    }

    contains_any(record.product(), keywords) || contains_any(record.url(), keywords)
}

fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    keywords.iter().any(|k| haystack.contains(k.as_str()))
}
