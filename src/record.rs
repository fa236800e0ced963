use serde::Serialize;
use std::collections::BTreeMap;

pub const VENDOR: &str = "vendor";
pub const PRODUCT: &str = "product";
pub const URL: &str = "url";

/// One catalog row, keyed by column header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FirmwareRecord {
    fields: BTreeMap<String, String>,
}

impl FirmwareRecord {
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    /// Value of `column`, or the empty string when the row has no such column.
    pub fn field(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn vendor(&self) -> &str {
        self.field(VENDOR)
    }

    pub fn product(&self) -> &str {
        self.field(PRODUCT)
    }

    pub fn url(&self) -> &str {
        self.field(URL)
    }
}

impl<K, V> FromIterator<(K, V)> for FirmwareRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
