//! Appointment records and the remarks lookup mapping.

use indexmap::IndexMap;
use serde::Serialize;

/// Canonical key holding the normalized identifier.
pub const PAT_ID: &str = "Pat ID";
/// Reserved key filled from the lookup table.
pub const REMARK: &str = "Remark";
/// Reserved key filled from the lookup table.
pub const AGENT_NAME: &str = "Agent Name";

/// Normalize an identifier read from either upload.
///
/// Trims whitespace, then strips exactly one trailing `.0` left behind when a
/// numeric cell was exported as text.
///
/// ```
/// use apptmerge_core::normalize_id;
///
/// assert_eq!(normalize_id(" 1024.0 "), "1024");
/// assert_eq!(normalize_id("7.0.0"), "7.0");
/// assert_eq!(normalize_id("A-17"), "A-17");
/// ```
#[must_use]
pub fn normalize_id(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_suffix(".0").unwrap_or(trimmed).to_string()
}

/// One appointment row: header text to cell text, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, String>,
}

impl Record {
    /// Get a field by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Set a field; an existing key keeps its position
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Add `key` with an empty value unless it is already present
    pub fn ensure(&mut self, key: &str) {
        if !self.fields.contains_key(key) {
            self.fields.insert(key.to_string(), String::new());
        }
    }

    #[must_use]
    pub fn pat_id(&self) -> &str {
        self.get(PAT_ID).unwrap_or_default()
    }

    #[must_use]
    pub fn remark(&self) -> &str {
        self.get(REMARK).unwrap_or_default()
    }

    #[must_use]
    pub fn agent_name(&self) -> &str {
        self.get(AGENT_NAME).unwrap_or_default()
    }

    pub fn set_pat_id(&mut self, value: impl Into<String>) {
        self.insert(PAT_ID, value);
    }

    pub fn set_remark(&mut self, value: impl Into<String>) {
        self.insert(REMARK, value);
    }

    pub fn set_agent_name(&mut self, value: impl Into<String>) {
        self.insert(AGENT_NAME, value);
    }

    /// Keys in column order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A remark and the agent who left it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LookupEntry {
    pub remark: String,
    pub agent_name: String,
}

impl LookupEntry {
    #[must_use]
    pub fn new(remark: impl Into<String>, agent_name: impl Into<String>) -> Self {
        LookupEntry {
            remark: remark.into(),
            agent_name: agent_name.into(),
        }
    }
}

/// Normalized identifier to its remarks, in sheet order.
pub type LookupMap = IndexMap<String, Vec<LookupEntry>>;
