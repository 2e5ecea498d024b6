//! Settings Status
//!
//! Flat map of control identifier to current value, built from the schema
//! and overlaid with persisted values, plus the index that maps operation
//! tags onto status keys.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::OptionSchema;

/// Keys present in every status map in addition to the schema's controls
pub const FIXED_KEYS: [&str; 5] = [
    "darkmode",
    "audio-play",
    "audio-rate-slider",
    "audio-pitch-slider",
    "audio-volume-slider",
];

/// A persisted control value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusValue {
    /// Never set
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    /// Slider values and colours
    Text(String),
}

impl StatusValue {
    /// Whether the value counts as set (`false`, `0`, `""` and null do not)
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(s) => !s.is_empty(),
        }
    }
    
    /// Numeric reading, parsing text leniently
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => crate::effects::parse_float(s),
            _ => None,
        }
    }
    
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for StatusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for StatusValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for StatusValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for StatusValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Ordered control-identifier to value map
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusMap(IndexMap<String, StatusValue>);

static NULL: StatusValue = StatusValue::Null;

impl StatusMap {
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Default map: every schema control plus [`FIXED_KEYS`], all null
    pub fn build(schema: &OptionSchema) -> Self {
        let mut map = IndexMap::new();
        for key in schema.control_keys() {
            map.insert(key, StatusValue::Null);
        }
        for key in FIXED_KEYS {
            map.insert(key.to_string(), StatusValue::Null);
        }
        Self(map)
    }
    
    /// Overlay `other` onto `self`; keys in `other` win
    pub fn merge(&mut self, other: StatusMap) {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
    }
    
    /// `defaults` overlaid with `overrides`
    pub fn merged(defaults: &StatusMap, overrides: StatusMap) -> StatusMap {
        let mut out = defaults.clone();
        out.merge(overrides);
        out
    }
    
    /// Value for a key, null when absent
    pub fn get(&self, key: &str) -> &StatusValue {
        self.0.get(key).unwrap_or(&NULL)
    }
    
    pub fn set(&mut self, key: &str, value: impl Into<StatusValue>) {
        self.0.insert(key.to_string(), value.into());
    }
    
    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).is_truthy()
    }
    
    /// Flip a boolean setting, returning the new state
    pub fn flip(&mut self, key: &str) -> bool {
        let next = !self.is_truthy(key);
        self.set(key, next);
        next
    }
    
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
    
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
    
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatusValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
    
    pub fn len(&self) -> usize {
        self.0.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Operation tag to status key lookup.
///
/// A tag resolves to the first status key, in status order, that contains
/// it as a substring. The table is computed once at mount.
#[derive(Debug, Clone, Default)]
pub struct KeyIndex {
    map: HashMap<String, String>,
}

impl KeyIndex {
    pub fn build<'a>(status: &StatusMap, tags: impl IntoIterator<Item = &'a str>) -> Self {
        let mut map = HashMap::new();
        for tag in tags {
            let mut matches = status.keys().filter(|key| key.contains(tag));
            let Some(first) = matches.next() else {
                tracing::debug!("Operation tag {} has no status key", tag);
                continue;
            };
            let rest: Vec<&str> = matches.filter(|k| *k != tag).collect();
            if !rest.is_empty() && first != tag {
                tracing::warn!("Operation tag {} matches several status keys, using {} over {:?}", tag, first, rest);
            }
            map.insert(tag.to_string(), first.to_string());
        }
        Self { map }
    }
    
    pub fn resolve(&self, tag: &str) -> Option<&str> {
        self.map.get(tag).map(String::as_str)
    }
    
    pub fn len(&self) -> usize {
        self.map.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
