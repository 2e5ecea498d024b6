//! Toolbar Configuration
//!
//! Host-supplied options. Every field has a default so a host only has to
//! name what it changes; unknown fields are ignored.

use serde::{Deserialize, Deserializer, Serialize};

use fos_speech::{RemoteSource, RemoteSpeechConfig};

use crate::schema::OptionSchema;
use crate::storage::STORAGE_PREFIX;
use crate::ToolbarResult;

/// Toolbar options (camelCase in JSON)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolbarConfig {
    /// Instance identifier, namespaces the persisted settings
    pub id: String,
    /// Selector for the element the panel is appended to (body if unset)
    pub container: Option<String>,
    /// Prefix of every generated class name
    pub class_name: String,
    /// Panel width, exposed as the `--ba-awidth` custom property
    pub width: String,
    pub position: String,
    pub logo_url: Option<String>,
    pub logo_position: String,
    /// Extra markup appended to the panel (icon sprites)
    pub icons: Option<String>,
    /// Extra stylesheet text emitted inside the panel
    pub css: Option<String>,
    pub is_menu_opened: bool,
    #[serde(deserialize_with = "flag")]
    pub hide_on_phone: bool,
    pub set_dark_mode: bool,
    /// Selector list relocated into the reading container by read mode
    pub read_mode_selector: String,
    /// Language for screen reading; the page language when unset
    pub speech_lang: Option<String>,
    pub remote_reader_source: RemoteSource,
    pub remote_speech: RemoteSpeechConfig,
    pub items_list: OptionSchema,
    /// Comma-separated tag names never classified
    pub tags_excludes: String,
}

impl Default for ToolbarConfig {
    fn default() -> Self {
        Self {
            id: "ba__acc-1".into(),
            container: None,
            class_name: "ba__accessibility".into(),
            width: "25em".into(),
            position: "right".into(),
            logo_url: None,
            logo_position: "start".into(),
            icons: None,
            css: None,
            is_menu_opened: true,
            hide_on_phone: false,
            set_dark_mode: false,
            read_mode_selector: "main,#main".into(),
            speech_lang: None,
            remote_reader_source: RemoteSource::default(),
            remote_speech: RemoteSpeechConfig::default(),
            items_list: OptionSchema::default(),
            tags_excludes: "script,embed,object".into(),
        }
    }
}

impl ToolbarConfig {
    /// Parse host options, falling back to defaults for absent fields
    pub fn from_json(json: &str) -> ToolbarResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
    
    /// Storage key of this instance's settings record
    pub fn storage_key(&self) -> String {
        format!("{STORAGE_PREFIX}{}", self.id)
    }
    
    /// `<className>-<suffix>`
    pub fn class(&self, suffix: &str) -> String {
        format!("{}-{}", self.class_name, suffix)
    }
    
    /// Lowercased, trimmed entries of `tagsExcludes`
    pub fn excluded_tags(&self) -> Vec<String> {
        self.tags_excludes
            .split(',')
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Accept `true`/`false` as well as numeric flags (`0`, `1`)
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Number(f64),
        Null(()),
    }
    
    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Number(n) => n != 0.0,
        Flag::Null(()) => false,
    })
}
