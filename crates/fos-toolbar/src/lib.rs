//! fOS Toolbar
//!
//! In-page accessibility toolbar engine.
//!
//! - [`classify`]: partitions page elements into effect target groups
//! - [`status`] and [`storage`]: the settings map and its persistence
//! - [`effects`]: the DOM mutations behind each setting
//! - [`dispatch`]: the ordered rule table run for clicks, keys and replay
//! - [`engine`]: mounting and the [`Toolbar`] instance
//! - [`events`]: page input forwarded by the host
//!
//! Screen reading is delegated to `fos-speech`.

pub mod classify;
pub mod config;
pub mod dispatch;
pub mod effects;
pub mod engine;
pub mod events;
pub mod host;
pub mod panel;
pub mod schema;
pub mod status;
pub mod storage;

pub use classify::{classify, NodeGroup, NodeGroups};
pub use config::ToolbarConfig;
pub use dispatch::{ExclusiveGroup, ExclusiveGroups, Invocation, Trigger};
pub use engine::{Toolbar, ToolbarBuilder};
pub use events::UiEvent;
pub use host::{HeadlessHost, HostPage};
pub use panel::{Control, Panel};
pub use schema::{OptionSchema, PaletteDescriptor, RangeDescriptor, SchemaNode};
pub use status::{KeyIndex, StatusMap, StatusValue};
pub use storage::{FileStore, KeyValueStore, MemoryStore, SettingsStore, StorageError};

/// Toolbar error
#[derive(Debug, thiserror::Error)]
pub enum ToolbarError {
    #[error("invalid toolbar configuration: {0}")]
    Config(#[from] serde_json::Error),
    
    #[error("document error: {0}")]
    Dom(#[from] fos_dom::DomError),
}

pub type ToolbarResult<T> = Result<T, ToolbarError>;
