//! Toolbar Engine
//!
//! One mounted toolbar instance: the page document, its settings, the
//! rendered panel and the screen reader. All state lives on the instance.

use std::time::Instant;

use fos_dom::{Document, NodeId};
use fos_speech::{NoVoices, NullSink, SpeechController};

use crate::classify::{classify, NodeGroups};
use crate::config::ToolbarConfig;
use crate::dispatch::{ExclusiveGroups, Trigger, OPERATION_TAGS};
use crate::effects::{apply_phone_visibility, capture_baselines, TEXT_RANGE_PROPERTIES};
use crate::host::HostPage;
use crate::panel::Panel;
use crate::status::{KeyIndex, StatusMap, StatusValue};
use crate::storage::{KeyValueStore, MemoryStore, SettingsStore};
use crate::ToolbarResult;

/// Mounted accessibility toolbar
pub struct Toolbar {
    pub(crate) config: ToolbarConfig,
    pub(crate) doc: Document,
    pub(crate) host: Box<dyn HostPage>,
    pub(crate) store: SettingsStore,
    pub(crate) status: StatusMap,
    pub(crate) defaults: StatusMap,
    pub(crate) keys: KeyIndex,
    pub(crate) groups: NodeGroups,
    pub(crate) panel: Panel,
    pub(crate) exclusive: ExclusiveGroups,
    pub(crate) speech: SpeechController,
    pub(crate) speech_lang: String,
    pub(crate) reader_active: bool,
}

/// Collects the collaborators of a toolbar before mounting it
pub struct ToolbarBuilder {
    document: Document,
    host: Box<dyn HostPage>,
    config: ToolbarConfig,
    storage: Option<Box<dyn KeyValueStore>>,
    speech: Option<SpeechController>,
}

impl ToolbarBuilder {
    pub fn config(mut self, config: ToolbarConfig) -> Self {
        self.config = config;
        self
    }
    
    /// Settings backend; in-memory when not given
    pub fn storage(mut self, storage: impl KeyValueStore + 'static) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }
    
    /// Screen reader; when not given, one without local voices that falls
    /// back to the configured remote provider
    pub fn speech(mut self, speech: SpeechController) -> Self {
        self.speech = Some(speech);
        self
    }
    
    /// Classify the page, render and attach the panel, then re-apply every
    /// stored setting
    pub fn mount(self) -> ToolbarResult<Toolbar> {
        let ToolbarBuilder { mut document, host, config, storage, speech } = self;
        
        let store = SettingsStore::new(storage.unwrap_or_else(|| Box::new(MemoryStore::new())), config.storage_key());
        let defaults = StatusMap::build(&config.items_list);
        let status = StatusMap::merged(&defaults, store.load());
        let exclusive = ExclusiveGroups::from_schema(&config.items_list);
        let keys = KeyIndex::build(&status, index_tags(&status, &exclusive).iter().map(String::as_str));
        
        let panel = Panel::build(&mut document, &config)?;
        let groups = classify(&document, Some(panel.wrapper()), &config.excluded_tags());
        
        let speech_lang = config.speech_lang.clone()
            .or_else(|| document.lang().map(str::to_string))
            .unwrap_or_else(|| "en".into());
        let speech = speech.unwrap_or_else(|| default_speech(&config));
        
        let mut toolbar = Toolbar {
            config,
            doc: document,
            host,
            store,
            status,
            defaults,
            keys,
            groups,
            panel,
            exclusive,
            speech,
            speech_lang,
            reader_active: false,
        };
        toolbar.attach()?;
        Ok(toolbar)
    }
}

fn index_tags(status: &StatusMap, exclusive: &ExclusiveGroups) -> Vec<String> {
    let mut tags: Vec<String> = OPERATION_TAGS.iter().map(|t| t.to_string()).collect();
    tags.extend(exclusive.members().map(str::to_string));
    for key in status.keys() {
        tags.push(key.to_string());
        if let Some(name) = key.strip_suffix("-slider") {
            tags.push(name.to_string());
        }
    }
    tags
}

fn default_speech(config: &ToolbarConfig) -> SpeechController {
    let remote = match config.remote_reader_source.build(&config.remote_speech) {
        Ok(remote) => Some(remote),
        Err(e) => {
            tracing::warn!("Remote speech unavailable: {}", e);
            None
        }
    };
    SpeechController::new(Box::new(NoVoices), Box::new(NullSink), remote)
}

impl Toolbar {
    pub fn builder(document: Document, host: impl HostPage + 'static) -> ToolbarBuilder {
        ToolbarBuilder {
            document,
            host: Box::new(host),
            config: ToolbarConfig::default(),
            storage: None,
            speech: None,
        }
    }
    
    fn attach(&mut self) -> ToolbarResult<()> {
        let wrapper = self.panel.wrapper();
        if self.config.hide_on_phone {
            let width = self.host.viewport_width();
            apply_phone_visibility(&mut self.doc, wrapper, &self.config.class("hide"), width);
        }
        
        let parent = self.mount_point();
        self.doc.tree_mut().append_child(parent, wrapper)?;
        
        let root = self.doc.document_element();
        let c = &self.config;
        self.doc.set_class(root, &c.class("static"), c.container.is_some());
        self.doc.add_class(root, &c.class(&format!("position-{}", c.position)));
        self.doc.add_class(root, &c.class(&format!("iconpos-{}", c.logo_position)));
        if c.set_dark_mode {
            self.doc.add_class(wrapper, &c.class("darkmode"));
        }
        self.doc.set_style(wrapper, "--ba-awidth", &c.width);
        if c.is_menu_opened {
            self.doc.add_class(wrapper, &c.class("open"));
        }
        self.speech.set_highlight_class(&c.class("speech-highlight"));
        
        for property in TEXT_RANGE_PROPERTIES {
            if self.status.contains_key(&format!("{property}-slider")) {
                capture_baselines(&mut self.doc, &self.groups.text, &self.config.class_name, property);
            }
        }
        
        let keys: Vec<String> = self.status.keys().map(str::to_string).collect();
        let replayed = keys.into_iter().filter(|k| self.dispatch(Trigger::Replay(k.clone()))).count();
        self.persist();
        
        tracing::info!(
            "Mounted toolbar {} with {} controls over {} nodes ({} settings replayed)",
            self.config.id,
            self.panel.controls().len(),
            self.groups.all.len(),
            replayed
        );
        Ok(())
    }
    
    /// Element the panel is appended to
    fn mount_point(&self) -> NodeId {
        let fallback = self.doc.body()
            .or_else(|| Some(self.doc.document_element()).filter(|n| n.is_valid()))
            .unwrap_or_else(|| self.doc.tree().root());
        let Some(selector) = &self.config.container else {
            return fallback;
        };
        match self.doc.query_selector_all(self.doc.tree().root(), selector).first() {
            Some(&container) => container,
            None => {
                tracing::warn!("Toolbar container {} not found, using body", selector);
                fallback
            }
        }
    }
    
    // === Accessors ===
    
    pub fn document(&self) -> &Document {
        &self.doc
    }
    
    pub fn config(&self) -> &ToolbarConfig {
        &self.config
    }
    
    pub fn status(&self) -> &StatusMap {
        &self.status
    }
    
    /// Status as built from the schema, before stored overrides
    pub fn defaults(&self) -> &StatusMap {
        &self.defaults
    }
    
    pub fn groups(&self) -> &NodeGroups {
        &self.groups
    }
    
    pub fn panel(&self) -> &Panel {
        &self.panel
    }
    
    pub fn speech(&self) -> &SpeechController {
        &self.speech
    }
    
    /// Language used for screen reading
    pub fn speech_lang(&self) -> &str {
        &self.speech_lang
    }
    
    /// Screen reader is listening for clicks and focus
    pub fn reader_active(&self) -> bool {
        self.reader_active
    }
    
    /// Panel element for a setting, e.g. `align-left` or `font-size-slider`
    pub fn control(&self, key: &str) -> Option<NodeId> {
        self.panel.resolve_key(key).map(|c| c.node)
    }
    
    // === Status ===
    
    /// Value of the status key an operation tag resolves to
    pub(crate) fn status_of(&self, tag: &str) -> &StatusValue {
        match self.keys.resolve(tag) {
            Some(key) => self.status.get(key),
            None => self.status.get(tag),
        }
    }
    
    pub(crate) fn set_status(&mut self, tag: &str, value: impl Into<StatusValue>) {
        match self.keys.resolve(tag) {
            Some(key) => {
                let key = key.to_string();
                self.status.set(&key, value);
            }
            None => tracing::debug!("No status key for operation {}", tag),
        }
    }
    
    pub(crate) fn flip_status(&mut self, tag: &str) -> bool {
        let Some(key) = self.keys.resolve(tag).map(str::to_string) else {
            tracing::debug!("No status key for operation {}", tag);
            return !self.status.is_truthy(tag);
        };
        self.status.flip(&key)
    }
    
    /// Write the status map to storage
    pub fn persist(&mut self) {
        self.store.save(&self.status);
    }
    
    // === Speech ===
    
    /// Drive pending remote synthesis and highlight expiry. Returns whether
    /// a synthesis is still in flight.
    pub fn poll_speech(&mut self, now: Instant) -> bool {
        self.speech.poll(&mut self.doc, now)
    }
    
    /// The local voice finished the current utterance
    pub fn utterance_ended(&mut self, now: Instant) {
        self.speech.utterance_ended(now);
    }
    
    /// Remote audio finished playing
    pub fn playback_ended(&mut self) {
        self.speech.playback_ended(&mut self.doc);
    }
}
