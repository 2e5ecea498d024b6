//! UI Events
//!
//! Page-level input the host forwards to the toolbar.

use fos_dom::NodeId;
use fos_speech::{SpeechParams, SpeechRoute};

use crate::dispatch::Trigger;
use crate::effects::{apply_phone_visibility, parse_float, position_pointer, set_percent_label, RangeSpec};
use crate::engine::Toolbar;

/// `KeyboardEvent.which` of the `2`/`@` key
const DIGIT_TWO: u32 = 50;

/// Input event
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Click { target: NodeId, x: f64, y: f64 },
    Focus { target: NodeId },
    KeyDown { key: String, code: u32, shift: bool },
    MouseMove { x: f64, y: f64 },
    MouseOver { target: NodeId },
    /// A range input's value changed by dragging
    RangeInput { input: NodeId, value: String },
    Resize { viewport_width: f64 },
}

impl Toolbar {
    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Click { target, x, y } => {
                // the reader sees the click before the panel does
                self.read_aloud(target);
                if self.doc.tree().contains(self.panel.wrapper(), target) {
                    self.dispatch(Trigger::Click { target, x, y });
                }
            }
            UiEvent::Focus { target } => {
                self.read_aloud(target);
            }
            UiEvent::KeyDown { key, code, shift } => {
                if key == "@" || (code == DIGIT_TWO && shift) {
                    if let Some(play) = self.panel.button("audio-play").map(|c| c.node) {
                        self.dispatch(Trigger::Key { target: play });
                    }
                }
            }
            UiEvent::MouseMove { x, y } => {
                let root = self.doc.class_name(self.doc.document_element());
                if root.contains("-cursor") || root.contains("magnifier") {
                    let followers = [self.panel.cursor(), self.panel.tip()];
                    position_pointer(&mut self.doc, &followers, x, y);
                }
            }
            UiEvent::MouseOver { target } => {
                let root = self.doc.class_name(self.doc.document_element());
                if root.contains("magnifier") {
                    let over_text = self.groups.text.contains(&target);
                    let text = if over_text { self.doc.tree().text_content(target) } else { String::new() };
                    let tip = self.panel.tip();
                    self.doc.tree_mut().set_text_content(tip, &text);
                    self.doc.set_style(tip, "display", if over_text { "block" } else { "none" });
                }
            }
            UiEvent::RangeInput { input, value } => self.range_input(input, &value),
            UiEvent::Resize { viewport_width } => {
                if self.config.hide_on_phone {
                    let wrapper = self.panel.wrapper();
                    apply_phone_visibility(&mut self.doc, wrapper, &self.config.class("hide"), viewport_width);
                }
            }
        }
    }
    
    /// Click a panel element at the origin
    pub fn click(&mut self, target: NodeId) {
        self.handle_event(UiEvent::Click { target, x: 0.0, y: 0.0 });
    }
    
    /// Read `target` aloud when the reader is on and it has text of its own
    fn read_aloud(&mut self, target: NodeId) -> SpeechRoute {
        if !self.reader_active
            || !self.doc.tree().has_direct_text(target)
            || self.doc.inner_text(target).is_empty()
        {
            return SpeechRoute::Skipped;
        }
        let params = SpeechParams {
            lang: self.speech_lang.clone(),
            rate: self.status_of("audio-rate").as_f64().unwrap_or(1.0),
            volume: self.status_of("audio-volume").as_f64().unwrap_or(0.8),
            pitch: self.status_of("audio-pitch").as_f64().unwrap_or(1.0),
        };
        let route = self.speech.speak(&mut self.doc, target, &params);
        tracing::debug!("Read request for {:?} via {:?}", target, route);
        route
    }
    
    /// Dragging a slider records the value without applying its effect
    fn range_input(&mut self, input: NodeId, value: &str) {
        let tree = self.doc.tree();
        let Some(wrap) = tree.ancestors_inclusive(input).find(|&n| self.doc.has_attr(n, "data-range")) else {
            return;
        };
        let name = self.doc.attr(wrap, "data-range").unwrap_or_default();
        let spec = RangeSpec::from_input(&self.doc, input);
        let Some(number) = parse_float(value) else {
            tracing::debug!("Ignoring non-numeric input {:?} for {}", value, name);
            return;
        };
        let value = spec.normalize(number);
        
        self.doc.set_attr(input, "value", &value);
        set_percent_label(&mut self.doc, input, parse_float(&value).unwrap_or(number));
        self.set_status(&name, value);
        self.persist();
    }
}
