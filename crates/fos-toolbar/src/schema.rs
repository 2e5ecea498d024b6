//! Option Schema
//!
//! Declarative description of every control the panel renders, keyed by
//! control identifier. Insertion order is significant: it is the render
//! order, the replay order and the order group members are processed in.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Key holding a section heading
pub const TITLE_KEY: &str = "title";

/// UI-only grouping key around the audio player controls
pub const PLAYER_UI_KEY: &str = "player-ui";

/// One schema entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaNode {
    /// Title text or button label
    Text(String),
    /// Range control
    Range(RangeDescriptor),
    /// Colour palette control
    Palette(PaletteDescriptor),
    /// Nested group
    Group(IndexMap<String, SchemaNode>),
}

/// `{label, min, max, step, value}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeDescriptor {
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
}

/// `{label, value}` where value is a comma-delimited palette
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteDescriptor {
    pub label: String,
    pub value: String,
}

impl PaletteDescriptor {
    pub fn colors(&self) -> impl Iterator<Item = &str> {
        self.value.split(',').map(str::trim).filter(|c| !c.is_empty())
    }
}

/// The whole `itemsList` tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSchema(IndexMap<String, SchemaNode>);

impl OptionSchema {
    /// Top-level entries (`header`, `body`)
    pub fn items(&self) -> &IndexMap<String, SchemaNode> {
        &self.0
    }
    
    /// The `body` section, whose groups hold every stateful control
    pub fn body(&self) -> Option<&IndexMap<String, SchemaNode>> {
        match self.0.get("body") {
            Some(SchemaNode::Group(body)) => Some(body),
            _ => None,
        }
    }
    
    /// Control identifiers one level below each body group, in order,
    /// without titles and the player grouping key
    pub fn control_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for group in self.body().into_iter().flat_map(|b| b.values()) {
            let SchemaNode::Group(entries) = group else { continue };
            for key in entries.keys() {
                if key != TITLE_KEY && key != PLAYER_UI_KEY && !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
        }
        keys
    }
    
    /// Members of a body group (title excluded), e.g. the blend modes
    pub fn group_members(&self, group: &str) -> Vec<String> {
        match self.body().and_then(|b| b.get(group)) {
            Some(SchemaNode::Group(entries)) => entries.keys()
                .filter(|k| *k != TITLE_KEY)
                .cloned()
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn text(s: &str) -> SchemaNode {
    SchemaNode::Text(s.to_string())
}

fn range(label: &str, min: f64, max: f64, step: f64, value: f64) -> SchemaNode {
    SchemaNode::Range(RangeDescriptor { label: label.into(), min, max, step, value })
}

fn palette(label: &str) -> SchemaNode {
    SchemaNode::Palette(PaletteDescriptor {
        label: label.into(),
        value: "#0076B4,#7A549C,#C83733,#D07021,#26999F,#4D7831,#ffffff,#000000".into(),
    })
}

fn group<const N: usize>(entries: [(&str, SchemaNode); N]) -> SchemaNode {
    SchemaNode::Group(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

impl Default for OptionSchema {
    fn default() -> Self {
        let header = group([
            ("title", text("Accessibility")),
            ("logo", text("Accessibility toolbar")),
            ("reset", text("Reset All")),
            ("darkmode", text("Dark mode")),
            ("action", text("close")),
        ]);
        let audio = group([
            ("title", text("Screen reader")),
            ("player-ui", group([
                ("audio-play", text("&nbsp;")),
                ("audio-rate-slider", range("Speed", 0.1, 2.0, 0.1, 1.0)),
                ("audio-volume-slider", range("Volume", 0.0, 1.0, 0.1, 0.8)),
            ])),
        ]);
        let font = group([
            ("title", text("Content adjustments")),
            ("font-size-slider", range("Font size", 0.0, 5.0, 0.1, 1.0)),
            ("line-height-slider", range("Line height", 0.0, 5.0, 0.1, 1.0)),
            ("letter-spacing-slider", range("Letter spacing", 0.0, 5.0, 0.1, 1.0)),
            ("page-zoom-slider", range("Zoom", 0.0, 2.0, 0.1, 1.0)),
            ("align-left", text("Align left")),
            ("align-center", text("Align center")),
            ("align-right", text("Align right")),
            ("highlight-heading", text("Highlight headings")),
            ("highlight-link", text("Highlight links")),
            ("highlight-hover", text("Highlight on hover")),
            ("readable-font", text("Readable font")),
            ("dyslexia-font", text("Dyslexia font")),
            ("text-magnifier", text("Text magnifier")),
        ]);
        let blend = group([
            ("title", text("Blend modes")),
            ("blend-invert", text("Invert")),
            ("blend-grayscale", text("Grayscale")),
            ("blend-dark-contrast", text("Dark contrast")),
            ("blend-light-contrast", text("Light contrast")),
            ("blend-low-saturation", text("Low saturation")),
            ("blend-high-saturation", text("High saturation")),
        ]);
        let other = group([
            ("title", text("Orientation")),
            ("hide-image", text("Hide images")),
            ("stop-animation", text("Stop animations")),
            ("read-mode", text("Read mode")),
            ("cursor-guide", text("Reading guide")),
            ("cursor-mask", text("Reading mask")),
            ("cursor-big", text("Big cursor")),
        ]);
        let colour = group([
            ("title", text("Colour adjustments")),
            ("background-color", palette("Background colour")),
            ("headline-color", palette("Headline colour")),
            ("text-color", palette("Text colour")),
        ]);
        let body = group([
            ("audio", audio),
            ("font", font),
            ("blend", blend),
            ("other", other),
            ("colour", colour),
        ]);
        
        let mut items = IndexMap::new();
        items.insert("header".to_string(), header);
        items.insert("body".to_string(), body);
        Self(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_control_keys_skip_titles_and_player() {
        let keys = OptionSchema::default().control_keys();
        assert_eq!(keys.first().map(String::as_str), Some("font-size-slider"));
        assert!(keys.iter().all(|k| k != TITLE_KEY && k != PLAYER_UI_KEY));
        assert!(keys.contains(&"blend-invert".to_string()));
        assert!(keys.contains(&"text-color".to_string()));
        // audio controls sit under player-ui and are not flattened
        assert!(!keys.contains(&"audio-play".to_string()));
    }
    
    #[test]
    fn test_group_members() {
        let blend = OptionSchema::default().group_members("blend");
        assert_eq!(blend.len(), 6);
        assert_eq!(blend[0], "blend-invert");
        assert!(OptionSchema::default().group_members("missing").is_empty());
    }
    
    #[test]
    fn test_deserialize_untagged_nodes() {
        let json = r##"{
            "body": {
                "font": {
                    "title": "Font",
                    "font-size-slider": {"label": "Size", "min": 0, "max": 5, "step": 0.1, "value": 1},
                    "align-left": "Left"
                },
                "colour": {
                    "text-color": {"label": "Text", "value": "#fff, #000"}
                }
            }
        }"##;
        let schema: OptionSchema = serde_json::from_str(json).unwrap();
        let body = schema.body().unwrap();
        let Some(SchemaNode::Group(font)) = body.get("font") else { panic!("font group") };
        match font.get("font-size-slider") {
            Some(SchemaNode::Range(r)) => assert_eq!(r.step, 0.1),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(font.get("align-left"), Some(&SchemaNode::Text("Left".into())));
        match body.get("colour") {
            Some(SchemaNode::Group(colour)) => match colour.get("text-color") {
                Some(SchemaNode::Palette(p)) => assert_eq!(p.colors().collect::<Vec<_>>(), vec!["#fff", "#000"]),
                other => panic!("unexpected {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(schema.control_keys(), vec!["font-size-slider", "align-left", "text-color"]);
    }
}
