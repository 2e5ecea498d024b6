//! Action Dispatch
//!
//! Resolves a trigger to a panel control and runs every rule whose
//! predicate matches it, in table order. Rules read and write the status
//! map; user-originated triggers persist it afterwards.

use fos_dom::NodeId;

use crate::classify::NodeGroup;
use crate::effects::{
    apply_color, apply_page_zoom, apply_text_range, parse_float, position_pointer,
    relocate_for_reading, set_class_on, set_percent_label, toggle_class_on, RangeSpec,
    TEXT_RANGE_PROPERTIES,
};
use crate::engine::Toolbar;
use crate::panel::Control;
use crate::schema::OptionSchema;

/// What invoked an action
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// Pointer activation of a panel element at viewport coordinates
    Click { target: NodeId, x: f64, y: f64 },
    /// Keyboard activation of a panel element
    Key { target: NodeId },
    /// Re-application of a stored setting at mount
    Replay(String),
}

/// A resolved trigger
#[derive(Debug, Clone)]
pub struct Invocation {
    pub control: Control,
    /// Click or key, as opposed to replay
    pub user: bool,
    pub pointer: Option<(f64, f64)>,
}

impl Invocation {
    fn has(&self, fragment: &str) -> bool {
        self.control.has(fragment)
    }
    
    /// Range controls are reached through their +/- buttons on click and
    /// through the slider wrapper on replay
    fn is_range(&self) -> bool {
        self.has(if self.user { "range-" } else { "-slider" })
    }
}

/// `{predicate, effect}` entry of the dispatch table
pub(crate) struct Rule {
    pub name: &'static str,
    pub applies: fn(&Invocation) -> bool,
    pub apply: fn(&mut Toolbar, &Invocation),
}

pub(crate) const RULES: [Rule; 13] = [
    Rule { name: "read-mode", applies: |i| i.has("read-mode"), apply: read_mode },
    Rule { name: "range", applies: Invocation::is_range, apply: range },
    Rule { name: "toggle", applies: |i| TOGGLES.iter().any(|(n, _)| i.has(n)), apply: toggles },
    Rule { name: "align", applies: |i| i.has("align"), apply: |t, i| select(t, i, |g| &g.align) },
    Rule { name: "font", applies: |i| i.has("-font"), apply: |t, i| select(t, i, |g| &g.font) },
    Rule { name: "cursor", applies: |i| i.has("cursor"), apply: cursor },
    Rule { name: "audio-play", applies: |i| i.has("audio-play"), apply: audio_play },
    Rule { name: "blend", applies: |i| i.has("-blend"), apply: blend },
    Rule { name: "color", applies: |i| i.has("color"), apply: color },
    Rule { name: "active", applies: |i| !i.is_range() && !i.has("color"), apply: mark_active },
    Rule { name: "open", applies: |i| i.has("action"), apply: open_panel },
    Rule { name: "darkmode", applies: |i| i.has("darkmode"), apply: darkmode },
    Rule { name: "reset", applies: |i| i.user && i.has("reset"), apply: reset },
];

/// Independent on/off settings and the group each one targets
/// (`None` is the root element)
const TOGGLES: [(&str, Option<NodeGroup>); 6] = [
    ("heading", Some(NodeGroup::Heading)),
    ("link", Some(NodeGroup::Link)),
    ("hover", Some(NodeGroup::Text)),
    ("magnifier", None),
    ("hide-image", None),
    ("stop-animation", None),
];

/// Colour controls: `(identifier, CSS property, target group)`
const COLORS: [(&str, &str, NodeGroup); 3] = [
    ("background-color", "background", NodeGroup::BgExist),
    ("text-color", "color", NodeGroup::TextNoHeading),
    ("headline-color", "color", NodeGroup::Heading),
];

/// Tags resolved through the key index besides group members and status keys
pub(crate) const OPERATION_TAGS: [&str; 15] = [
    "read-mode", "heading", "link", "hover", "magnifier", "hide-image", "stop-animation",
    "audio-play", "audio-rate", "audio-volume", "audio-pitch", "darkmode",
    "background-color", "text-color", "headline-color",
];

// ============================================================================
// Exclusive groups
// ============================================================================

/// Settings of which at most one is on
#[derive(Debug, Clone)]
pub struct ExclusiveGroup {
    pub members: Vec<String>,
    /// Elements receiving `<className>-<member><suffix>`; `None` is the root
    pub target: Option<NodeGroup>,
    pub suffix: &'static str,
}

impl ExclusiveGroup {
    fn new(members: &[&str], target: Option<NodeGroup>, suffix: &'static str) -> Self {
        Self {
            members: members.iter().map(|m| m.to_string()).collect(),
            target,
            suffix,
        }
    }
}

/// The four exclusive groups of the toolbar
#[derive(Debug, Clone)]
pub struct ExclusiveGroups {
    pub align: ExclusiveGroup,
    pub font: ExclusiveGroup,
    pub cursor: ExclusiveGroup,
    pub blend: ExclusiveGroup,
}

impl ExclusiveGroups {
    pub fn from_schema(schema: &OptionSchema) -> Self {
        Self {
            align: ExclusiveGroup::new(&["left", "center", "right"], Some(NodeGroup::Text), "-font"),
            font: ExclusiveGroup::new(&["readable", "dyslexia"], None, "-font"),
            cursor: ExclusiveGroup::new(&["guide", "mask", "big"], None, "-cursor"),
            blend: ExclusiveGroup {
                members: schema.group_members("blend"),
                target: None,
                suffix: "-blend",
            },
        }
    }
    
    pub fn members(&self) -> impl Iterator<Item = &str> {
        [&self.align, &self.font, &self.cursor, &self.blend]
            .into_iter()
            .flat_map(|g| g.members.iter().map(String::as_str))
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

impl Toolbar {
    /// Run the rules for a trigger. Returns false when the trigger does not
    /// resolve to a control or, for a replay, the setting is not set.
    pub fn dispatch(&mut self, trigger: Trigger) -> bool {
        let (control, user, pointer) = match &trigger {
            Trigger::Click { target, x, y } => {
                (self.panel.resolve_click(&self.doc, *target).cloned(), true, Some((*x, *y)))
            }
            Trigger::Key { target } => (self.panel.resolve_click(&self.doc, *target).cloned(), true, None),
            Trigger::Replay(key) => {
                if !self.status.is_truthy(key) {
                    return false;
                }
                tracing::debug!("Replaying setting {}", key);
                (self.panel.resolve_key(key).cloned(), false, None)
            }
        };
        let Some(control) = control else {
            tracing::debug!("Trigger {:?} resolved to no control", trigger);
            return false;
        };
        
        let invocation = Invocation { control, user, pointer };
        for rule in &RULES {
            if (rule.applies)(&invocation) {
                tracing::debug!("Applying rule {} to {} (user: {})", rule.name, invocation.control.ident, user);
                (rule.apply)(self, &invocation);
            }
        }
        
        if user {
            self.persist();
        }
        true
    }
}

fn read_mode(tb: &mut Toolbar, inv: &Invocation) {
    if inv.user {
        tb.flip_status("read-mode");
    }
    let on = tb.status_of("read-mode").is_truthy();
    let root = tb.doc.document_element();
    tb.doc.set_class(root, &tb.config.class("read-mode"), on);
    
    if on {
        relocate_for_reading(&mut tb.doc, tb.panel.wrapper(), tb.panel.read_wrap(), &tb.config.read_mode_selector);
    } else if inv.user {
        tb.host.reload();
    }
}

fn range(tb: &mut Toolbar, inv: &Invocation) {
    let scope = if inv.user { tb.doc.tree().parent(inv.control.node) } else { Some(inv.control.node) };
    let Some(input) = scope.and_then(|s| tb.panel.find_within(&tb.doc, s, "range-input")) else {
        tracing::warn!("Range control {} has no input", inv.control.ident);
        return;
    };
    let Some(wrap) = tb.doc.tree().ancestors_inclusive(input).find(|&n| tb.doc.has_attr(n, "data-range")) else {
        return;
    };
    let name = tb.doc.attr(wrap, "data-range").unwrap_or_default();
    let spec = RangeSpec::from_input(&tb.doc, input);
    let declared = tb.doc.attr(wrap, "data-value").unwrap_or_default();
    let default = parse_float(&declared).map(|d| spec.normalize(d)).unwrap_or(declared);
    
    let value = if inv.user {
        let current = tb.doc.attr(input, "value").as_deref().and_then(parse_float).unwrap_or(spec.min);
        let delta = if inv.has("plus") { spec.step } else { -spec.step };
        spec.normalize(current + delta)
    } else {
        match tb.status_of(&name).as_f64() {
            Some(stored) => spec.normalize(stored),
            None => default.clone(),
        }
    };
    tb.doc.set_attr(input, "value", &value);
    if inv.user {
        tb.set_status(&name, value.clone());
    }
    
    if value != default {
        tb.doc.set_attr(wrap, "data-enable", "1");
    } else {
        tb.doc.remove_attr(wrap, "data-enable");
    }
    
    if name.contains("zoom") {
        apply_page_zoom(&mut tb.doc, tb.host.as_mut(), &value);
    } else if TEXT_RANGE_PROPERTIES.contains(&name.as_str()) {
        apply_text_range(&mut tb.doc, &tb.groups.text, &tb.config.class_name, &name, &value, &default);
    }
    set_percent_label(&mut tb.doc, input, parse_float(&value).unwrap_or(1.0));
}

fn toggles(tb: &mut Toolbar, inv: &Invocation) {
    let root = tb.doc.document_element();
    for (name, group) in TOGGLES {
        if !inv.has(name) {
            continue;
        }
        let class = tb.config.class(name);
        match group {
            Some(group) => toggle_class_on(&mut tb.doc, tb.groups.get(group), &class),
            None => {
                tb.doc.toggle_class(root, &class);
            }
        }
        if inv.user {
            tb.flip_status(name);
        }
    }
}

/// Turn the invoked member of an exclusive group on or off and every other
/// member off, along with its button's active marker.
fn select(tb: &mut Toolbar, inv: &Invocation, pick: fn(&ExclusiveGroups) -> &ExclusiveGroup) {
    let group = pick(&tb.exclusive).clone();
    let targets: Vec<NodeId> = match group.target {
        Some(g) => tb.groups.get(g).to_vec(),
        None => vec![tb.doc.document_element()],
    };
    let active = tb.config.class("active");
    
    for member in &group.members {
        let class = tb.config.class(&format!("{member}{}", group.suffix));
        if inv.has(member) {
            toggle_class_on(&mut tb.doc, &targets, &class);
            if inv.user {
                tb.flip_status(member);
            }
        } else {
            set_class_on(&mut tb.doc, &targets, &class, false);
            if let Some(sibling) = tb.panel.button(member).map(|c| c.node) {
                tb.doc.remove_class(sibling, &active);
            }
            if inv.user {
                tb.set_status(member, false);
            }
        }
    }
}

fn cursor(tb: &mut Toolbar, inv: &Invocation) {
    select(tb, inv, |g| &g.cursor);
    if let Some((x, y)) = inv.pointer {
        position_pointer(&mut tb.doc, &[tb.panel.cursor()], x, y);
    }
}

fn audio_play(tb: &mut Toolbar, inv: &Invocation) {
    if inv.user {
        tb.flip_status("audio-play");
    }
    let on = tb.status_of("audio-play").is_truthy();
    let root = tb.doc.document_element();
    tb.doc.set_class(root, &tb.config.class("audio-play"), on);
    
    tb.reader_active = on;
    if !on {
        tb.speech.stop(&mut tb.doc);
    }
    tracing::info!("Screen reader {}", if on { "enabled" } else { "disabled" });
}

fn blend(tb: &mut Toolbar, inv: &Invocation) {
    select(tb, inv, |g| &g.blend);
    
    let contrast = inv.has("-contrast") && tb.exclusive.blend.members.iter()
        .find(|m| inv.has(m))
        .is_some_and(|m| tb.status_of(m).is_truthy());
    set_class_on(&mut tb.doc, &tb.groups.bg_exist, &tb.config.class("contrast"), contrast);
}

fn color(tb: &mut Toolbar, inv: &Invocation) {
    let tree = tb.doc.tree();
    let body = if inv.user { tree.parent(inv.control.node) } else { tree.last_element_child(inv.control.node) };
    let Some(body) = body else { return };
    let Some(color_name) = tb.doc.attr(body, "data-rel") else { return };
    let active = tb.config.class("active");
    
    for (icon, property, group) in COLORS {
        if !color_name.contains(icon) {
            continue;
        }
        let swatches: Vec<NodeId> = tb.doc.tree().element_children(body).collect();
        for swatch in swatches {
            let swatch_color = tb.doc.attr(swatch, "data-color").unwrap_or_default();
            if inv.user {
                if swatch == inv.control.node {
                    tb.set_status(&color_name, swatch_color);
                    tb.doc.add_class(swatch, &active);
                } else {
                    tb.doc.remove_class(swatch, &active);
                }
            } else if tb.status_of(&color_name).as_str() == Some(swatch_color.as_str()) {
                tb.doc.add_class(swatch, &active);
            }
        }
        
        if tb.status_of(icon).is_truthy() {
            let value = tb.status_of(&color_name).to_string();
            let mut targets = tb.groups.get(group).to_vec();
            if let (NodeGroup::BgExist, Some(body)) = (group, tb.doc.body()) {
                targets.insert(0, body);
            }
            apply_color(&mut tb.doc, &targets, property, &value);
        }
    }
}

fn mark_active(tb: &mut Toolbar, inv: &Invocation) {
    tb.doc.toggle_class(inv.control.node, &tb.config.class("active"));
}

fn open_panel(tb: &mut Toolbar, _inv: &Invocation) {
    let wrapper = tb.panel.wrapper();
    tb.doc.toggle_class(wrapper, &tb.config.class("open"));
}

fn darkmode(tb: &mut Toolbar, inv: &Invocation) {
    let wrapper = tb.panel.wrapper();
    tb.doc.toggle_class(wrapper, &tb.config.class("darkmode"));
    if inv.user {
        tb.flip_status("darkmode");
    }
}

fn reset(tb: &mut Toolbar, _inv: &Invocation) {
    tb.status.merge(tb.defaults.clone());
    tracing::info!("Settings reset to defaults");
    tb.host.reload();
}
