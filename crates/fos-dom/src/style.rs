//! Inline Style Declaration
//!
//! The `style` attribute of an element as an ordered list of
//! declarations. Custom properties (`--name`) are stored alongside
//! regular ones.

/// Ordered inline declarations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    decls: Vec<(String, String)>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Parse `prop: value; prop2: value2`
    pub fn parse(text: &str) -> Self {
        let mut style = Self::new();
        for decl in text.split(';') {
            if let Some((prop, value)) = decl.split_once(':') {
                style.set(prop.trim(), value.trim());
            }
        }
        style
    }
    
    /// Get a declared value
    pub fn get(&self, prop: &str) -> Option<&str> {
        self.decls.iter()
            .find(|(p, _)| p == prop)
            .map(|(_, v)| v.as_str())
    }
    
    /// Set a declaration. An empty value removes it, like assigning `''`
    /// through CSSOM.
    pub fn set(&mut self, prop: &str, value: &str) {
        if value.is_empty() {
            self.remove(prop);
            return;
        }
        let prop = normalize_property(prop);
        match self.decls.iter_mut().find(|(p, _)| *p == prop) {
            Some(decl) => decl.1 = value.to_string(),
            None => self.decls.push((prop, value.to_string())),
        }
    }
    
    /// Remove a declaration, returning its previous value
    pub fn remove(&mut self, prop: &str) -> Option<String> {
        let prop = normalize_property(prop);
        let pos = self.decls.iter().position(|(p, _)| *p == prop)?;
        Some(self.decls.remove(pos).1)
    }
    
    pub fn len(&self) -> usize {
        self.decls.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
    
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.decls.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }
    
    /// Serialize back to `style` attribute text
    pub fn css_text(&self) -> String {
        self.decls.iter()
            .map(|(p, v)| format!("{p}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Custom properties are case-sensitive; everything else is lower-cased.
fn normalize_property(prop: &str) -> String {
    if prop.starts_with("--") {
        prop.to_string()
    } else {
        prop.to_ascii_lowercase()
    }
}
