//! Simple Selectors
//!
//! Enough of the selector grammar for configuration-supplied lookups:
//! `tag`, `.class`, `#id`, `*` and comma-separated lists of those.

use crate::ElementData;

/// Simple selector for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Tag(String),
    Class(String),
    Id(String),
    Universal,
}

impl SimpleSelector {
    /// Parse a simple selector string
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        
        if s == "*" {
            Some(Self::Universal)
        } else if let Some(id) = s.strip_prefix('#') {
            Some(Self::Id(id.to_string()))
        } else if let Some(class) = s.strip_prefix('.') {
            Some(Self::Class(class.to_string()))
        } else {
            Some(Self::Tag(s.to_ascii_lowercase()))
        }
    }
    
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => element.tag == *tag,
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Class(class) => element.classes.contains(class),
        }
    }
}

/// Comma-separated selector list; matches if any member matches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorList(Vec<SimpleSelector>);

impl SelectorList {
    pub fn parse(s: &str) -> Self {
        Self(s.split(',').filter_map(SimpleSelector::parse).collect())
    }
    
    pub fn matches(&self, element: &ElementData) -> bool {
        self.0.iter().any(|sel| sel.matches(element))
    }
    
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_simple_selector_parse() {
        assert_eq!(SimpleSelector::parse("DIV"), Some(SimpleSelector::Tag("div".into())));
        assert!(matches!(SimpleSelector::parse(".class"), Some(SimpleSelector::Class(_))));
        assert!(matches!(SimpleSelector::parse("#id"), Some(SimpleSelector::Id(_))));
        assert_eq!(SimpleSelector::parse("*"), Some(SimpleSelector::Universal));
        assert_eq!(SimpleSelector::parse("  "), None);
    }
    
    #[test]
    fn test_selector_list_matches() {
        let list = SelectorList::parse("main, #main");
        let mut main = ElementData::new("main");
        assert!(list.matches(&main));
        
        let mut div = ElementData::new("div");
        assert!(!list.matches(&div));
        div.set_attr("id", "main");
        assert!(list.matches(&div));
        
        main.tag = "article".into();
        assert!(!list.matches(&main));
    }
}
