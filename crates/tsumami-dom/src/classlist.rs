//! DOMTokenList (classList)
//!
//! Ordered set of space-separated tokens.

use std::fmt;

/// Token list backing `class` manipulation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMTokenList {
    tokens: Vec<String>,
}

impl DOMTokenList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a space-separated string, dropping duplicates
    pub fn from_string(s: &str) -> Self {
        let mut list = Self::new();
        list.add(&[s]);
        list
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at index
    pub fn item(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Add tokens. Each argument may hold several whitespace-separated tokens.
    pub fn add(&mut self, tokens: &[&str]) {
        for token in tokens.iter().flat_map(|t| t.split_whitespace()) {
            if !self.contains(token) {
                self.tokens.push(token.to_string());
            }
        }
    }

    /// Remove tokens. Each argument may hold several whitespace-separated tokens.
    pub fn remove(&mut self, tokens: &[&str]) {
        let doomed: Vec<&str> = tokens.iter().flat_map(|t| t.split_whitespace()).collect();
        self.tokens.retain(|t| !doomed.contains(&t.as_str()));
    }

    /// Toggle a token, returns whether it is present afterwards.
    /// `force` pins the outcome: `Some(true)` adds, `Some(false)` removes.
    pub fn toggle(&mut self, token: &str, force: Option<bool>) -> bool {
        let add = force.unwrap_or_else(|| !self.contains(token));
        if add {
            self.add(&[token]);
        } else {
            self.remove(&[token]);
        }
        add
    }

    /// Replace a token in place
    pub fn replace(&mut self, old_token: &str, new_token: &str) -> bool {
        let Some(pos) = self.tokens.iter().position(|t| t == old_token) else {
            return false;
        };
        if self.contains(new_token) {
            self.tokens.remove(pos);
        } else {
            self.tokens[pos] = new_token.to_string();
        }
        true
    }

    /// Serialised value
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl fmt::Display for DOMTokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_string_dedups() {
        let list = DOMTokenList::from_string("  btn btn-primary btn ");
        assert_eq!(list.len(), 2);
        assert_eq!(list.value(), "btn btn-primary");
    }

    #[test]
    fn test_add_remove_multi_token() {
        let mut list = DOMTokenList::new();
        list.add(&["foo bar", "baz"]);
        assert_eq!(list.value(), "foo bar baz");

        list.remove(&["foo baz"]);
        assert_eq!(list.value(), "bar");
    }

    #[test]
    fn test_toggle() {
        let mut list = DOMTokenList::new();

        assert!(list.toggle("active", None));
        assert!(!list.toggle("active", None));
        assert!(list.is_empty());

        assert!(list.toggle("active", Some(true)));
        assert!(list.toggle("active", Some(true)));
        assert_eq!(list.len(), 1);
        assert!(!list.toggle("active", Some(false)));
        assert!(!list.contains("active"));
    }

    #[test]
    fn test_replace() {
        let mut list = DOMTokenList::from_string("old keep");
        assert!(list.replace("old", "new"));
        assert_eq!(list.value(), "new keep");

        assert!(list.replace("new", "keep"));
        assert_eq!(list.value(), "keep");
        assert!(!list.replace("missing", "x"));
    }
}
