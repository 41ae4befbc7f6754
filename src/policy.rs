//! Tag-keyed rule collections
//!
//! A [`PolicySet`] holds at most one [`Rule`] per tag name. Registering a
//! rule for a tag that already has one replaces it, and the replacement
//! moves to the end of the scan order. Every set starts with passthrough
//! rules for the wrapper nodes the parser always synthesizes, so an empty
//! policy never strips the document skeleton itself.

use crate::dom::DOCUMENT_TAG;
use crate::rule::Rule;

/// Wrapper nodes present in every parsed document
pub const WRAPPER_TAGS: &[&str] = &[DOCUMENT_TAG, "html", "head", "body"];

/// An ordered set of rules, unique by tag name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicySet {
    rules: Vec<Rule>,
}

impl PolicySet {
    /// Creates a set holding only the wrapper passthrough rules
    pub fn new() -> Self {
        Self {
            rules: WRAPPER_TAGS.iter().map(|tag| Rule::keep(*tag)).collect(),
        }
    }

    /// Registers a rule, returning the rule it replaced
    pub fn insert(&mut self, rule: Rule) -> Option<Rule> {
        let replaced = self
            .rules
            .iter()
            .position(|existing| existing.tag_name() == rule.tag_name())
            .map(|index| self.rules.remove(index));
        self.rules.push(rule);
        replaced
    }

    /// Registers rules in order; later rules for the same tag win
    pub fn insert_all<I>(&mut self, rules: I)
    where
        I: IntoIterator<Item = Rule>,
    {
        for rule in rules {
            self.insert(rule);
        }
    }

    /// Builder form of [`PolicySet::insert`]
    pub fn with(mut self, rule: Rule) -> Self {
        self.insert(rule);
        self
    }

    pub fn get(&self, tag_name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.tag_name() == tag_name)
    }

    pub fn contains(&self, tag_name: &str) -> bool {
        self.get(tag_name).is_some()
    }

    /// Rules in scan order
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for PolicySet {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<Rule> for PolicySet {
    fn extend<I: IntoIterator<Item = Rule>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}

impl FromIterator<Rule> for PolicySet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        let mut set = Self::new();
        set.insert_all(iter);
        set
    }
}
