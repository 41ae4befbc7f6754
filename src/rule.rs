//! Per-tag whitelist rules
//!
//! A [`Rule`] decides the fate of every element carrying its tag name:
//! keep it, rename it, or remove it. Kept and renamed elements then have
//! their attributes, class tokens, URLs and inline styles filtered against
//! the rule's whitelists.
//!
//! Rules are immutable once built. Applying one never mutates the rule; the
//! flags describing what was stripped come back as a [`Report`].
//!
//! # Examples
//!
//! ```
//! use html_tailor::rule::Rule;
//!
//! let rule = Rule::keep("a")
//!     .allow_attributes(["href", "title"])
//!     .allow_url(["https://"]);
//! assert_eq!(rule.tag_name(), "a");
//! ```

use std::collections::HashSet;

use markup5ever_rcdom::Handle;
use serde::{Deserialize, Serialize};

use crate::dom;
use crate::report::Report;
use crate::style::filter_style;

/// Tag used by a `Replace` rule that names no replacement
pub const DEFAULT_REPLACE_TAG: &str = "div";

/// Attributes whose values are gated by a rule's URL whitelist
const URL_ATTRIBUTES: &[&str] = &["src", "href"];

/// What to do with a matched element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Keep the element and filter its attributes
    #[default]
    Keep,
    /// Rename the element, then filter its attributes
    Replace,
    /// Remove the element and everything inside it
    Remove,
}

/// A sanitization policy for one tag name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    tag_name: String,
    #[serde(default)]
    operation: Operation,
    #[serde(default)]
    allow_attributes: HashSet<String>,
    #[serde(default)]
    allow_class: HashSet<String>,
    #[serde(default)]
    allow_style: HashSet<String>,
    #[serde(default)]
    allow_url: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    replace_tag: Option<String>,
}

impl Rule {
    fn new(tag_name: impl Into<String>, operation: Operation) -> Self {
        Self {
            tag_name: tag_name.into(),
            operation,
            allow_attributes: HashSet::new(),
            allow_class: HashSet::new(),
            allow_style: HashSet::new(),
            allow_url: Vec::new(),
            replace_tag: None,
        }
    }

    /// Keeps elements with this tag, stripping every attribute until some are allowed
    pub fn keep(tag_name: impl Into<String>) -> Self {
        Self::new(tag_name, Operation::Keep)
    }

    /// Renames elements with this tag to `replace_tag`
    pub fn replace(tag_name: impl Into<String>, replace_tag: impl Into<String>) -> Self {
        let mut rule = Self::new(tag_name, Operation::Replace);
        rule.replace_tag = Some(replace_tag.into());
        rule
    }

    /// Removes elements with this tag together with their content
    pub fn remove(tag_name: impl Into<String>) -> Self {
        Self::new(tag_name, Operation::Remove)
    }

    /// Adds attribute keys that survive filtering
    pub fn allow_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_attributes
            .extend(attributes.into_iter().map(Into::into));
        self
    }

    /// Adds class tokens that survive filtering
    ///
    /// Only takes effect when `class` is an allowed attribute.
    pub fn allow_class<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_class.extend(classes.into_iter().map(Into::into));
        self
    }

    /// Adds CSS properties that survive inside `style`
    pub fn allow_style<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_style
            .extend(properties.into_iter().map(Into::into));
        self
    }

    /// Appends URL prefixes accepted for `src`, `href` and style `url(...)`
    pub fn allow_url<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for prefix in prefixes {
            let prefix = prefix.into();
            if !self.allow_url.contains(&prefix) {
                self.allow_url.push(prefix);
            }
        }
        self
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The tag a `Replace` rule renames to
    pub fn replace_tag(&self) -> &str {
        self.replace_tag.as_deref().unwrap_or(DEFAULT_REPLACE_TAG)
    }

    /// Returns true if this rule governs `node`
    pub fn matches(&self, node: &Handle) -> bool {
        dom::tag_name(node).as_deref() == Some(self.tag_name.as_str())
    }

    /// Applies the rule to `node`
    ///
    /// Returns `None` if the tag does not match, leaving the node untouched.
    /// Otherwise the node has been kept, renamed or detached, and the report
    /// says what was stripped.
    pub fn apply(&self, node: &Handle) -> Option<Report> {
        if !self.matches(node) {
            return None;
        }

        let report = match self.operation {
            Operation::Remove => {
                dom::detach(node);
                Report {
                    removed_tag: true,
                    ..Report::default()
                }
            }
            Operation::Keep => self.filter(node),
            Operation::Replace => {
                let renamed = dom::rename(node, self.replace_tag());
                self.filter(&renamed)
            }
        };
        Some(report)
    }

    fn filter(&self, node: &Handle) -> Report {
        let mut report = self.filter_attributes(node);
        report.merge(self.filter_style(node));
        report
    }

    fn filter_attributes(&self, node: &Handle) -> Report {
        let mut report = Report::default();

        for name in dom::attribute_names(node) {
            if !self.allow_attributes.contains(&name) {
                dom::remove_attribute(node, &name);
                report.removed_attribute = true;
            }
        }

        if !self.allow_class.is_empty()
            && self.allow_attributes.contains("class")
            && dom::has_attribute(node, "class")
        {
            let kept: Vec<String> = dom::class_names(node)
                .into_iter()
                .filter(|name| self.allow_class.contains(name))
                .collect();
            dom::set_class_names(node, &kept);
        }

        if !self.allow_url.is_empty() {
            for name in URL_ATTRIBUTES {
                if !self.allow_attributes.contains(*name) {
                    continue;
                }
                if let Some(value) = dom::get_attribute(node, name)
                    && !self.url_allowed(&value)
                {
                    dom::remove_attribute(node, name);
                    report.blocked_url = true;
                }
            }
        }

        report
    }

    fn filter_style(&self, node: &Handle) -> Report {
        let Some(style) = dom::get_attribute(node, "style") else {
            return Report::default();
        };

        let outcome = filter_style(&style, &self.allow_style, &self.allow_url);
        match outcome.style {
            Some(ref rebuilt) => dom::set_attribute(node, "style", rebuilt),
            None => {
                dom::remove_attribute(node, "style");
            }
        }

        Report {
            removed_style: outcome.removed,
            blocked_url: outcome.blocked_url,
            ..Report::default()
        }
    }

    /// Raw, case-sensitive prefix match of an attribute URL
    fn url_allowed(&self, url: &str) -> bool {
        self.allow_url
            .iter()
            .any(|prefix| url.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_html;
    use markup5ever_rcdom::RcDom;

    fn find(dom: &RcDom, tag: &str) -> Handle {
        dom::materialize(&dom.document)
            .into_iter()
            .map(|node| node.handle)
            .find(|handle| dom::tag_name(handle).as_deref() == Some(tag))
            .expect("element should exist")
    }

    fn body_html(dom: &RcDom) -> String {
        dom::inner_html(&dom::body(&dom.document).unwrap())
    }

    #[test]
    fn test_no_match_is_not_handled() {
        let dom = parse_html(r#"<p title="t">x</p>"#);
        let p = find(&dom, "p");
        assert_eq!(Rule::keep("div").apply(&p), None);
        assert_eq!(body_html(&dom), r#"<p title="t">x</p>"#);
    }

    #[test]
    fn test_remove_detaches_and_flags() {
        let dom = parse_html("<p>a</p><script>bad()</script>");
        let script = find(&dom, "script");
        let report = Rule::remove("script").apply(&script).unwrap();
        assert!(report.removed_tag);
        assert_eq!(body_html(&dom), "<p>a</p>");
    }

    #[test]
    fn test_keep_strips_unlisted_attributes() {
        let dom = parse_html(r#"<p title="t" onclick="x()" lang="en">x</p>"#);
        let p = find(&dom, "p");
        let report = Rule::keep("p")
            .allow_attributes(["title", "lang"])
            .apply(&p)
            .unwrap();
        assert!(report.removed_attribute);
        assert!(!report.removed_tag);
        assert_eq!(body_html(&dom), r#"<p title="t" lang="en">x</p>"#);
    }

    #[test]
    fn test_keep_without_whitelist_strips_everything() {
        let dom = parse_html(r#"<b class="c" style="color:red">x</b>"#);
        let b = find(&dom, "b");
        let report = Rule::keep("b").apply(&b).unwrap();
        assert!(report.removed_attribute);
        assert!(!report.removed_style);
        assert_eq!(body_html(&dom), "<b>x</b>");
    }

    #[test]
    fn test_clean_element_reports_nothing() {
        let dom = parse_html(r#"<p title="t">x</p>"#);
        let p = find(&dom, "p");
        let report = Rule::keep("p").allow_attributes(["title"]).apply(&p).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_class_intersection_preserves_order() {
        let dom = parse_html(r#"<span class="a b c d">x</span>"#);
        let span = find(&dom, "span");
        let report = Rule::keep("span")
            .allow_attributes(["class"])
            .allow_class(["d", "b"])
            .apply(&span)
            .unwrap();
        assert!(!report.removed_attribute);
        assert_eq!(body_html(&dom), r#"<span class="b d">x</span>"#);
    }

    #[test]
    fn test_class_without_survivors_is_removed() {
        let dom = parse_html(r#"<span class="a">x</span>"#);
        let span = find(&dom, "span");
        Rule::keep("span")
            .allow_attributes(["class"])
            .allow_class(["z"])
            .apply(&span)
            .unwrap();
        assert_eq!(body_html(&dom), "<span>x</span>");
    }

    #[test]
    fn test_class_whitelist_ignored_when_class_not_allowed() {
        let dom = parse_html(r#"<span class="a">x</span>"#);
        let span = find(&dom, "span");
        let report = Rule::keep("span").allow_class(["a"]).apply(&span).unwrap();
        assert!(report.removed_attribute);
        assert_eq!(body_html(&dom), "<span>x</span>");
    }

    #[test]
    fn test_url_gate_removes_unlisted_href() {
        let dom = parse_html(r#"<a href="https://y/evil" title="t">x</a>"#);
        let a = find(&dom, "a");
        let report = Rule::keep("a")
            .allow_attributes(["href", "title"])
            .allow_url(["https://x/"])
            .apply(&a)
            .unwrap();
        assert!(report.blocked_url);
        assert!(!report.removed_attribute);
        assert_eq!(body_html(&dom), r#"<a title="t">x</a>"#);
    }

    #[test]
    fn test_url_gate_keeps_listed_src() {
        let dom = parse_html(r#"<img src="//cdn.example/a.png">"#);
        let img = find(&dom, "img");
        let report = Rule::keep("img")
            .allow_attributes(["src"])
            .allow_url(["https://", "//"])
            .apply(&img)
            .unwrap();
        assert!(report.is_clean());
        assert_eq!(body_html(&dom), r#"<img src="//cdn.example/a.png">"#);
    }

    #[test]
    fn test_url_gate_is_case_sensitive() {
        let dom = parse_html(r#"<a href="HTTPS://x/">x</a>"#);
        let a = find(&dom, "a");
        Rule::keep("a")
            .allow_attributes(["href"])
            .allow_url(["https://"])
            .apply(&a)
            .unwrap();
        assert_eq!(body_html(&dom), "<a>x</a>");
    }

    #[test]
    fn test_no_url_whitelist_leaves_href_to_attribute_whitelist() {
        let dom = parse_html(r#"<a href="anything:at-all">x</a>"#);
        let a = find(&dom, "a");
        let report = Rule::keep("a").allow_attributes(["href"]).apply(&a).unwrap();
        assert!(report.is_clean());
        assert_eq!(body_html(&dom), r#"<a href="anything:at-all">x</a>"#);
    }

    #[test]
    fn test_style_filtering() {
        let dom = parse_html(r#"<p style="color:red;display:flex">x</p>"#);
        let p = find(&dom, "p");
        let report = Rule::keep("p")
            .allow_attributes(["style"])
            .allow_style(["color"])
            .apply(&p)
            .unwrap();
        assert!(report.removed_style);
        assert_eq!(body_html(&dom), r#"<p style="color:red">x</p>"#);
    }

    #[test]
    fn test_style_removed_when_nothing_survives() {
        let dom = parse_html(r#"<p style="position:fixed">x</p>"#);
        let p = find(&dom, "p");
        Rule::keep("p")
            .allow_attributes(["style"])
            .allow_style(["color"])
            .apply(&p)
            .unwrap();
        assert_eq!(body_html(&dom), "<p>x</p>");
    }

    #[test]
    fn test_replace_renames_and_filters() {
        let dom = parse_html(r#"<div class="x">t</div>"#);
        let div = find(&dom, "div");
        let report = Rule::replace("div", "p").apply(&div).unwrap();
        assert!(report.removed_attribute);
        assert_eq!(body_html(&dom), "<p>t</p>");
    }

    #[test]
    fn test_replace_defaults_to_div() {
        let rule: Rule = serde_json::from_str(r#"{"tag_name":"center","operation":"replace"}"#)
            .expect("rule should deserialize");
        assert_eq!(rule.replace_tag(), DEFAULT_REPLACE_TAG);

        let dom = parse_html("<center>t</center>");
        let center = find(&dom, "center");
        rule.apply(&center).unwrap();
        assert_eq!(body_html(&dom), "<div>t</div>");
    }

    #[test]
    fn test_rule_deserializes_from_json() {
        let rule: Rule = serde_json::from_str(
            r#"{
                "tag_name": "img",
                "allow_attributes": ["src", "alt"],
                "allow_url": ["https://", "//"]
            }"#,
        )
        .unwrap();
        assert_eq!(rule.operation(), Operation::Keep);
        assert_eq!(rule, Rule::keep("img").allow_attributes(["alt", "src"]).allow_url(["https://", "//"]));
    }
}
