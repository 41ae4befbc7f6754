//! Whitelist enforcement over a parsed document
//!
//! The sanitizer walks every node of a document once, in document order,
//! and lets the first rule of the [`PolicySet`] that matches decide what
//! happens to it. Elements no rule matches are removed together with their
//! content (default-deny).
//!
//! # Traversal
//!
//! The node list is materialized before anything is mutated. Removing or
//! renaming a node therefore never disturbs the walk; descendants of a
//! removed node are still in the list but are skipped, since they are no
//! longer part of the document.
//!
//! Text nodes pass through inside kept elements. Comments, doctypes and
//! processing instructions carry no tag any rule could match and are always
//! dropped.

use markup5ever_rcdom::{Handle, NodeData};

use crate::dom;
use crate::parser::parse_html;
use crate::policy::PolicySet;
use crate::report::Report;

/// Output of one sanitization run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    /// Serialized content of the `body` element
    pub html: String,
    /// What the run stripped
    pub report: Report,
}

/// Sanitizes a document in place and serializes its body
///
/// The document is mutated; callers that need the original afterwards
/// should pass a [`dom::deep_clone`].
pub fn sanitize(document: &Handle, policies: &PolicySet) -> Sanitized {
    let nodes = dom::materialize(document);
    let mut removed = vec![false; nodes.len()];
    let mut report = Report::default();

    for (index, node) in nodes.iter().enumerate() {
        if let Some(parent) = node.parent
            && removed[parent]
        {
            removed[index] = true;
            continue;
        }

        match node.handle.data {
            NodeData::Text { .. } => continue,
            NodeData::Comment { .. }
            | NodeData::Doctype { .. }
            | NodeData::ProcessingInstruction { .. } => {
                dom::detach(&node.handle);
                removed[index] = true;
                continue;
            }
            NodeData::Document | NodeData::Element { .. } => {}
        }

        match policies.iter().find_map(|rule| rule.apply(&node.handle)) {
            Some(applied) => {
                removed[index] = applied.removed_tag;
                report.merge(applied);
            }
            None => {
                dom::detach(&node.handle);
                removed[index] = true;
                report.removed_tag = true;
            }
        }
    }

    tracing::debug!(
        nodes = nodes.len(),
        removed_tag = report.removed_tag,
        removed_attribute = report.removed_attribute,
        removed_style = report.removed_style,
        blocked_url = report.blocked_url,
        "sanitization finished"
    );

    let html = dom::body(document)
        .map(|body| dom::inner_html(&body))
        .unwrap_or_default();

    Sanitized { html, report }
}

/// Parses and sanitizes a markup string
///
/// # Examples
///
/// ```
/// use html_tailor::policy::PolicySet;
/// use html_tailor::rule::Rule;
/// use html_tailor::sanitizer::sanitize_html;
///
/// let policies = PolicySet::new().with(Rule::keep("div"));
/// let out = sanitize_html("<div>ok</div><script>bad()</script>", &policies);
/// assert_eq!(out.html, "<div>ok</div>");
/// assert!(out.report.removed_tag);
/// ```
pub fn sanitize_html(html: &str, policies: &PolicySet) -> Sanitized {
    let dom = parse_html(html);
    sanitize(&dom.document, policies)
}
