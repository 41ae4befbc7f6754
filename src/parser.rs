//! HTML5 parser using html5ever
//!
//! This module provides HTML parsing functionality that handles malformed
//! markup gracefully according to the HTML5 specification.
//!
//! # Overview
//!
//! The parser uses Mozilla's html5ever library, which implements the WHATWG HTML5
//! parsing algorithm. This ensures that even malformed HTML is parsed consistently
//! and predictably, following the same rules as modern web browsers.
//!
//! Every input is parsed as a full document, so the tree always carries the
//! synthetic wrapper nodes (document root, `html`, `head`, `body`) the policy
//! sets are seeded with. Tag names come out lowercased.
//!
//! # Examples
//!
//! ```rust
//! use html_tailor::parser::parse_html;
//!
//! // Fragments are wrapped in html/body
//! let dom = parse_html("<b>Hello");
//! assert!(html_tailor::dom::body(&dom.document).is_some());
//! ```
//!
//! # Configuration
//!
//! The parser uses default html5ever configuration:
//! - **Scripting**: Disabled (scripts are not executed)
//! - **Error Handling**: Errors are collected but parsing continues
//! - **Tree Builder**: Uses RcDom for reference-counted DOM nodes

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::RcDom;

/// Parse an HTML string into a DOM tree
///
/// Parsing is total: html5ever recovers from any malformed markup, so the
/// empty string yields a document with empty `head` and `body` elements.
///
/// # Examples
///
/// ```rust
/// use html_tailor::parser::parse_html;
///
/// // Misnested tags are repaired rather than rejected
/// let dom = parse_html("<b><i>text</b></i>");
/// let body = html_tailor::dom::body(&dom.document).expect("body element");
/// assert_eq!(html_tailor::dom::inner_html(&body), "<b><i>text</i></b>");
/// ```
pub fn parse_html(html: &str) -> RcDom {
    // Parse directly from a string sink to avoid `std::io::Read` overhead.
    parse_document(RcDom::default(), Default::default()).one(html)
}
