//! HTML Tailor - whitelist HTML sanitizer
//!
//! This library cleans untrusted markup by enforcing a per-tag whitelist over
//! the parsed document, and rewrites the strings held in structured data
//! through the same pipeline using field-level directives.
//!
//! # Architecture
//!
//! The library is structured into several modules:
//! - `parser`: HTML5 parsing using html5ever
//! - `dom`: node helpers over the rcdom tree
//! - `rule`: per-tag rules (keep, replace, remove) and attribute filtering
//! - `style`: inline CSS declaration filtering
//! - `policy`: tag-keyed rule collections
//! - `presets`: the standard, line-break and MathML policy sets
//! - `sanitizer`: default-deny tree walk
//! - `pipeline`: output levels and per-input session caching
//! - `blocklist`: forbidden-word replacement
//! - `rewrite`: object-graph rewriting via [`Tailorable`]
//! - `config`: JSON configuration
//!
//! # Examples
//!
//! ```
//! use html_tailor::{Directive, Level, Tailor, Tailorable};
//!
//! #[derive(Tailorable)]
//! struct Post {
//!     #[tailor]
//!     body: String,
//!     #[tailor(level = Text)]
//!     title: String,
//!     #[tailor(skip)]
//!     raw: String,
//! }
//!
//! let mut post = Post {
//!     body: "<p onclick=\"x()\">Hello</p><script>x()</script>".to_string(),
//!     title: "<b>Hi</b>".to_string(),
//!     raw: "<b>kept</b>".to_string(),
//! };
//!
//! let mut tailor = Tailor::standard();
//! tailor.rewrite(&mut post, Directive::default());
//! assert_eq!(post.body, "<p>Hello</p>");
//! assert_eq!(post.title, "Hi");
//! assert_eq!(post.raw, "<b>kept</b>");
//! ```

// Lets derive output name `::html_tailor` from inside this crate too
extern crate self as html_tailor;

// Module declarations
pub mod blocklist;
pub mod config;
pub mod dom;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod policy;
pub mod presets;
pub mod report;
pub mod rewrite;
pub mod rule;
pub mod sanitizer;
pub mod style;

// Re-export main types for convenience
pub use blocklist::Blocklist;
pub use config::TailorConfig;
pub use error::TailorError;
pub use html_tailor_derive::Tailorable;
pub use parser::parse_html;
pub use pipeline::{Level, Tailor};
pub use policy::PolicySet;
pub use report::Report;
pub use rewrite::{Directive, Tailorable};
pub use rule::{Operation, Rule};
pub use sanitizer::{Sanitized, sanitize, sanitize_html};
