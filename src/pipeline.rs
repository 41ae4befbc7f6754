//! Output levels over one parsed input
//!
//! A [`Tailor`] turns an untrusted string into one of several output
//! variants, selected by [`Level`]:
//!
//! - `None`: the input unchanged
//! - `Safe`: markup sanitized with the configured [`PolicySet`]
//! - `TextWithLineBreaks`: markup reduced to paragraphs and inline text
//! - `Text`: plain text, escaped for literal display
//!
//! # Sessions
//!
//! The most recent input is parsed once and kept as the current session,
//! keyed by its blake3 fingerprint. Variants are computed on first request
//! and memoized for that session. Submitting a different input discards the
//! session; resubmitting the same input reuses it. `None` requests never
//! touch the session. Changing the policy set through the tailor discards
//! the memoized `Safe` output.
//!
//! Each variant runs the sanitizer on a deep copy of the parsed document, so
//! the parse itself is never mutated and can serve every level.

use markup5ever_rcdom::Handle;
use serde::{Deserialize, Serialize};

use crate::blocklist::Blocklist;
use crate::dom;
use crate::parser::parse_html;
use crate::policy::PolicySet;
use crate::report::Report;
use crate::rewrite::{Directive, Tailorable};
use crate::rule::Rule;
use crate::sanitizer::sanitize;

/// Requested output variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Input passed through unchanged
    #[default]
    None,
    /// Sanitized markup
    Safe,
    /// Paragraph-preserving simplified markup
    TextWithLineBreaks,
    /// Escaped plain text
    Text,
}

struct Session {
    fingerprint: String,
    input: String,
    document: Handle,
    safe: Option<String>,
    line_breaks: Option<String>,
    text: Option<String>,
    report: Report,
}

impl Session {
    fn new(input: &str, fingerprint: String) -> Self {
        let dom = parse_html(input);
        Self {
            fingerprint,
            input: input.to_string(),
            document: dom.document,
            safe: None,
            line_breaks: None,
            text: None,
            report: Report::default(),
        }
    }
}

/// Hex-encoded blake3 digest of an input
pub fn fingerprint(input: &str) -> String {
    hex::encode(blake3::hash(input.as_bytes()).as_bytes())
}

/// Prefix of a fingerprint used as the log key of a session
fn short_fingerprint(fingerprint: &str) -> &str {
    fingerprint.get(..16).unwrap_or(fingerprint)
}

/// Escapes text for literal display inside markup
///
/// `&` is escaped first so existing entities are shown literally.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Level pipeline with its policy sets, blocklist and current session
pub struct Tailor {
    policies: PolicySet,
    line_policies: PolicySet,
    blocklist: Blocklist,
    session: Option<Session>,
}

impl Tailor {
    /// Creates a tailor that sanitizes `Safe` output with `policies`
    pub fn new(policies: PolicySet) -> Self {
        Self {
            policies,
            line_policies: PolicySet::line_breaks(),
            blocklist: Blocklist::default(),
            session: None,
        }
    }

    /// Creates a tailor using [`PolicySet::standard`]
    pub fn standard() -> Self {
        Self::new(PolicySet::standard())
    }

    pub fn with_blocklist(mut self, blocklist: Blocklist) -> Self {
        self.blocklist = blocklist;
        self
    }

    pub fn blocklist(&self) -> &Blocklist {
        &self.blocklist
    }

    pub fn blocklist_mut(&mut self) -> &mut Blocklist {
        &mut self.blocklist
    }

    pub fn policies(&self) -> &PolicySet {
        &self.policies
    }

    /// Registers a rule for `Safe` output
    pub fn add_rule(&mut self, rule: Rule) {
        self.policies.insert(rule);
        self.invalidate_safe();
    }

    /// Registers several rules for `Safe` output
    pub fn add_rules<I>(&mut self, rules: I)
    where
        I: IntoIterator<Item = Rule>,
    {
        self.policies.insert_all(rules);
        self.invalidate_safe();
    }

    /// Allows MathML in `Safe` output
    pub fn enable_math(&mut self) {
        self.policies.enable_math();
        self.invalidate_safe();
    }

    fn invalidate_safe(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.safe = None;
        }
    }

    /// Makes `input` the current session
    ///
    /// Does nothing if `input` is already the current session.
    pub fn load(&mut self, input: &str) {
        self.load_fingerprinted(input, fingerprint(input));
    }

    fn load_fingerprinted(&mut self, input: &str, fingerprint: String) {
        if self
            .session
            .as_ref()
            .is_some_and(|session| session.fingerprint == fingerprint)
        {
            return;
        }
        tracing::trace!(fingerprint = short_fingerprint(&fingerprint), "new session");
        self.session = Some(Session::new(input, fingerprint));
    }

    /// Renders the current session at `level`
    ///
    /// Returns `None` if no input has been loaded.
    pub fn render(&mut self, level: Level) -> Option<String> {
        let session = self.session.as_mut()?;
        let output = match level {
            Level::None => session.input.clone(),
            Level::Safe => {
                if session.safe.is_none() {
                    let sanitized = sanitize(&dom::deep_clone(&session.document), &self.policies);
                    session.report.merge(sanitized.report);
                    session.safe = Some(sanitized.html);
                }
                session.safe.clone().unwrap_or_default()
            }
            Level::TextWithLineBreaks => {
                if session.line_breaks.is_none() {
                    let sanitized =
                        sanitize(&dom::deep_clone(&session.document), &self.line_policies);
                    session.report.merge(sanitized.report);
                    session.line_breaks = Some(sanitized.html);
                }
                session.line_breaks.clone().unwrap_or_default()
            }
            Level::Text => session
                .text
                .get_or_insert_with(|| escape_text(&dom::text_content(&session.document)))
                .clone(),
        };
        Some(output)
    }

    /// Audit flags of every variant computed for the current session
    pub fn report(&self) -> Report {
        self.session
            .as_ref()
            .map(|session| session.report)
            .unwrap_or_default()
    }

    /// Produces the `level` variant of `input`, then optionally blocklists it
    ///
    /// Returns `None` for empty input. `Level::None` returns the input as is
    /// without parsing it or replacing the current session.
    ///
    /// # Examples
    ///
    /// ```
    /// use html_tailor::{Level, Tailor};
    ///
    /// let mut tailor = Tailor::standard();
    /// let safe = tailor.tailor("<p onclick=\"x()\">hi</p><script>x()</script>", Level::Safe, false);
    /// assert_eq!(safe.as_deref(), Some("<p>hi</p>"));
    /// assert!(tailor.report().removed_tag);
    /// ```
    pub fn tailor(&mut self, input: &str, level: Level, apply_blocklist: bool) -> Option<String> {
        if input.is_empty() {
            return None;
        }

        // Pass-through needs no parse and leaves the current session alone
        let output = if level == Level::None {
            input.to_string()
        } else {
            let fingerprint = fingerprint(input);
            let span = tracing::debug_span!(
                "tailor",
                fingerprint = short_fingerprint(&fingerprint),
                ?level
            );
            let _enter = span.enter();

            self.load_fingerprinted(input, fingerprint);
            self.render(level)?
        };

        if apply_blocklist {
            Some(self.blocklist.filter(&output))
        } else {
            Some(output)
        }
    }

    /// Rewrites every string reachable from `value` under `directive`
    ///
    /// Fields carrying their own directive override it for everything
    /// reached through them.
    pub fn rewrite<T>(&mut self, value: &mut T, directive: Directive)
    where
        T: Tailorable + ?Sized,
    {
        value.tailor_with(self, directive);
    }
}

impl Default for Tailor {
    fn default() -> Self {
        Self::standard()
    }
}
