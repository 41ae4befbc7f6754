//! Forbidden-word replacement
//!
//! A [`Blocklist`] replaces every case-insensitive occurrence of each
//! forbidden word with a fixed placeholder. Words are matched literally and
//! applied in registration order, so an earlier replacement can hide a later
//! word but never the other way round.
//!
//! The blocklist is an ordinary value owned by a [`crate::pipeline::Tailor`]
//! rather than process-wide state; two tailors can carry different lists.

use regex::{NoExpand, Regex, RegexBuilder};
use serde::Deserialize;

use crate::error::TailorError;

/// Placeholder used when none is configured
pub const DEFAULT_PLACEHOLDER: &str = "**";

/// Ordered list of forbidden words and their placeholder
#[derive(Debug, Clone)]
pub struct Blocklist {
    words: Vec<String>,
    patterns: Vec<Regex>,
    placeholder: String,
}

impl Blocklist {
    /// Builds a blocklist, compiling one matcher per non-empty word
    ///
    /// # Errors
    ///
    /// Returns [`TailorError::InvalidPattern`] if a word's matcher exceeds
    /// the regex size limits.
    ///
    /// # Examples
    ///
    /// ```
    /// use html_tailor::blocklist::Blocklist;
    ///
    /// let blocklist = Blocklist::new(["abc"], "**").unwrap();
    /// assert_eq!(blocklist.filter("xabcY"), "x**Y");
    /// assert_eq!(blocklist.filter("XABCy"), "X**y");
    /// ```
    pub fn new<I, S>(words: I, placeholder: impl Into<String>) -> Result<Self, TailorError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut blocklist = Self {
            words: Vec::new(),
            patterns: Vec::new(),
            placeholder: placeholder.into(),
        };
        for word in words {
            blocklist.push(word)?;
        }
        Ok(blocklist)
    }

    /// Appends a forbidden word
    ///
    /// Empty words and words already present are ignored.
    pub fn push(&mut self, word: impl Into<String>) -> Result<(), TailorError> {
        let word = word.into();
        if word.is_empty() || self.words.contains(&word) {
            return Ok(());
        }
        let pattern = RegexBuilder::new(&regex::escape(&word))
            .case_insensitive(true)
            .build()
            .map_err(|e| TailorError::InvalidPattern(format!("{}: {}", word, e)))?;
        self.words.push(word);
        self.patterns.push(pattern);
        Ok(())
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Replaces every forbidden word in `text`
    ///
    /// Blank text is returned unchanged.
    pub fn filter(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }
        let mut filtered = text.to_string();
        for pattern in &self.patterns {
            filtered = pattern
                .replace_all(&filtered, NoExpand(&self.placeholder))
                .into_owned();
        }
        filtered
    }
}

impl Default for Blocklist {
    fn default() -> Self {
        Self {
            words: Vec::new(),
            patterns: Vec::new(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl PartialEq for Blocklist {
    fn eq(&self, other: &Self) -> bool {
        self.words == other.words && self.placeholder == other.placeholder
    }
}

/// Serialized form of a blocklist
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlocklistConfig {
    #[serde(default)]
    pub words: Vec<String>,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

impl Default for BlocklistConfig {
    fn default() -> Self {
        Self {
            words: Vec::new(),
            placeholder: default_placeholder(),
        }
    }
}

impl TryFrom<BlocklistConfig> for Blocklist {
    type Error = TailorError;

    fn try_from(config: BlocklistConfig) -> Result<Self, Self::Error> {
        Blocklist::new(config.words, config.placeholder)
    }
}
