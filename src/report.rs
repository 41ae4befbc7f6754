//! Audit flags for a sanitization run
//!
//! A [`Report`] says what a run stripped. It is returned by value from every
//! rule application and sanitizer pass, so rules and policy sets stay
//! immutable and can be shared between calls.

use serde::Serialize;

/// What a sanitization run removed
///
/// The flags are diagnostics for upstream logging; the sanitized output is
/// already safe regardless of their values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// An element was removed, by a `Remove` rule or by default-deny
    pub removed_tag: bool,
    /// An attribute outside a rule's whitelist was removed
    pub removed_attribute: bool,
    /// A CSS declaration was dropped from a `style` attribute
    pub removed_style: bool,
    /// A `src`/`href` value or a style `url(...)` failed the URL whitelist
    pub blocked_url: bool,
}

impl Report {
    /// Accumulates the flags of another report into this one
    pub fn merge(&mut self, other: Report) {
        self.removed_tag |= other.removed_tag;
        self.removed_attribute |= other.removed_attribute;
        self.removed_style |= other.removed_style;
        self.blocked_url |= other.blocked_url;
    }

    /// Returns true if nothing was stripped
    pub fn is_clean(&self) -> bool {
        *self == Report::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_clean() {
        assert!(Report::default().is_clean());
    }

    #[test]
    fn test_merge_is_sticky() {
        let mut report = Report {
            removed_tag: true,
            ..Report::default()
        };
        report.merge(Report {
            removed_style: true,
            ..Report::default()
        });
        report.merge(Report::default());

        assert!(report.removed_tag);
        assert!(report.removed_style);
        assert!(!report.removed_attribute);
        assert!(!report.blocked_url);
        assert!(!report.is_clean());
    }
}
