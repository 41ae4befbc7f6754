//! JSON configuration for a [`Tailor`]
//!
//! ```json
//! {
//!   "preset": "standard",
//!   "math": true,
//!   "rules": [
//!     { "tag_name": "a", "allow_attributes": ["href"], "allow_url": ["https://"] },
//!     { "tag_name": "center", "operation": "replace", "replace_tag": "div" }
//!   ],
//!   "blocklist": { "words": ["spam"], "placeholder": "***" }
//! }
//! ```
//!
//! Every field is optional. Rules are registered after the preset, in file
//! order, so they override preset rules for the same tag.

use serde::Deserialize;

use crate::blocklist::{Blocklist, BlocklistConfig};
use crate::error::TailorError;
use crate::pipeline::Tailor;
use crate::policy::PolicySet;
use crate::rule::{Operation, Rule};

/// Base policy set a configuration starts from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// [`PolicySet::standard`]
    #[default]
    Standard,
    /// Wrapper passthroughs only
    Empty,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TailorConfig {
    #[serde(default)]
    pub preset: Preset,

    #[serde(default)]
    pub math: bool,

    #[serde(default)]
    pub rules: Vec<Rule>,

    #[serde(default)]
    pub blocklist: BlocklistConfig,
}

impl TailorConfig {
    /// Parses and validates a JSON configuration
    ///
    /// # Errors
    ///
    /// Returns [`TailorError::InvalidConfig`] for malformed JSON, unknown
    /// presets or operations, and rules without a tag name.
    pub fn from_json(json: &str) -> Result<Self, TailorError> {
        let config: TailorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), TailorError> {
        for rule in &self.rules {
            if rule.tag_name().trim().is_empty() {
                return Err(TailorError::InvalidConfig(
                    "rule with empty tag_name".to_string(),
                ));
            }
            if rule.operation() == Operation::Replace && rule.replace_tag().trim().is_empty() {
                return Err(TailorError::InvalidConfig(format!(
                    "replace rule for <{}> has an empty replace_tag",
                    rule.tag_name()
                )));
            }
        }
        Ok(())
    }

    /// The policy set this configuration describes
    pub fn policies(&self) -> PolicySet {
        let mut policies = match self.preset {
            Preset::Standard => PolicySet::standard(),
            Preset::Empty => PolicySet::new(),
        };
        if self.math {
            policies.enable_math();
        }
        policies.insert_all(self.rules.iter().cloned());
        policies
    }

    /// Builds a tailor from this configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a blocklist word
    /// cannot be compiled.
    pub fn build(self) -> Result<Tailor, TailorError> {
        self.validate()?;
        let policies = self.policies();
        let blocklist = Blocklist::try_from(self.blocklist)?;
        tracing::debug!(
            rules = policies.len(),
            blocked_words = blocklist.words().len(),
            "tailor configured"
        );
        Ok(Tailor::new(policies).with_blocklist(blocklist))
    }
}
