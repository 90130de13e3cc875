//! Merchant Name Rules

use serde::Deserialize;

use crate::config::ConfigError;

/// Denylists and limits used to derive a merchant name from headers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MerchantRules {
    /// Sender names that never identify a brand (e.g. "noreply", "newsletter")
    pub generic_senders: Vec<String>,

    /// Trailing words stripped from sender display names (e.g. "Deals", "Team")
    #[serde(default)]
    pub generic_suffixes: Vec<String>,

    /// Marketing-phrase openers that must never be used as a merchant name
    pub slogan_openers: Vec<String>,

    /// Separators ending the leading clause of a subject line
    #[serde(default = "default_subject_separators")]
    pub subject_separators: Vec<String>,

    /// Maximum merchant length, in characters, when taken from a subject line
    #[serde(default = "default_max_subject_len")]
    pub max_subject_len: usize,

    /// Merchant name used when no usable name can be derived
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

fn default_subject_separators() -> Vec<String> {
    [" - ", " – ", " — ", ":", "|"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_max_subject_len() -> usize {
    40
}

fn default_placeholder() -> String {
    "Unknown Merchant".to_string()
}

impl MerchantRules {
    /// Check the rules are usable.
    ///
    /// # Errors
    ///
    /// Returns an error if either denylist is empty, there are no subject
    /// separators, the length limit is zero, or the placeholder is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if blank(&self.generic_senders) {
            return Err(ConfigError::EmptyList("merchants.generic_senders"));
        }

        if blank(&self.slogan_openers) {
            return Err(ConfigError::EmptyList("merchants.slogan_openers"));
        }

        if self.subject_separators.iter().all(String::is_empty) {
            return Err(ConfigError::EmptyList("merchants.subject_separators"));
        }

        if self.max_subject_len == 0 {
            return Err(ConfigError::ZeroLimit("merchants.max_subject_len"));
        }

        if self.placeholder.trim().is_empty() {
            return Err(ConfigError::BlankPlaceholder);
        }

        Ok(())
    }
}

/// True if there is no non-blank entry in the list.
pub(crate) fn blank(list: &[String]) -> bool {
    list.iter().all(|entry| entry.trim().is_empty())
}
