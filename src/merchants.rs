//! Merchant Resolution
//!
//! Derives a merchant name from the email headers. The sender's display name is
//! preferred, then the leading clause of the subject line, then a placeholder.
//! Marketing copy is never returned as a merchant.

use crate::{config::MerchantRules, messages, offers::OfferCandidate};

/// Resolves merchant names from sender and subject.
#[derive(Debug, Clone)]
pub struct MerchantResolver {
    generic_senders: Vec<String>,
    generic_suffixes: Vec<String>,
    slogan_openers: Vec<String>,
    separators: Vec<String>,
    max_subject_len: usize,
    placeholder: String,
}

impl MerchantResolver {
    /// Build a resolver from merchant rules.
    pub fn new(rules: &MerchantRules) -> Self {
        Self {
            generic_senders: normalised(&rules.generic_senders),
            generic_suffixes: trimmed(&rules.generic_suffixes),
            slogan_openers: normalised(&rules.slogan_openers),
            separators: rules
                .subject_separators
                .iter()
                .filter(|separator| !separator.is_empty())
                .cloned()
                .collect(),
            max_subject_len: rules.max_subject_len,
            placeholder: rules.placeholder.trim().to_string(),
        }
    }

    /// Fill in the merchant of a candidate that does not have one yet.
    pub fn fill(&self, candidate: &mut OfferCandidate) {
        if candidate.merchant.trim().is_empty() {
            candidate.merchant = self.resolve(&candidate.source_subject, &candidate.source_sender);
        }
    }

    /// Best-effort merchant name for an email. Never fails.
    pub fn resolve(&self, subject: &str, sender: &str) -> String {
        self.sender_name(sender)
            .map(ToString::to_string)
            .or_else(|| self.subject_name(subject))
            .unwrap_or_else(|| self.placeholder.clone())
    }

    /// The sender display name without generic suffixes, unless it is generic.
    pub fn sender_name<'a>(&self, sender: &'a str) -> Option<&'a str> {
        let mut name = messages::sender_display_name(sender)?;

        while let Some(stripped) = self.strip_generic_suffix(name) {
            name = stripped;
        }

        let name = trim_punctuation(name);

        if name.is_empty() || name.contains('@') || self.is_generic(name) || self.is_slogan(name) {
            return None;
        }

        Some(name)
    }

    /// The leading clause of the subject, unless it is marketing copy.
    pub fn subject_name(&self, subject: &str) -> Option<String> {
        let end = self
            .separators
            .iter()
            .filter_map(|separator| subject.find(separator.as_str()))
            .min()
            .unwrap_or(subject.len());

        let clause: String = subject
            .get(..end)?
            .trim()
            .chars()
            .take(self.max_subject_len)
            .collect();
        let clause = trim_punctuation(&clause);

        if clause.is_empty() || looks_like_discount(clause) || self.is_slogan(clause) {
            return None;
        }

        Some(clause.to_string())
    }

    fn strip_generic_suffix<'a>(&self, name: &'a str) -> Option<&'a str> {
        self.generic_suffixes.iter().find_map(|suffix| {
            let cut = name.len().checked_sub(suffix.len())?;
            let head = name.get(..cut)?;
            let tail = name.get(cut..)?;

            (tail.eq_ignore_ascii_case(suffix) && (head.is_empty() || head.ends_with(char::is_whitespace)))
                .then(|| head.trim_end())
        })
    }

    fn is_generic(&self, name: &str) -> bool {
        let name = normalise(name);

        self.generic_senders.iter().any(|generic| name == *generic)
    }

    fn is_slogan(&self, text: &str) -> bool {
        let text = normalise(text);

        self.slogan_openers.iter().any(|opener| {
            text.strip_prefix(opener.as_str())
                .is_some_and(|rest| !rest.starts_with(char::is_alphanumeric))
        })
    }
}

/// Lowercase with typographic apostrophes folded, so "Don’t" matches "don't".
fn normalise(text: &str) -> String {
    text.trim().replace(['\u{2018}', '\u{2019}'], "'").to_lowercase()
}

fn normalised(list: &[String]) -> Vec<String> {
    list.iter()
        .map(|entry| normalise(entry))
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn trimmed(list: &[String]) -> Vec<String> {
    list.iter()
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn trim_punctuation(text: &str) -> &str {
    text.trim_matches(|ch: char| ch.is_whitespace() || matches!(ch, ',' | '-' | '|' | ':' | '!' | '.'))
}

/// Subject clauses carrying a price or percentage are ad copy, e.g. "Psst... $60 off".
fn looks_like_discount(text: &str) -> bool {
    text.contains(['%', '$', '£', '€'])
}
