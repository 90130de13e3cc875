//! Expiration Phrase Detection

use regex::Regex;

use crate::{
    config::ConfigError,
    extract::{advance, phrase_regex},
};

/// Month-name dates ("October 20, 2025", "Oct. 21st 2025"), slash dates and ISO dates.
const DATE: &str = r"(?ix)
    \b(?:
        (?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?
          |sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)
        \.?\s+\d{1,2}(?:st|nd|rd|th)?(?:,?\s+\d{4})?
      | \d{1,2}/\d{1,2}/(?:\d{4}|\d{2})
      | \d{4}-\d{2}-\d{2}
    )\b";

/// An expiration phrase found in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryMatch {
    /// The date text as written
    pub text: String,

    /// Byte offset where the date starts
    pub start: usize,

    /// Byte offset just past the date
    pub end: usize,
}

/// Finds date-like phrases that follow an expiry keyword.
#[derive(Debug, Clone)]
pub struct ExpiryMatcher {
    keywords: Regex,
    date: Regex,
    window: usize,
}

impl ExpiryMatcher {
    /// Build a matcher from expiry keywords.
    ///
    /// # Errors
    ///
    /// Returns an error if the keywords cannot be compiled.
    pub fn new(keywords: &[String], window: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            keywords: phrase_regex(keywords)?,
            date: Regex::new(DATE)?,
            window,
        })
    }

    /// Find the first date that starts within the window after an expiry keyword.
    pub fn find(&self, text: &str) -> Option<ExpiryMatch> {
        self.keywords.find_iter(text).find_map(|keyword| {
            let window_end = advance(text, keyword.end(), self.window);
            let date = self.date.find_at(text, keyword.end())?;

            (date.start() < window_end).then(|| ExpiryMatch {
                text: date.as_str().to_string(),
                start: date.start(),
                end: date.end(),
            })
        })
    }
}
