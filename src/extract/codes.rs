//! Promo Code Detection

use regex::Regex;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::{
    config::{CodeLength, ConfigError},
    extract::{advance, phrase_regex},
    offers::PromoCode,
};

/// A code found after a hint phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeMatch {
    /// The normalised code
    pub code: PromoCode,

    /// Byte offset where the hint phrase starts
    pub hint_start: usize,

    /// Byte offset where the code starts
    pub start: usize,

    /// Byte offset just past the code
    pub end: usize,
}

/// Finds promo codes in text, only ever near a hint phrase.
#[derive(Debug, Clone)]
pub struct CodeMatcher {
    hints: Regex,
    token: Regex,
    hint_words: FxHashSet<String>,
    window: usize,
}

impl CodeMatcher {
    /// Build a matcher from hint phrases.
    ///
    /// # Errors
    ///
    /// Returns an error if the hints or the token pattern cannot be compiled.
    pub fn new(hints: &[String], window: usize, length: CodeLength) -> Result<Self, ConfigError> {
        let hint_words = hints
            .iter()
            .flat_map(|hint| hint.split(|ch: char| !ch.is_alphanumeric()))
            .filter(|word| !word.is_empty())
            .map(str::to_uppercase)
            .collect();

        Ok(Self {
            hints: phrase_regex(hints)?,
            token: Regex::new(&format!(r"\b[A-Z0-9]{{{},{}}}\b", length.min, length.max))?,
            hint_words,
            window,
        })
    }

    /// Find every distinct code introduced by a hint phrase, in order of appearance.
    ///
    /// Text without any hint phrase yields no codes.
    pub fn find_all(&self, text: &str) -> SmallVec<[CodeMatch; 2]> {
        let mut found: SmallVec<[CodeMatch; 2]> = SmallVec::new();

        for hint in self.hints.find_iter(text) {
            let Some(found_code) = self.code_after(text, hint.start(), hint.end()) else {
                continue;
            };

            if found.iter().any(|existing| existing.code == found_code.code) {
                continue;
            }

            found.push(found_code);
        }

        found
    }

    fn code_after(&self, text: &str, hint_start: usize, hint_end: usize) -> Option<CodeMatch> {
        let window_end = advance(text, hint_end, self.window);
        let window = text.get(hint_end..window_end)?;

        self.token
            .find_iter(window)
            .filter(|token| self.is_plausible(token.as_str()))
            .filter(|token| ends_at_boundary(text, hint_end + token.end()))
            .find_map(|token| {
                Some(CodeMatch {
                    code: PromoCode::new(token.as_str())?,
                    hint_start,
                    start: hint_end + token.start(),
                    end: hint_end + token.end(),
                })
            })
    }

    /// Codes carry at least one letter and are not a hint word shouted in capitals.
    fn is_plausible(&self, token: &str) -> bool {
        token.chars().any(|ch| ch.is_ascii_alphabetic()) && !self.hint_words.contains(token)
    }
}

/// A token cut off by the window edge is not a whole code.
fn ends_at_boundary(text: &str, end: usize) -> bool {
    text.get(end..)
        .and_then(|rest| rest.chars().next())
        .is_none_or(|ch| !ch.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn matcher() -> Result<CodeMatcher, ConfigError> {
        let hints: Vec<String> = ["promo code", "coupon code", "use code", "code:", "code"]
            .iter()
            .map(ToString::to_string)
            .collect();

        CodeMatcher::new(&hints, 40, CodeLength::default())
    }

    fn codes(text: &str) -> Result<Vec<String>, ConfigError> {
        Ok(matcher()?
            .find_all(text)
            .into_iter()
            .map(|found| found.code.to_string())
            .collect())
    }

    #[test]
    fn finds_code_after_hint() -> TestResult {
        assert_eq!(
            codes("Use promo code FLIGHT40 at checkout to save 40% off")?,
            ["FLIGHT40"]
        );

        Ok(())
    }

    #[test]
    fn finds_code_after_colon_hint() -> TestResult {
        assert_eq!(codes("Hey!\n\nCode: SHIP15FREE\n\nExpiration soon")?, ["SHIP15FREE"]);

        Ok(())
    }

    #[test]
    fn skips_words_between_hint_and_code() -> TestResult {
        assert_eq!(codes("Use the code at checkout: FEAST50")?, ["FEAST50"]);

        Ok(())
    }

    #[test]
    fn no_hint_means_no_code() -> TestResult {
        assert!(codes("ENJOY FREE SHIPPING WITH SUMMER2025 TODAY")?.is_empty());

        Ok(())
    }

    #[test]
    fn capitalised_words_far_from_hint_are_ignored() -> TestResult {
        let text = "Use code below.                                                  BIGSALE";

        assert!(codes(text)?.is_empty());

        Ok(())
    }

    #[test]
    fn pure_numbers_are_not_codes() -> TestResult {
        assert_eq!(codes("promo code 2025 or BOGO2024")?, ["BOGO2024"]);

        Ok(())
    }

    #[test]
    fn hint_word_in_capitals_is_not_a_code() -> TestResult {
        assert_eq!(codes("USE CODE SPRING15")?, ["SPRING15"]);

        Ok(())
    }

    #[test]
    fn lowercase_tokens_are_not_codes() -> TestResult {
        assert!(codes("No coupon code needed - discount applied at checkout")?.is_empty());

        Ok(())
    }

    #[test]
    fn repeated_code_is_reported_once() -> TestResult {
        assert_eq!(
            codes("Use code SAVE10 today. Remember, code SAVE10 ends soon. Or code EXTRA5.")?,
            ["SAVE10", "EXTRA5"]
        );

        Ok(())
    }

    #[test]
    fn match_offsets_point_at_code() -> TestResult {
        let text = "promo code ABCD1";
        let found = matcher()?.find_all(text);
        let first = found.first().ok_or("expected a code")?;

        assert_eq!(text.get(first.start..first.end), Some("ABCD1"));
        assert_eq!(first.hint_start, 0);

        Ok(())
    }

    #[test]
    fn token_cut_by_window_edge_is_ignored() -> TestResult {
        let text = format!("use code {} ABCDEFGHIJ", "x".repeat(33));

        assert!(codes(&text)?.is_empty());

        Ok(())
    }

    #[test]
    fn code_length_bounds_apply() -> TestResult {
        assert!(codes("use code ABC")?.is_empty());
        assert!(codes("use code ABCDEFGHIJKLMNOPQRSTUV")?.is_empty());

        Ok(())
    }
}
