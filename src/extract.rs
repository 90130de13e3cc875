//! Pattern Extraction
//!
//! Turns one email into zero or more [`OfferCandidate`]s. Codes are only taken
//! from near a hint phrase, discounts come from an ordered list of pattern
//! families and expiration dates must follow an expiry keyword.
//!
//! Extraction is total: a message with nothing recognisable yields no candidates.

use regex::Regex;

use crate::{
    config::{ConfigError, ExtractionConfig},
    messages::RawMessage,
    offers::{Category, FALLBACK_DISCOUNT, OfferCandidate, PromoCode},
};

pub mod codes;
pub mod discounts;
pub mod expiry;

pub use codes::{CodeMatch, CodeMatcher};
pub use discounts::{DiscountFamily, DiscountMatch, DiscountMatcher};
pub use expiry::{ExpiryMatch, ExpiryMatcher};

/// Extracts offer candidates from raw messages.
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    codes: CodeMatcher,
    discounts: DiscountMatcher,
    expiry: ExpiryMatcher,
    context_chars: usize,
}

impl PatternExtractor {
    /// Build an extractor from extraction settings.
    ///
    /// # Errors
    ///
    /// Returns an error if a hint phrase or expiry keyword cannot be compiled.
    pub fn new(config: &ExtractionConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            codes: CodeMatcher::new(&config.code_hints, config.hint_window, config.code_length)?,
            discounts: DiscountMatcher::new()?,
            expiry: ExpiryMatcher::new(&config.expiry_keywords, config.expiry_window)?,
            context_chars: config.context_chars,
        })
    }

    /// Extract candidates from one message.
    ///
    /// A message yields one candidate when it has a code or a discount phrase, and
    /// one candidate per code when its body introduces several distinct codes.
    /// Merchant and category are left for later stages.
    pub fn extract(&self, message: &RawMessage) -> Vec<OfferCandidate> {
        if message.has_empty_body() {
            return Vec::new();
        }

        let body = message.body.as_str();
        let codes = self.codes.find_all(body);

        if codes.len() > 1 {
            return self.extract_each_code(message, &codes);
        }

        let code = codes.first();
        let body_discount = self.discounts.find(body);
        let discount = body_discount
            .as_ref()
            .map(|found| found.text.clone())
            .or_else(|| self.discounts.find(&message.subject).map(|found| found.text));

        if code.is_none() && discount.is_none() {
            return Vec::new();
        }

        let anchor = code
            .map(|found| (found.start, found.end))
            .or_else(|| body_discount.as_ref().map(|found| (found.start, found.end)))
            .unwrap_or_default();

        vec![self.candidate(
            message,
            code.map(|found| found.code.clone()),
            discount,
            self.expiry.find(body).map(|found| found.text),
            anchor,
        )]
    }

    /// Each code takes the discount from its own sentence, else from the stretch of
    /// body between its neighbours. Expiration falls back to the first one in the body.
    fn extract_each_code(&self, message: &RawMessage, codes: &[CodeMatch]) -> Vec<OfferCandidate> {
        let body = message.body.as_str();
        let email_expiry = self.expiry.find(body).map(|found| found.text);

        codes
            .iter()
            .enumerate()
            .map(|(index, found)| {
                let segment_start = index
                    .checked_sub(1)
                    .and_then(|previous| codes.get(previous))
                    .map_or(0, |previous| previous.end);
                let segment_end = codes
                    .get(index + 1)
                    .map_or(body.len(), |next| next.hint_start);
                let (sentence_start, sentence_end) =
                    sentence_bounds(body, found.hint_start, found.end);

                let discount = self
                    .discount_within(body, sentence_start, sentence_end)
                    .or_else(|| self.discount_within(body, segment_start, segment_end));
                let expiration = body
                    .get(segment_start..segment_end)
                    .and_then(|segment| self.expiry.find(segment))
                    .map(|found| found.text)
                    .or_else(|| email_expiry.clone());

                self.candidate(
                    message,
                    Some(found.code.clone()),
                    discount,
                    expiration,
                    (found.start, found.end),
                )
            })
            .collect()
    }

    fn discount_within(&self, text: &str, start: usize, end: usize) -> Option<String> {
        text.get(start..end)
            .and_then(|part| self.discounts.find(part))
            .map(|found| found.text)
    }

    fn candidate(
        &self,
        message: &RawMessage,
        code: Option<PromoCode>,
        discount: Option<String>,
        expiration_text: Option<String>,
        (start, end): (usize, usize),
    ) -> OfferCandidate {
        OfferCandidate {
            code,
            merchant: String::new(),
            discount: discount.unwrap_or_else(|| FALLBACK_DISCOUNT.to_string()),
            expiration_text,
            category: Category::other(),
            source_subject: message.subject.clone(),
            source_sender: message.sender.clone(),
            raw_context: self.context(&message.body, start, end),
        }
    }

    fn context(&self, text: &str, start: usize, end: usize) -> String {
        let from = retreat(text, start, self.context_chars);
        let to = advance(text, end, self.context_chars);

        text.get(from..to)
            .unwrap_or_default()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Compile phrases into one case-insensitive alternation, longest phrase first.
///
/// Word boundaries are required at alphanumeric phrase edges and inner spaces
/// match any run of whitespace. Blank phrases are skipped; with none left the
/// pattern never matches.
pub(crate) fn phrase_regex(phrases: &[String]) -> Result<Regex, regex::Error> {
    let mut phrases: Vec<&str> = phrases
        .iter()
        .map(String::as_str)
        .map(str::trim)
        .filter(|phrase| !phrase.is_empty())
        .collect();

    if phrases.is_empty() {
        return Regex::new(r"\b\B");
    }

    phrases.sort_by_key(|phrase| std::cmp::Reverse(phrase.len()));

    let alternatives: Vec<String> = phrases
        .iter()
        .map(|phrase| {
            let head = if phrase.starts_with(char::is_alphanumeric) { r"\b" } else { "" };
            let tail = if phrase.ends_with(char::is_alphanumeric) { r"\b" } else { "" };
            let words: Vec<String> = phrase.split_whitespace().map(regex::escape).collect();

            format!("{head}{}{tail}", words.join(r"\s+"))
        })
        .collect();

    Regex::new(&format!("(?i)(?:{})", alternatives.join("|")))
}

/// Byte offset `chars` characters after `start`, clamped to the end of `text`.
pub(crate) fn advance(text: &str, start: usize, chars: usize) -> usize {
    text.get(start..)
        .and_then(|rest| rest.char_indices().nth(chars))
        .map_or(text.len(), |(offset, _)| start + offset)
}

/// Byte offset `chars` characters before `end`, clamped to the start of `text`.
pub(crate) fn retreat(text: &str, end: usize, chars: usize) -> usize {
    let Some(head) = text.get(..end) else {
        return 0;
    };

    if chars == 0 {
        return end;
    }

    head.char_indices()
        .rev()
        .take(chars)
        .last()
        .map_or(end, |(offset, _)| offset)
}

/// The sentence around `start..end`, bounded by line breaks and by `.`, `!` or `?`
/// followed by whitespace.
fn sentence_bounds(text: &str, start: usize, end: usize) -> (usize, usize) {
    let head = text.get(..start).unwrap_or_default();
    let from = head
        .char_indices()
        .rev()
        .find(|&(offset, ch)| ends_sentence(head, offset, ch))
        .map_or(0, |(offset, ch)| offset + ch.len_utf8());

    let tail = text.get(end..).unwrap_or_default();
    let to = tail
        .char_indices()
        .find(|&(offset, ch)| ends_sentence(tail, offset, ch))
        .map_or(text.len(), |(offset, _)| end + offset);

    (from, to)
}

fn ends_sentence(text: &str, offset: usize, ch: char) -> bool {
    if ch == '\n' {
        return true;
    }

    matches!(ch, '.' | '!' | '?')
        && text
            .get(offset + ch.len_utf8()..)
            .and_then(|rest| rest.chars().next())
            .is_none_or(char::is_whitespace)
}
