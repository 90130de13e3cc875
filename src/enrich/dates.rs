//! Expiration Date Parsing

use jiff::civil::Date;
use regex::Regex;

/// Parses expiration text by trying calendar formats in order.
#[derive(Debug, Clone)]
pub struct DateParser {
    formats: Vec<String>,
    ordinal: Regex,
    abbreviation: Regex,
}

impl DateParser {
    /// Create a parser for the given `strptime` formats.
    ///
    /// # Errors
    ///
    /// Returns an error if the normalisation patterns fail to compile.
    pub fn new(formats: &[String]) -> Result<Self, regex::Error> {
        Ok(Self {
            formats: formats
                .iter()
                .map(|format| format.trim().to_string())
                .filter(|format| !format.is_empty())
                .collect(),
            ordinal: Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b")?,
            abbreviation: Regex::new(r"\b([A-Za-z]{3,9})\.")?,
        })
    }

    /// Parse expiration text. The first format that accepts the normalised text wins.
    pub fn parse(&self, text: &str) -> Option<Date> {
        let normalised = self.normalise(text);

        if normalised.is_empty() {
            return None;
        }

        self.formats
            .iter()
            .find_map(|format| Date::strptime(format, &normalised).ok())
    }

    /// Collapse whitespace, drop ordinal suffixes, abbreviation dots and trailing
    /// punctuation, and capitalise month names.
    ///
    /// `"oct.  21st, 2025."` becomes `"Oct 21, 2025"`.
    pub fn normalise(&self, text: &str) -> String {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let without_ordinals = self.ordinal.replace_all(&collapsed, "$1");
        let without_dots = self.abbreviation.replace_all(&without_ordinals, "$1");

        without_dots
            .trim_end_matches(['.', ',', ';', '!'])
            .split(' ')
            .map(capitalise)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn capitalise(word: &str) -> String {
    if !word.starts_with(|ch: char| ch.is_ascii_alphabetic()) {
        return word.to_string();
    }

    let lower = word.to_ascii_lowercase();

    // "Sept" is common in mail but not a recognised abbreviation.
    let lower = match lower.strip_prefix("sept") {
        Some(rest) if !rest.starts_with(|ch: char| ch.is_ascii_alphabetic()) => format!("sep{rest}"),
        _ => lower,
    };

    let mut chars = lower.chars();

    chars
        .next()
        .map(|first| first.to_ascii_uppercase().to_string() + chars.as_str())
        .unwrap_or_default()
}
