//! Extraction & Ranking Settings

use jiff::{civil::Date, fmt::strtime};
use rust_decimal::{Decimal, prelude::FromPrimitive};
use serde::Deserialize;

use crate::config::{ConfigError, merchants::blank};

/// Patterns and limits used by the extractor and the enricher.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExtractionConfig {
    /// Phrases that introduce a promo code, e.g. "promo code", "code:"
    pub code_hints: Vec<String>,

    /// Characters after a hint phrase in which a code may appear
    #[serde(default = "default_window")]
    pub hint_window: usize,

    /// Accepted promo code length
    #[serde(default)]
    pub code_length: CodeLength,

    /// Keywords that introduce an expiration date, e.g. "expires", "valid until"
    pub expiry_keywords: Vec<String>,

    /// Characters after an expiry keyword in which a date may appear
    #[serde(default = "default_window")]
    pub expiry_window: usize,

    /// Calendar formats tried in order when parsing expiration text
    pub date_formats: Vec<String>,

    /// Characters of surrounding text kept on each side of a match
    #[serde(default = "default_context_chars")]
    pub context_chars: usize,

    /// Ranking weights
    #[serde(default)]
    pub scoring: ScoreWeights,
}

/// Inclusive bounds on promo code length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CodeLength {
    /// Minimum length
    pub min: usize,

    /// Maximum length
    pub max: usize,
}

impl Default for CodeLength {
    fn default() -> Self {
        Self { min: 4, max: 20 }
    }
}

/// Weights that turn a discount description into a ranking score.
///
/// A percentage scores as its value times `percent_weight`, a fixed amount as
/// its value times `amount_weight`, and "free"/"BOGO" phrases score `freebie_score`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScoreWeights {
    /// Multiplier for percentage discounts
    pub percent_weight: f64,

    /// Multiplier for fixed-amount discounts
    pub amount_weight: f64,

    /// Flat score for free items, free shipping and buy-one-get-one offers
    pub freebie_score: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            percent_weight: 1.0,
            amount_weight: 2.0,
            freebie_score: 50.0,
        }
    }
}

impl ScoreWeights {
    /// Convert the weights to decimals.
    ///
    /// # Errors
    ///
    /// Returns an error if any weight is negative or not finite.
    pub fn to_decimals(self) -> Result<(Decimal, Decimal, Decimal), ConfigError> {
        Ok((
            weight("scoring.percent_weight", self.percent_weight)?,
            weight("scoring.amount_weight", self.amount_weight)?,
            weight("scoring.freebie_score", self.freebie_score)?,
        ))
    }
}

fn weight(name: &'static str, value: f64) -> Result<Decimal, ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidWeight(name));
    }

    Decimal::from_f64(value).ok_or(ConfigError::InvalidWeight(name))
}

fn default_window() -> usize {
    40
}

fn default_context_chars() -> usize {
    60
}

impl ExtractionConfig {
    /// Check the settings are usable.
    ///
    /// # Errors
    ///
    /// Returns an error if a required list is empty, a date format cannot read
    /// back a date it wrote, the code length bounds are inverted or zero, a window
    /// is zero, or a scoring weight is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if blank(&self.code_hints) {
            return Err(ConfigError::EmptyList("extraction.code_hints"));
        }

        if blank(&self.expiry_keywords) {
            return Err(ConfigError::EmptyList("extraction.expiry_keywords"));
        }

        if blank(&self.date_formats) {
            return Err(ConfigError::EmptyList("extraction.date_formats"));
        }

        if let Some(format) = self
            .date_formats
            .iter()
            .map(|format| format.trim())
            .find(|format| !format.is_empty() && !round_trips(format))
        {
            return Err(ConfigError::InvalidDateFormat(format.to_string()));
        }

        let CodeLength { min, max } = self.code_length;

        if min == 0 || min > max {
            return Err(ConfigError::InvalidCodeLength { min, max });
        }

        if self.hint_window == 0 {
            return Err(ConfigError::ZeroLimit("extraction.hint_window"));
        }

        if self.expiry_window == 0 {
            return Err(ConfigError::ZeroLimit("extraction.expiry_window"));
        }

        self.scoring.to_decimals()?;

        Ok(())
    }
}

fn round_trips(format: &str) -> bool {
    let sample = jiff::civil::date(2000, 1, 2);

    strtime::format(format, sample)
        .ok()
        .and_then(|text| Date::strptime(format, &text).ok())
        == Some(sample)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn config() -> ExtractionConfig {
        ExtractionConfig {
            code_hints: vec!["promo code".to_string()],
            hint_window: 40,
            code_length: CodeLength::default(),
            expiry_keywords: vec!["expires".to_string()],
            expiry_window: 40,
            date_formats: vec!["%B %d, %Y".to_string()],
            context_chars: 60,
            scoring: ScoreWeights::default(),
        }
    }

    #[test]
    fn yaml_defaults_apply() -> TestResult {
        let yaml = r#"
code_hints: ["use code"]
expiry_keywords: [expires]
date_formats: ["%m/%d/%Y"]
"#;
        let parsed: ExtractionConfig = serde_norway::from_str(yaml)?;

        assert_eq!(parsed.hint_window, 40);
        assert_eq!(parsed.code_length, CodeLength { min: 4, max: 20 });
        assert_eq!(parsed.scoring, ScoreWeights::default());
        parsed.validate()?;

        Ok(())
    }

    #[test]
    fn default_weights_convert_to_decimals() -> TestResult {
        let (percent, amount, freebie) = ScoreWeights::default().to_decimals()?;

        assert_eq!(percent, Decimal::ONE);
        assert_eq!(amount, Decimal::TWO);
        assert_eq!(freebie, Decimal::from(50));

        Ok(())
    }

    #[test]
    fn negative_weight_is_rejected() {
        let mut config = config();
        config.scoring.amount_weight = -2.0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWeight("scoring.amount_weight"))
        ));
    }

    #[test]
    fn nan_weight_is_rejected() {
        let mut config = config();
        config.scoring.percent_weight = f64::NAN;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWeight("scoring.percent_weight"))
        ));
    }

    #[test]
    fn inverted_code_length_is_rejected() {
        let mut config = config();
        config.code_length = CodeLength { min: 10, max: 4 };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCodeLength { min: 10, max: 4 })
        ));
    }

    #[test]
    fn empty_date_formats_are_rejected() {
        let mut config = config();
        config.date_formats.clear();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyList("extraction.date_formats"))
        ));
    }

    #[test]
    fn unreadable_date_format_is_rejected() {
        let mut config = config();
        config.date_formats.push("%Q garbage".to_string());

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDateFormat(format)) if format == "%Q garbage"
        ));
    }

    #[test]
    fn date_format_without_a_year_is_rejected() {
        let mut config = config();
        config.date_formats = vec!["%B %d".to_string()];

        assert!(matches!(config.validate(), Err(ConfigError::InvalidDateFormat(_))));
    }

    #[test]
    fn common_date_formats_are_accepted() -> TestResult {
        let mut config = config();
        config.date_formats = ["%B %d, %Y", "%b %d %Y", "%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d"]
            .map(String::from)
            .to_vec();

        config.validate()?;

        Ok(())
    }

    #[test]
    fn empty_code_hints_are_rejected() {
        let mut config = config();
        config.code_hints = vec![" ".to_string()];

        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyList("extraction.code_hints"))
        ));
    }
}
