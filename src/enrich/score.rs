//! Discount Scoring

use std::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{self, Currency},
};

use crate::config::{ConfigError, ScoreWeights};

/// Turns discount text into a ranking score. Scores are never displayed.
#[derive(Debug, Clone)]
pub struct DiscountScorer {
    percent_weight: Decimal,
    amount_weight: Decimal,
    freebie_score: Decimal,
    percentage: Regex,
    amount: Regex,
    freebie: Regex,
}

impl DiscountScorer {
    /// Create a scorer with the given weights.
    ///
    /// # Errors
    ///
    /// Returns an error if a weight is invalid or a pattern fails to compile.
    pub fn new(weights: ScoreWeights) -> Result<Self, ConfigError> {
        let (percent_weight, amount_weight, freebie_score) = weights.to_decimals()?;

        Ok(Self {
            percent_weight,
            amount_weight,
            freebie_score,
            percentage: Regex::new(r"\b(\d{1,3}(?:\.\d{1,2})?)\s?%")?,
            amount: Regex::new(
                r"([$£€])\s?(\d{1,3}(?:[,.]\d{3}){1,2}(?:[.,]\d{1,2})?|\d{1,7}(?:[.,]\d{1,2})?)(?:\D|$)",
            )?,
            freebie: Regex::new(r"(?i)\b(?:free|bogo)\b")?,
        })
    }

    /// Score a discount description.
    ///
    /// Percentages score their value times the percent weight, currency amounts
    /// their value times the amount weight, and free items, free shipping and
    /// buy-one-get-one offers the flat freebie score. Anything else scores zero.
    /// A product too large to represent saturates at [`Decimal::MAX`].
    pub fn score(&self, discount: &str) -> Decimal {
        if let Some(percent) = self
            .percentage
            .captures(discount)
            .and_then(|captures| captures.get(1))
            .and_then(|value| Decimal::from_str(value.as_str()).ok())
        {
            return percent
                .checked_mul(self.percent_weight)
                .unwrap_or(Decimal::MAX);
        }

        if let Some(money) = self
            .amount
            .captures(discount)
            .and_then(|captures| parse_amount(captures.get(1)?.as_str(), captures.get(2)?.as_str()))
        {
            return money
                .mul(self.amount_weight)
                .map_or(Decimal::MAX, |weighted| *weighted.amount());
        }

        if self.freebie.is_match(discount) {
            return self.freebie_score;
        }

        Decimal::ZERO
    }
}

/// Read an amount the way its currency writes it ("$1,000.50", "€1.000,50"),
/// falling back to a plain decimal point ("€12.50").
fn parse_amount(symbol: &str, amount: &str) -> Option<Money<'static, Currency>> {
    let currency = currency_for(symbol)?;

    Money::from_str(amount, currency).ok().or_else(|| {
        Decimal::from_str(amount)
            .ok()
            .map(|value| Money::from_decimal(value, currency))
    })
}

fn currency_for(symbol: &str) -> Option<&'static Currency> {
    match symbol {
        "$" => Some(iso::USD),
        "£" => Some(iso::GBP),
        "€" => Some(iso::EUR),
        _ => None,
    }
}
