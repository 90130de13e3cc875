//! Discount Phrase Detection

use regex::{Captures, Regex};

/// Discount pattern families, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountFamily {
    /// "40% off", "25% discount", "save 25%"
    Percentage,

    /// "$50 off", "save £10"
    FixedAmount,

    /// "Buy one get one free", "BOGO"
    BuyOneGetOne,

    /// "Free shipping", "free delivery"
    FreeShipping,
}

/// A discount phrase found in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountMatch {
    /// Normalised description, e.g. "40% off"
    pub text: String,

    /// Family that matched
    pub family: DiscountFamily,

    /// Byte offset where the phrase starts
    pub start: usize,

    /// Byte offset just past the phrase
    pub end: usize,
}

const PERCENTAGE: &str = r"(?i)(?:\bsave\s+(?:up\s+to\s+)?(?:an\s+extra\s+)?(?P<saved>\d{1,3}(?:\.\d+)?)\s?%|(?P<value>\d{1,3}(?:\.\d+)?)\s?%\s*(?:off|discount)\b)";

const FIXED_AMOUNT: &str = r"(?i)(?:\bsave\s+(?P<saved_symbol>[$£€])\s?(?P<saved>\d{1,3}(?:[,.]\d{3}){1,2}(?:[.,]\d{1,2})?|\d{1,7}(?:[.,]\d{1,2})?)\b|(?P<symbol>[$£€])\s?(?P<value>\d{1,3}(?:[,.]\d{3}){1,2}(?:[.,]\d{1,2})?|\d{1,7}(?:[.,]\d{1,2})?)\s*off\b)";

const BUY_ONE_GET_ONE: &str = r"(?i)\b(?:bogo\b|buy\s+(?:one|1)\b[^.!?\n]{0,40}?\bget\s+(?:one|1)\b[^.!?\n]{0,20}?\bfree\b)";

const FREE_SHIPPING: &str = r"(?i)\bfree\s+(?:standard\s+)?(?:shipping|delivery)\b";

/// Finds the first discount phrase in text by trying each family in order.
#[derive(Debug, Clone)]
pub struct DiscountMatcher {
    families: [(DiscountFamily, Regex); 4],
}

impl DiscountMatcher {
    /// Compile the discount patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            families: [
                (DiscountFamily::Percentage, Regex::new(PERCENTAGE)?),
                (DiscountFamily::FixedAmount, Regex::new(FIXED_AMOUNT)?),
                (DiscountFamily::BuyOneGetOne, Regex::new(BUY_ONE_GET_ONE)?),
                (DiscountFamily::FreeShipping, Regex::new(FREE_SHIPPING)?),
            ],
        })
    }

    /// Find a discount phrase. The first family with any match wins.
    pub fn find(&self, text: &str) -> Option<DiscountMatch> {
        self.families.iter().find_map(|(family, pattern)| {
            let captures = pattern.captures(text)?;
            let whole = captures.get(0)?;

            Some(DiscountMatch {
                text: normalise(*family, &captures),
                family: *family,
                start: whole.start(),
                end: whole.end(),
            })
        })
    }
}

fn normalise(family: DiscountFamily, captures: &Captures<'_>) -> String {
    let group = |names: [&str; 2]| {
        names
            .iter()
            .find_map(|name| captures.name(name))
            .map_or("", |found| found.as_str().trim())
    };

    match family {
        DiscountFamily::Percentage => format!("{}% off", group(["value", "saved"])),
        DiscountFamily::FixedAmount => {
            format!(
                "{}{} off",
                group(["symbol", "saved_symbol"]),
                group(["value", "saved"])
            )
        }
        DiscountFamily::BuyOneGetOne => "Buy one get one free".to_string(),
        DiscountFamily::FreeShipping => "Free shipping".to_string(),
    }
}
