//! Offers
//!
//! Records that flow through the pipeline: [`OfferCandidate`] from extraction
//! until deduplication, then [`EnrichedOffer`] once dates and ranking are known.

use std::fmt;

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Discount text used when a code is found but no discount phrase matches.
pub const FALLBACK_DISCOUNT: &str = "Check email for details";

/// A promo code: non-empty, uppercase, no whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PromoCode(String);

impl PromoCode {
    /// Normalise a raw token into a code.
    ///
    /// Returns `None` if the token is empty or contains whitespace.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();

        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return None;
        }

        Some(Self(trimmed.to_uppercase()))
    }

    /// The code text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PromoCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PromoCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value).ok_or_else(|| format!("invalid promo code: {value:?}"))
    }
}

impl From<PromoCode> for String {
    fn from(code: PromoCode) -> Self {
        code.0
    }
}

/// An offer category name taken from the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Name of the category assigned when no taxonomy keyword matches.
    pub const OTHER: &'static str = "Other";

    /// Create a category with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The default "Other" category.
    #[must_use]
    pub fn other() -> Self {
        Self(Self::OTHER.to_string())
    }

    /// True for the default "Other" category.
    #[must_use]
    pub fn is_other(&self) -> bool {
        self.0 == Self::OTHER
    }

    /// The category name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::other()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An offer extracted from one email, not yet deduplicated or enriched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OfferCandidate {
    /// Promo code, if one was found near a hint phrase
    pub code: Option<PromoCode>,

    /// Merchant name; empty until resolved
    pub merchant: String,

    /// Discount description, e.g. "40% off"
    pub discount: String,

    /// Expiration phrase as found in the email
    pub expiration_text: Option<String>,

    /// Assigned category
    pub category: Category,

    /// Subject of the source email
    pub source_subject: String,

    /// Sender of the source email
    pub source_sender: String,

    /// Short snippet of the email around the match
    pub raw_context: String,
}

impl OfferCandidate {
    /// True when the discount is the fallback text rather than a matched phrase.
    #[must_use]
    pub fn has_fallback_discount(&self) -> bool {
        self.discount.is_empty() || self.discount == FALLBACK_DISCOUNT
    }
}

/// Temporal urgency bucket.
///
/// Variants are declared in ascending order of display priority, so the derived
/// ordering matches the sort order used for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UrgencyTier {
    /// Expiration date is in the past
    Expired,

    /// Expires today or tomorrow
    Critical,

    /// Expires in 2-3 days
    High,

    /// Expires in 4-7 days
    Medium,

    /// Expires in more than a week
    Low,

    /// Expiration date unknown
    Unknown,
}

impl UrgencyTier {
    /// Assign a tier from the number of days left.
    #[must_use]
    pub fn from_days_left(days_left: Option<i32>) -> Self {
        match days_left {
            None => Self::Unknown,
            Some(days) if days < 0 => Self::Expired,
            Some(0 | 1) => Self::Critical,
            Some(2..=3) => Self::High,
            Some(4..=7) => Self::Medium,
            Some(_) => Self::Low,
        }
    }

    /// Tier name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expired => "Expired",
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finalised offer with its computed expiration, urgency and ranking score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedOffer {
    /// The deduplicated candidate
    #[serde(flatten)]
    pub offer: OfferCandidate,

    /// Parsed expiration date, `None` when unknown
    pub expiration_date: Option<Date>,

    /// Whole days from the evaluation date until expiration, `None` when unknown
    pub days_left: Option<i32>,

    /// Urgency tier derived from `days_left`
    pub urgency: UrgencyTier,

    /// Ranking weight; used for ordering only
    #[serde(skip)]
    pub discount_score: Decimal,

    /// True iff `days_left` is known and negative
    pub is_expired: bool,
}

impl EnrichedOffer {
    /// Days left as used for sorting: unknown expirations sort after everything else.
    #[must_use]
    pub fn sort_days(&self) -> i32 {
        self.days_left.unwrap_or(i32::MAX)
    }

    /// Human label for the urgency, e.g. "Today", "Tomorrow", "5 days".
    #[must_use]
    pub fn urgency_label(&self) -> String {
        match (self.urgency, self.days_left) {
            (UrgencyTier::Unknown, _) | (_, None) => UrgencyTier::Unknown.to_string(),
            (UrgencyTier::Expired, _) => UrgencyTier::Expired.to_string(),
            (_, Some(0)) => "Today".to_string(),
            (_, Some(1)) => "Tomorrow".to_string(),
            (_, Some(days)) => format!("{days} days"),
        }
    }

    /// Expiration text for display.
    #[must_use]
    pub fn display_expiration(&self) -> &str {
        self.offer.expiration_text.as_deref().unwrap_or("No expiration")
    }

    /// Discount text for display.
    #[must_use]
    pub fn display_discount(&self) -> &str {
        if self.offer.discount.is_empty() {
            "See email for details"
        } else {
            &self.offer.discount
        }
    }

    /// True if the offer expires within `days` days (inclusive).
    #[must_use]
    pub fn expires_within(&self, days: i32) -> bool {
        self.days_left.is_some_and(|left| (0..=days).contains(&left))
    }
}
