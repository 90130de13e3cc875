//! Offer Records
//!
//! The flat shape handed to the persistence collaborator.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::offers::EnrichedOffer;

/// One offer as stored and displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferRecord {
    /// Promo code, if any
    pub code: Option<String>,

    /// Merchant name
    pub merchant: String,

    /// Discount as shown, with the fallback text when none was found
    pub discount: String,

    /// Category name
    pub category: String,

    /// Expiration as written in the email
    pub expiration_text: Option<String>,

    /// Parsed expiration date
    pub expiration_date: Option<Date>,

    /// Expiration for display, "No expiration" when unknown
    pub display_expiration: String,

    /// Whole days left, when known
    pub days_left: Option<i32>,

    /// Urgency label, e.g. "Today", "3 days", "Unknown"
    pub urgency: String,

    /// Whether the user has used the offer; always false for new records
    pub is_used: bool,

    /// Whether the offer has expired
    pub is_expired: bool,
}

impl From<&EnrichedOffer> for OfferRecord {
    fn from(offer: &EnrichedOffer) -> Self {
        Self {
            code: offer.offer.code.as_ref().map(ToString::to_string),
            merchant: offer.offer.merchant.clone(),
            discount: offer.display_discount().to_string(),
            category: offer.offer.category.to_string(),
            expiration_text: offer.offer.expiration_text.clone(),
            expiration_date: offer.expiration_date,
            display_expiration: offer.display_expiration().to_string(),
            days_left: offer.days_left,
            urgency: offer.urgency_label(),
            is_used: false,
            is_expired: offer.is_expired,
        }
    }
}

/// Convert offers to records, keeping their order.
pub fn to_records<'a>(offers: impl IntoIterator<Item = &'a EnrichedOffer>) -> Vec<OfferRecord> {
    offers.into_iter().map(OfferRecord::from).collect()
}
