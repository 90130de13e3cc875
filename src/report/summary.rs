//! Offer Summary & Filtering

use rustc_hash::FxHashMap;

use crate::offers::{Category, EnrichedOffer};

/// Offers expiring within this many days count as "expiring soon".
pub const EXPIRING_SOON_DAYS: i32 = 7;

/// Selects offers for display by category and by how soon they expire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferFilter {
    /// Only offers in this category (case-insensitive)
    pub category: Option<String>,

    /// Only offers with a known expiration within this many days
    pub expiring_within: Option<i32>,
}

impl OfferFilter {
    /// A filter that keeps every offer.
    pub fn all() -> Self {
        Self::default()
    }

    /// Keep only offers in `category`.
    #[must_use]
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Keep only offers expiring within [`EXPIRING_SOON_DAYS`].
    #[must_use]
    pub fn expiring_soon(self) -> Self {
        self.expiring_within(EXPIRING_SOON_DAYS)
    }

    /// Keep only offers expiring within `days`.
    #[must_use]
    pub fn expiring_within(mut self, days: i32) -> Self {
        self.expiring_within = Some(days);
        self
    }

    /// True if the offer passes every condition.
    pub fn matches(&self, offer: &EnrichedOffer) -> bool {
        let category_matches = self
            .category
            .as_deref()
            .is_none_or(|category| offer.offer.category.as_str().eq_ignore_ascii_case(category.trim()));

        let expiry_matches = self
            .expiring_within
            .is_none_or(|days| offer.expires_within(days));

        category_matches && expiry_matches
    }

    /// The matching offers, in their original order.
    pub fn apply<'a>(&self, offers: &'a [EnrichedOffer]) -> Vec<&'a EnrichedOffer> {
        offers.iter().filter(|offer| self.matches(offer)).collect()
    }
}

/// Counts shown alongside a list of offers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferSummary {
    /// Number of offers
    pub total: usize,

    /// Offers with a known expiration within [`EXPIRING_SOON_DAYS`]
    pub expiring_soon: usize,

    /// Offers that carry a promo code
    pub with_code: usize,

    /// Offers per category, most populated first, then by name
    pub by_category: Vec<(Category, usize)>,
}

impl OfferSummary {
    /// Summarise a list of offers.
    pub fn from_offers<'a>(offers: impl IntoIterator<Item = &'a EnrichedOffer>) -> Self {
        let mut summary = Self::default();
        let mut counts: FxHashMap<&Category, usize> = FxHashMap::default();

        for offer in offers {
            summary.total += 1;

            if offer.expires_within(EXPIRING_SOON_DAYS) {
                summary.expiring_soon += 1;
            }

            if offer.offer.code.is_some() {
                summary.with_code += 1;
            }

            *counts.entry(&offer.offer.category).or_default() += 1;
        }

        let mut by_category: Vec<(Category, usize)> = counts
            .into_iter()
            .map(|(category, count)| (category.clone(), count))
            .collect();

        by_category.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        summary.by_category = by_category;

        summary
    }
}
