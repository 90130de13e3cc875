//! Temporal & Ranking Enrichment
//!
//! Parses expiration text into dates, works out how many days are left relative to
//! the evaluation date, assigns an urgency tier and a ranking score, and orders
//! offers for display. Enrichment of a single record never fails: text that cannot
//! be parsed leaves the expiration unknown.

use std::cmp::Ordering;

use jiff::civil::Date;
use tracing::debug;

use crate::{
    config::{ConfigError, ExtractionConfig},
    offers::{EnrichedOffer, OfferCandidate, UrgencyTier},
};

pub mod dates;
pub mod score;

pub use dates::DateParser;
pub use score::DiscountScorer;

/// Turns deduplicated candidates into ranked, enriched offers.
#[derive(Debug, Clone)]
pub struct Enricher {
    dates: DateParser,
    scorer: DiscountScorer,
}

impl Enricher {
    /// Build an enricher from the date formats and scoring weights.
    ///
    /// # Errors
    ///
    /// Returns an error if a scoring weight is invalid.
    pub fn new(config: &ExtractionConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            dates: DateParser::new(&config.date_formats)?,
            scorer: DiscountScorer::new(config.scoring)?,
        })
    }

    /// Enrich one candidate relative to `today`.
    pub fn enrich(&self, candidate: OfferCandidate, today: Date) -> EnrichedOffer {
        let expiration_date = candidate
            .expiration_text
            .as_deref()
            .and_then(|text| self.dates.parse(text));

        let days_left = expiration_date
            .and_then(|date| today.until(date).ok())
            .as_ref()
            .map(jiff::Span::get_days);

        EnrichedOffer {
            discount_score: self.scorer.score(&candidate.discount),
            offer: candidate,
            expiration_date,
            days_left,
            urgency: UrgencyTier::from_days_left(days_left),
            is_expired: days_left.is_some_and(|days| days < 0),
        }
    }

    /// Enrich a batch, drop expired offers and sort the rest for display.
    ///
    /// Returns the ranked offers and the number of expired offers dropped.
    pub fn enrich_batch(&self, candidates: Vec<OfferCandidate>, today: Date) -> (Vec<EnrichedOffer>, usize) {
        let mut expired = 0;

        let mut offers: Vec<EnrichedOffer> = candidates
            .into_iter()
            .map(|candidate| self.enrich(candidate, today))
            .filter(|offer| {
                if offer.is_expired {
                    expired += 1;
                    debug!(merchant = %offer.offer.merchant, days_left = ?offer.days_left, "dropped expired offer");
                }

                !offer.is_expired
            })
            .collect();

        rank(&mut offers);

        (offers, expired)
    }
}

/// Sort offers soonest-expiring first, unknown expirations last, then by
/// descending discount score. The sort is stable.
pub fn rank(offers: &mut [EnrichedOffer]) {
    offers.sort_by(display_order);
}

/// The display ordering used by [`rank`].
pub fn display_order(a: &EnrichedOffer, b: &EnrichedOffer) -> Ordering {
    a.sort_days()
        .cmp(&b.sort_days())
        .then_with(|| b.discount_score.cmp(&a.discount_score))
}
