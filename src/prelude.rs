//! Promo Sift prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    categorize::Categorizer,
    config::{
        CategoryRule, CodeLength, ConfigError, ExtractionConfig, MerchantRules, PipelineConfig,
        ScoreWeights, Taxonomy,
    },
    dedup::{Deduplicator, OfferKey},
    enrich::{DateParser, DiscountScorer, Enricher, rank},
    extract::PatternExtractor,
    fixtures::{Fixture, FixtureError},
    merchants::MerchantResolver,
    messages::RawMessage,
    offers::{Category, EnrichedOffer, OfferCandidate, PromoCode, UrgencyTier},
    pipeline::{Pipeline, PipelineError, RunStats},
    report::{OfferFilter, OfferRecord, OfferSummary, ReportError},
};
