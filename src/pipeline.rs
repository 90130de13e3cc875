//! Pipeline
//!
//! Runs the stages over a batch of messages: extraction, merchant resolution and
//! categorisation per message, then deduplication and enrichment over the whole
//! batch. Configuration is checked once, when the pipeline is built; after that a
//! run cannot fail.

use jiff::{Zoned, civil::Date};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    categorize::Categorizer,
    config::{ConfigError, PipelineConfig},
    dedup::Deduplicator,
    enrich::Enricher,
    extract::PatternExtractor,
    merchants::MerchantResolver,
    messages::RawMessage,
    offers::{EnrichedOffer, OfferCandidate},
};

/// Errors building a pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The configuration is missing data or malformed.
    #[error("invalid pipeline configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Counts describing one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Messages in the batch
    pub messages: usize,

    /// Messages that produced no candidates
    pub skipped: usize,

    /// Candidates extracted across all messages
    pub candidates: usize,

    /// Offers left after deduplication
    pub unique: usize,

    /// Offers dropped because they have expired
    pub expired: usize,

    /// Offers returned
    pub emitted: usize,
}

/// A configured extraction and enrichment pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    extractor: PatternExtractor,
    merchants: MerchantResolver,
    categorizer: Categorizer,
    deduplicator: Deduplicator,
    enricher: Enricher,
}

impl Pipeline {
    /// Validate the configuration and build every stage.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation or a configured
    /// phrase cannot be compiled.
    pub fn new(config: &PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;

        Ok(Self {
            extractor: PatternExtractor::new(&config.extraction)?,
            merchants: MerchantResolver::new(&config.merchants),
            categorizer: Categorizer::new(&config.taxonomy),
            deduplicator: Deduplicator,
            enricher: Enricher::new(&config.extraction)?,
        })
    }

    /// Run the pipeline with urgency relative to the current date in the system time zone.
    pub fn run_today(&self, messages: &[RawMessage]) -> Vec<EnrichedOffer> {
        self.run(messages, Zoned::now().date())
    }

    /// Run the pipeline with urgency relative to `today`.
    pub fn run(&self, messages: &[RawMessage], today: Date) -> Vec<EnrichedOffer> {
        self.run_with_stats(messages, today).0
    }

    /// Run the pipeline, also returning counts for the run.
    #[tracing::instrument(skip_all, fields(messages = messages.len(), today = %today))]
    pub fn run_with_stats(&self, messages: &[RawMessage], today: Date) -> (Vec<EnrichedOffer>, RunStats) {
        let mut stats = RunStats {
            messages: messages.len(),
            ..RunStats::default()
        };

        let mut candidates = Vec::new();

        for (index, message) in messages.iter().enumerate() {
            let extracted = self.candidates_for(message);

            if extracted.is_empty() {
                stats.skipped += 1;

                debug!(
                    index,
                    subject = %message.subject,
                    empty_body = message.has_empty_body(),
                    "no offer found in message"
                );
            }

            candidates.extend(extracted);
        }

        stats.candidates = candidates.len();

        let unique = self.deduplicator.deduplicate(candidates);
        stats.unique = unique.len();

        let (offers, expired) = self.enricher.enrich_batch(unique, today);
        stats.expired = expired;
        stats.emitted = offers.len();

        info!(
            messages = stats.messages,
            skipped = stats.skipped,
            candidates = stats.candidates,
            unique = stats.unique,
            expired = stats.expired,
            emitted = stats.emitted,
            "pipeline run complete"
        );

        (offers, stats)
    }

    /// Extract, name and categorise the offers in one message.
    ///
    /// Messages are independent at this stage, so callers may run this in parallel
    /// and hand the combined candidates to [`Pipeline::finish`].
    pub fn candidates_for(&self, message: &RawMessage) -> Vec<OfferCandidate> {
        let mut candidates = self.extractor.extract(message);

        for candidate in &mut candidates {
            self.merchants.fill(candidate);
            self.categorizer.assign(candidate);
        }

        candidates
    }

    /// Deduplicate and enrich a complete batch of candidates.
    pub fn finish(&self, candidates: Vec<OfferCandidate>, today: Date) -> Vec<EnrichedOffer> {
        self.enricher
            .enrich_batch(self.deduplicator.deduplicate(candidates), today)
            .0
    }
}
