//! Pipeline Configuration
//!
//! All keyword lists, denylists and formats the pipeline depends on are plain
//! data held in a [`PipelineConfig`] and handed to each stage when it is built.

use thiserror::Error;

pub mod extraction;
pub mod merchants;
pub mod taxonomy;

pub use extraction::{CodeLength, ExtractionConfig, ScoreWeights};
pub use merchants::MerchantRules;
pub use taxonomy::{CategoryRule, Taxonomy};

/// Configuration errors. Any of these prevents a pipeline from running.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The taxonomy has no categories.
    #[error("taxonomy has no categories")]
    EmptyTaxonomy,

    /// A category has a blank name.
    #[error("taxonomy contains a category with a blank name")]
    BlankCategoryName,

    /// A category is declared more than once.
    #[error("category {0:?} is declared more than once")]
    DuplicateCategory(String),

    /// A category has no usable keywords.
    #[error("category {0:?} has no keywords")]
    CategoryWithoutKeywords(String),

    /// A required list is empty.
    #[error("{0} must contain at least one entry")]
    EmptyList(&'static str),

    /// A limit that must be positive is zero.
    #[error("{0} must be greater than zero")]
    ZeroLimit(&'static str),

    /// The merchant placeholder is blank.
    #[error("merchant placeholder must not be blank")]
    BlankPlaceholder,

    /// Promo code length bounds are unusable.
    #[error("invalid code length bounds: min {min}, max {max}")]
    InvalidCodeLength {
        /// Configured minimum
        min: usize,

        /// Configured maximum
        max: usize,
    },

    /// A scoring weight is negative or not finite.
    #[error("{0} must be a finite, non-negative number")]
    InvalidWeight(&'static str),

    /// A date format cannot read back the dates it writes.
    #[error("invalid date format {0:?}")]
    InvalidDateFormat(String),

    /// A configured phrase could not be compiled into a pattern.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Complete configuration for one pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Category taxonomy
    pub taxonomy: Taxonomy,

    /// Merchant name rules
    pub merchants: MerchantRules,

    /// Extraction and ranking settings
    pub extraction: ExtractionConfig,
}

impl PipelineConfig {
    /// Create a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found in any section.
    pub fn new(
        taxonomy: Taxonomy,
        merchants: MerchantRules,
        extraction: ExtractionConfig,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            taxonomy,
            merchants,
            extraction,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.taxonomy.validate()?;
        self.merchants.validate()?;
        self.extraction.validate()
    }
}
