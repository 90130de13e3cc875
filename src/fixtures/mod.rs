//! Fixtures
//!
//! Loads pipeline configuration and message batches from YAML files laid out as
//! `<base>/<kind>/<name>.yml`, where kind is one of `taxonomy`, `merchants`,
//! `extraction` or `messages`.

use std::{fs, path::PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{
    config::{ConfigError, ExtractionConfig, MerchantRules, PipelineConfig, Taxonomy},
    fixtures::messages::MessagesFixture,
    messages::RawMessage,
    pipeline::{Pipeline, PipelineError},
};

pub mod messages;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// A configuration section has not been loaded
    #[error("No {0} fixture loaded")]
    MissingSection(&'static str),

    /// The loaded configuration is invalid
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The pipeline could not be built from the loaded configuration
    #[error("Failed to build pipeline: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Fixture
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    taxonomy: Option<Taxonomy>,
    merchants: Option<MerchantRules>,
    extraction: Option<ExtractionConfig>,

    /// Messages from every loaded batch, in load order
    messages: Vec<RawMessage>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            taxonomy: None,
            merchants: None,
            extraction: None,
            messages: Vec::new(),
        }
    }

    fn read<T: DeserializeOwned>(&self, kind: &str, name: &str) -> Result<T, FixtureError> {
        let file_path = self.base_path.join(kind).join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        Ok(serde_norway::from_str(&contents)?)
    }

    /// Load a category taxonomy from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_taxonomy(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        self.taxonomy = Some(self.read("taxonomy", name)?);

        Ok(self)
    }

    /// Load merchant rules from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_merchants(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        self.merchants = Some(self.read("merchants", name)?);

        Ok(self)
    }

    /// Load extraction settings from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_extraction(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        self.extraction = Some(self.read("extraction", name)?);

        Ok(self)
    }

    /// Load a message batch from a YAML fixture file, appending to any already loaded
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_messages(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: MessagesFixture = self.read("messages", name)?;

        self.messages.extend(fixture.messages);

        Ok(self)
    }

    /// Load a complete fixture set (taxonomy, merchants, extraction and messages with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture
            .load_taxonomy(name)?
            .load_merchants(name)?
            .load_extraction(name)?
            .load_messages(name)?;

        Ok(fixture)
    }

    /// Assemble and validate the pipeline configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a section has not been loaded or the configuration is invalid.
    pub fn config(&self) -> Result<PipelineConfig, FixtureError> {
        let taxonomy = self
            .taxonomy
            .clone()
            .ok_or(FixtureError::MissingSection("taxonomy"))?;
        let merchants = self
            .merchants
            .clone()
            .ok_or(FixtureError::MissingSection("merchants"))?;
        let extraction = self
            .extraction
            .clone()
            .ok_or(FixtureError::MissingSection("extraction"))?;

        Ok(PipelineConfig::new(taxonomy, merchants, extraction)?)
    }

    /// Build a pipeline from the loaded configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete or invalid.
    pub fn pipeline(&self) -> Result<Pipeline, FixtureError> {
        Ok(Pipeline::new(&self.config()?)?)
    }

    /// Get all loaded messages
    pub fn messages(&self) -> &[RawMessage] {
        &self.messages
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
