//! Message Fixtures

use serde::Deserialize;

use crate::messages::RawMessage;

/// Wrapper for a message batch in YAML
#[derive(Debug, Deserialize)]
pub struct MessagesFixture {
    /// Messages in batch order
    pub messages: Vec<RawMessage>,
}
