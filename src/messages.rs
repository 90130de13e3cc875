//! Messages
//!
//! The raw email records handed to the pipeline by the mail collaborator.

use serde::{Deserialize, Serialize};

/// A single email as received from the mail source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMessage {
    /// Subject header
    pub subject: String,

    /// From header, usually in `Display Name <address>` form
    pub sender: String,

    /// Plain-text body
    pub body: String,
}

impl RawMessage {
    /// Create a new message from its subject, sender and body.
    pub fn new(
        subject: impl Into<String>,
        sender: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            sender: sender.into(),
            body: body.into(),
        }
    }

    /// True when the body holds no readable text.
    #[must_use]
    pub fn has_empty_body(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// The display-name portion of the sender, if there is one.
    ///
    /// `"Target Deals <deals@target.com>"` yields `Target Deals`; a bare address
    /// yields `None`. Surrounding quotes are stripped.
    #[must_use]
    pub fn sender_display_name(&self) -> Option<&str> {
        sender_display_name(&self.sender)
    }

    /// The address portion of the sender.
    #[must_use]
    pub fn sender_address(&self) -> Option<&str> {
        sender_address(&self.sender)
    }
}

/// Extract the display name from a `From` header value.
pub fn sender_display_name(sender: &str) -> Option<&str> {
    let (name, _) = sender.split_once('<')?;

    let name = name.trim().trim_matches(|ch| ch == '"' || ch == '\'').trim();

    (!name.is_empty()).then_some(name)
}

/// Extract the mailbox address from a `From` header value.
pub fn sender_address(sender: &str) -> Option<&str> {
    let address = match sender.split_once('<') {
        Some((_, rest)) => rest.split_once('>').map_or(rest, |(inner, _)| inner),
        None => sender,
    }
    .trim();

    address.contains('@').then_some(address)
}
