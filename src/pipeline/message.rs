//! Out-of-band message posted by the fingerprint stage.

use crate::defaults::MESSAGE_NAME;
use serde::{Deserialize, Serialize};

/// Element message carrying a fingerprint code.
///
/// Mirrors an element message named `echoprint` with a single string field
/// `code`. No other fields are carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EchoprintMessage {
    pub code: String,
}

impl EchoprintMessage {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    /// Structure name of the message.
    pub fn name(&self) -> &'static str {
        MESSAGE_NAME
    }

    /// Serialize message to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize message from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}
