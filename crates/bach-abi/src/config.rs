//! Decoder configuration

use serde::{Deserialize, Serialize};

use crate::error::{AbiError, Result};

/// How the decoder treats words that are not the canonical encoding of their type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Reject non-canonical words
    #[default]
    Strict,
    /// Accept non-canonical words, normalizing them
    Lenient,
}

impl DecodeMode {
    /// Whether non-canonical words are rejected
    pub fn is_strict(&self) -> bool {
        matches!(self, DecodeMode::Strict)
    }
}

/// Coder configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoderConfig {
    /// Decode policy for bool, address, integer and `bytesN` words
    #[serde(default)]
    pub decode_mode: DecodeMode,
}

impl CoderConfig {
    /// Strict decoding (the default)
    pub fn strict() -> Self {
        Self { decode_mode: DecodeMode::Strict }
    }

    /// Lenient decoding
    pub fn lenient() -> Self {
        Self { decode_mode: DecodeMode::Lenient }
    }

    /// Load from a JSON document, e.g. `{"decode_mode": "lenient"}`
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| AbiError::invalid_argument("config", json, e.to_string()))
    }
}
