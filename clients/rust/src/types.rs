//! Shared value types for the client.
//!
//! On-chain value types (creators, collections, uses) are re-exported from
//! the token-metadata program crate rather than redefined here, so callers
//! and the instruction encoders always agree on layout.

use serde::{Deserialize, Serialize};

pub use mpl_token_metadata::types::{
    Collection, CollectionDetails, Creator, DataV2, Key, TokenStandard, UseMethod, Uses,
};

/// A fixed-point token amount.
///
/// Amounts are carried as raw basis points plus the mint's decimals, never as
/// floats, so no precision is lost between fetch and submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenAmount {
    /// Raw amount in the mint's smallest unit.
    pub basis_points: u64,
    /// Number of decimals of the mint.
    pub decimals: u8,
}

impl TokenAmount {
    pub fn new(basis_points: u64, decimals: u8) -> Self {
        Self {
            basis_points,
            decimals,
        }
    }

    /// Whole-unit amount for a zero-decimal mint (NFT convention).
    pub fn token(amount: u64) -> Self {
        Self::new(amount, 0)
    }

    /// Render as a decimal string without going through floats.
    pub fn ui_amount_string(&self) -> String {
        if self.decimals == 0 {
            return self.basis_points.to_string();
        }
        let divisor = 10u64.pow(self.decimals as u32);
        let whole = self.basis_points / divisor;
        let frac = self.basis_points % divisor;
        format!(
            "{whole}.{frac:0width$}",
            width = self.decimals as usize
        )
    }
}

/// Off-chain JSON metadata document resolved from a metadata URI.
///
/// All fields are optional: the document shape is conventionally the
/// token-metadata standard but nothing on chain enforces it. Unknown fields
/// are preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<JsonAttribute>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A single trait entry of a JSON metadata document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonAttribute {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trait_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

/// Trim trailing NUL padding from a fixed-width on-chain string field.
pub(crate) fn trim_padded(value: &str) -> String {
    value.trim_end_matches('\0').to_string()
}
