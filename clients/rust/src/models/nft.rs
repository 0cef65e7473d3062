//! Aggregate NFT snapshot.

use solana_sdk::pubkey::Pubkey;

use super::{Metadata, Mint, NftEdition};
use crate::types::JsonMetadata;

/// A non-fungible (or semi-fungible) token as seen at fetch time: metadata,
/// mint state and, for non-fungibles, the edition companion.
#[derive(Debug, Clone, PartialEq)]
pub struct Nft {
    pub metadata: Metadata,
    pub mint: Mint,
    pub edition: Option<NftEdition>,
}

impl Nft {
    pub fn new(metadata: Metadata, mint: Mint, edition: Option<NftEdition>) -> Self {
        Self {
            metadata,
            mint,
            edition,
        }
    }

    pub fn mint_address(&self) -> &Pubkey {
        &self.mint.address
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn uri(&self) -> &str {
        &self.metadata.uri
    }

    pub fn json(&self) -> Option<&JsonMetadata> {
        self.metadata.json.as_ref()
    }

    /// Whether a master edition caps this mint (true NFT, not an SFT).
    pub fn is_original(&self) -> bool {
        self.edition
            .as_ref()
            .map(NftEdition::is_original)
            .unwrap_or(false)
    }
}
