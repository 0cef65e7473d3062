//! Metadata account snapshot.

use mpl_token_metadata::accounts::Metadata as MetadataAccount;
use solana_sdk::{account::Account, pubkey::Pubkey};

use crate::constants::TOKEN_METADATA_PROGRAM_ID;
use crate::errors::{ClientError, ClientResult};
use crate::pdas::{find_metadata_pda, Pda};
use crate::types::{trim_padded, Collection, Creator, JsonMetadata, TokenStandard, Uses};

/// Read-only snapshot of a metadata account.
///
/// Fixed-width string fields are trimmed of NUL padding; optional on-chain
/// sub-structures stay `Option` so absence is distinguishable from empty.
/// `json` carries the off-chain document when it has been resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub address: Pda,
    pub mint_address: Pubkey,
    pub update_authority_address: Pubkey,
    pub json: Option<JsonMetadata>,
    pub json_loaded: bool,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub is_mutable: bool,
    pub primary_sale_happened: bool,
    pub seller_fee_basis_points: u16,
    pub edition_nonce: Option<u8>,
    pub creators: Vec<Creator>,
    pub token_standard: Option<TokenStandard>,
    pub collection: Option<Collection>,
    pub uses: Option<Uses>,
}

impl Metadata {
    /// Map a decoded metadata account into a snapshot, without off-chain
    /// enrichment.
    pub fn from_account(account: MetadataAccount) -> Self {
        Self {
            address: find_metadata_pda(&account.mint),
            mint_address: account.mint,
            update_authority_address: account.update_authority,
            json: None,
            json_loaded: false,
            name: trim_padded(&account.name),
            symbol: trim_padded(&account.symbol),
            uri: trim_padded(&account.uri),
            is_mutable: account.is_mutable,
            primary_sale_happened: account.primary_sale_happened,
            seller_fee_basis_points: account.seller_fee_basis_points,
            edition_nonce: account.edition_nonce,
            creators: account.creators.unwrap_or_default(),
            token_standard: account.token_standard,
            collection: account.collection,
            uses: account.uses,
        }
    }

    /// Attach (or mark as attempted) the off-chain JSON document.
    pub fn with_json(mut self, json: Option<JsonMetadata>) -> Self {
        self.json = json;
        self.json_loaded = true;
        self
    }
}

/// Decode a raw metadata account, rejecting accounts that are not owned by
/// the token-metadata program or fail deserialization.
pub fn parse_metadata_account(
    address: &Pubkey,
    account: &Account,
) -> ClientResult<MetadataAccount> {
    if account.owner != TOKEN_METADATA_PROGRAM_ID {
        return Err(ClientError::UnexpectedAccount {
            address: address.to_string(),
            message: format!("owned by {}, expected the token metadata program", account.owner),
        });
    }
    MetadataAccount::safe_deserialize(&account.data).map_err(|e| ClientError::AccountDecode {
        address: address.to_string(),
        message: e.to_string(),
    })
}
