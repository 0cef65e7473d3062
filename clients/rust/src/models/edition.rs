//! Edition account snapshots.

use mpl_token_metadata::accounts::{Edition, MasterEdition as MasterEditionV2};
use solana_sdk::{account::Account, pubkey::Pubkey};

use crate::constants::TOKEN_METADATA_PROGRAM_ID;
use crate::errors::{ClientError, ClientResult};
use crate::pdas::{find_edition_pda, Pda};
use crate::types::Key;

/// Edition companion of a non-fungible mint.
///
/// A master edition caps further minting and tracks its print supply; a
/// print edition points back at its parent master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NftEdition {
    Original {
        address: Pda,
        supply: u64,
        max_supply: Option<u64>,
    },
    Print {
        address: Pda,
        parent: Pubkey,
        number: u64,
    },
}

impl NftEdition {
    /// Decode the edition account belonging to `mint`, telling master and
    /// print apart by the account discriminator.
    pub fn from_account(mint: &Pubkey, account: &Account) -> ClientResult<Self> {
        let address = find_edition_pda(mint);
        if account.owner != TOKEN_METADATA_PROGRAM_ID {
            return Err(ClientError::UnexpectedAccount {
                address: address.to_string(),
                message: format!("owned by {}, expected the token metadata program", account.owner),
            });
        }

        let decode_err = |e: std::io::Error| ClientError::AccountDecode {
            address: address.to_string(),
            message: e.to_string(),
        };

        match account.data.first() {
            Some(&key) if key == Key::MasterEditionV2 as u8 => {
                let edition = MasterEditionV2::from_bytes(&account.data).map_err(decode_err)?;
                Ok(NftEdition::Original {
                    address,
                    supply: edition.supply,
                    max_supply: edition.max_supply,
                })
            }
            Some(&key) if key == Key::EditionV1 as u8 => {
                let edition = Edition::from_bytes(&account.data).map_err(decode_err)?;
                Ok(NftEdition::Print {
                    address,
                    parent: edition.parent,
                    number: edition.edition,
                })
            }
            other => Err(ClientError::UnexpectedAccount {
                address: address.to_string(),
                message: format!("unexpected edition discriminator: {other:?}"),
            }),
        }
    }

    pub fn address(&self) -> &Pda {
        match self {
            NftEdition::Original { address, .. } | NftEdition::Print { address, .. } => address,
        }
    }

    pub fn is_original(&self) -> bool {
        matches!(self, NftEdition::Original { .. })
    }
}
