//! Mint account snapshot.

use solana_program::program_pack::Pack;
use solana_sdk::{account::Account, pubkey::Pubkey};

use crate::errors::{ClientError, ClientResult};
use crate::types::TokenAmount;

/// Read-only snapshot of a token mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mint {
    pub address: Pubkey,
    pub mint_authority: Option<Pubkey>,
    pub freeze_authority: Option<Pubkey>,
    pub supply: TokenAmount,
    pub decimals: u8,
    pub is_initialized: bool,
}

impl Mint {
    pub fn from_account(address: Pubkey, state: spl_token::state::Mint) -> Self {
        Self {
            address,
            mint_authority: state.mint_authority.into(),
            freeze_authority: state.freeze_authority.into(),
            supply: TokenAmount::new(state.supply, state.decimals),
            decimals: state.decimals,
            is_initialized: state.is_initialized,
        }
    }
}

/// Decode a raw mint account owned by the token program.
pub fn parse_mint_account(address: &Pubkey, account: &Account) -> ClientResult<spl_token::state::Mint> {
    if account.owner != spl_token::id() {
        return Err(ClientError::UnexpectedAccount {
            address: address.to_string(),
            message: format!("owned by {}, expected the token program", account.owner),
        });
    }
    spl_token::state::Mint::unpack(&account.data).map_err(|e| ClientError::AccountDecode {
        address: address.to_string(),
        message: e.to_string(),
    })
}
