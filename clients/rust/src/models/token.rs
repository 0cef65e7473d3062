//! Token account snapshot.

use solana_program::program_pack::Pack;
use solana_sdk::{account::Account, pubkey::Pubkey};
use spl_token::state::AccountState;

use crate::errors::{ClientError, ClientResult};
use crate::types::TokenAmount;

/// Read-only snapshot of a token account.
///
/// The amount carries the mint's decimals, which live on the mint account
/// and must be supplied at mapping time.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenAccount {
    pub address: Pubkey,
    pub mint_address: Pubkey,
    pub owner_address: Pubkey,
    pub amount: TokenAmount,
    pub delegate: Option<Pubkey>,
    pub delegated_amount: TokenAmount,
    pub close_authority: Option<Pubkey>,
    pub state: AccountState,
}

impl TokenAccount {
    pub fn from_account(address: Pubkey, state: spl_token::state::Account, decimals: u8) -> Self {
        Self {
            address,
            mint_address: state.mint,
            owner_address: state.owner,
            amount: TokenAmount::new(state.amount, decimals),
            delegate: state.delegate.into(),
            delegated_amount: TokenAmount::new(state.delegated_amount, decimals),
            close_authority: state.close_authority.into(),
            state: state.state,
        }
    }
}

/// Decode a raw token account owned by the token program.
pub fn parse_token_account(
    address: &Pubkey,
    account: &Account,
) -> ClientResult<spl_token::state::Account> {
    if account.owner != spl_token::id() {
        return Err(ClientError::UnexpectedAccount {
            address: address.to_string(),
            message: format!("owned by {}, expected the token program", account.owner),
        });
    }
    spl_token::state::Account::unpack(&account.data).map_err(|e| ClientError::AccountDecode {
        address: address.to_string(),
        message: e.to_string(),
    })
}
