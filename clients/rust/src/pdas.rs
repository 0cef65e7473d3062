//! Deterministic program-derived address derivations.
//!
//! All derivations are pure: the same seed tuple always yields the same
//! address and canonical bump. Addresses are recomputed on demand, never
//! cached. Exhausting the bump search space is treated as fatal inside
//! `Pubkey::find_program_address` and has no error path here.

use solana_sdk::pubkey::Pubkey;

use crate::constants::{EDITION_MARKER_SIZE, EDITION_SEED, METADATA_SEED, TOKEN_METADATA_PROGRAM_ID};

/// A program-derived address together with its canonical bump seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pda {
    pub address: Pubkey,
    pub bump: u8,
}

impl Pda {
    pub fn new(address: Pubkey, bump: u8) -> Self {
        Self { address, bump }
    }
}

impl std::ops::Deref for Pda {
    type Target = Pubkey;

    fn deref(&self) -> &Pubkey {
        &self.address
    }
}

impl From<Pda> for Pubkey {
    fn from(pda: Pda) -> Pubkey {
        pda.address
    }
}

impl std::fmt::Display for Pda {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.address.fmt(f)
    }
}

/// Derive the metadata account address for a mint.
pub fn find_metadata_pda(mint: &Pubkey) -> Pda {
    let (address, bump) = Pubkey::find_program_address(
        &[
            METADATA_SEED,
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
        ],
        &TOKEN_METADATA_PROGRAM_ID,
    );
    Pda::new(address, bump)
}

/// Derive the master edition account address for a mint.
pub fn find_master_edition_pda(mint: &Pubkey) -> Pda {
    let (address, bump) = Pubkey::find_program_address(
        &[
            METADATA_SEED,
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
            EDITION_SEED,
        ],
        &TOKEN_METADATA_PROGRAM_ID,
    );
    Pda::new(address, bump)
}

/// Derive the edition account address for a print mint.
///
/// Same seeds as the master edition; the account discriminator tells the
/// two apart after fetch.
pub fn find_edition_pda(mint: &Pubkey) -> Pda {
    find_master_edition_pda(mint)
}

/// Derive the edition-marker account for a given print number.
///
/// Markers are paged: each marker account covers [`EDITION_MARKER_SIZE`]
/// consecutive edition numbers of one master mint.
pub fn find_edition_marker_pda(mint: &Pubkey, edition: u64) -> Pda {
    let page = (edition / EDITION_MARKER_SIZE).to_string();
    let (address, bump) = Pubkey::find_program_address(
        &[
            METADATA_SEED,
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
            EDITION_SEED,
            page.as_bytes(),
        ],
        &TOKEN_METADATA_PROGRAM_ID,
    );
    Pda::new(address, bump)
}

/// Derive the associated token account address for an owner and mint.
pub fn find_associated_token_account_pda(mint: &Pubkey, owner: &Pubkey) -> Pda {
    let (address, bump) = Pubkey::find_program_address(
        &[
            owner.as_ref(),
            spl_token::id().as_ref(),
            mint.as_ref(),
        ],
        &spl_associated_token_account::id(),
    );
    Pda::new(address, bump)
}
