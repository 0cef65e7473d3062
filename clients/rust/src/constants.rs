//! Program ids and seed constants.

use solana_sdk::pubkey::Pubkey;

/// Token metadata program.
pub const TOKEN_METADATA_PROGRAM_ID: Pubkey = mpl_token_metadata::ID;

/// Seed prefix shared by all token-metadata PDAs.
pub const METADATA_SEED: &[u8] = b"metadata";

/// Seed suffix for edition PDAs.
pub const EDITION_SEED: &[u8] = b"edition";

/// Number of edition numbers covered by one edition-marker account.
pub const EDITION_MARKER_SIZE: u64 = 248;

/// Interval between confirmation polls.
pub const CONFIRMATION_POLL_INTERVAL_MS: u64 = 500;
