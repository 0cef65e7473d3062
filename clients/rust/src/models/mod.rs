//! Typed, read-only snapshots of on-chain accounts.
//!
//! Models are derived from account bytes at a point in time and never
//! mutated in place; an update on chain is observed as a new snapshot after
//! a new fetch. Mappers are pure and total on well-formed input; malformed
//! accounts are rejected by the fetch layer before mapping.

mod edition;
mod metadata;
mod mint;
mod nft;
mod token;

pub use edition::NftEdition;
pub use metadata::{parse_metadata_account, Metadata};
pub use mint::{parse_mint_account, Mint};
pub use nft::Nft;
pub use token::{parse_token_account, TokenAccount};
