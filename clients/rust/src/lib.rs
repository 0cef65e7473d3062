//! Nftkit Client
//!
//! A Rust client for the Solana token and token-metadata programs.
//!
//! # Features
//!
//! - **Atomic Transactions**: Composable transaction builder with labeled instructions
//! - **Typed Operations**: Every action is a typed operation dispatched through a registry
//! - **Rate Limiting**: Built-in token bucket rate limiting for RPC requests
//! - **Retry Logic**: Automatic retry with exponential backoff for transient read failures
//! - **Deterministic Addresses**: Metadata, edition and associated-token PDA derivations
//! - **Off-chain Enrichment**: Best-effort JSON metadata resolution for find operations
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use nftkit_client::{ClientConfigBuilder, CreateNftInput, NftkitClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfigBuilder::new()
//!         .rpc_url("https://api.mainnet-beta.solana.com")
//!         .identity(Arc::new(identity_keypair))
//!         .build()?;
//!     let client = NftkitClient::new(config);
//!
//!     let created = client
//!         .nfts()
//!         .create(CreateNftInput {
//!             name: "Some NFT".to_string(),
//!             uri: "https://example.com/nft.json".to_string(),
//!             seller_fee_basis_points: 200,
//!             ..Default::default()
//!         })
//!         .await?;
//!
//!     let nft = client.nfts().find_by_mint(created.mint_address).await?;
//!     println!("{} -> {}", nft.name(), nft.metadata.address);
//!
//!     Ok(())
//! }
//! ```

// Core modules
pub mod builder;
pub mod client;
pub mod config;
pub mod constants;
pub mod downloader;
pub mod errors;
pub mod models;
pub mod nft;
pub mod operation;
pub mod pdas;
pub mod programs;
pub mod rpc;
pub mod token;
pub mod types;

#[cfg(test)]
mod testing;

// Re-exports for convenient access
pub use builder::{InstructionRecord, TransactionBuilder};
pub use client::NftkitClient;
pub use config::{ClientConfig, ClientConfigBuilder, RateLimitConfig, RetryConfig};
pub use downloader::{HttpDownloader, MetadataDownloader};
pub use errors::{ClientError, ClientResult, ErrorCategory};
pub use models::{Metadata, Mint, Nft, NftEdition, TokenAccount};
pub use nft::{CreateNftInput, CreateSftInput, FindNftByMintInput, PrintNewEditionInput, UpdateNftInput};
pub use operation::{Operation, OperationHandler, OperationRegistry, OperationScope};
pub use pdas::Pda;
pub use programs::{ProgramRegistry, RegisteredProgram};
pub use rpc::{ConfirmOptions, RpcConnection, SendAndConfirmResponse, SolanaConnection};
pub use token::SendTokensInput;
pub use types::{JsonAttribute, JsonMetadata, TokenAmount};
