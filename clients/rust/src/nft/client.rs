//! Namespaced NFT client.

use solana_sdk::pubkey::Pubkey;

use crate::client::NftkitClient;
use crate::errors::ClientResult;
use crate::models::{Metadata, Nft};

use super::{
    CreateNftInput, CreateNftOperation, CreateNftOutput, CreateSftInput, CreateSftOperation,
    CreateSftOutput, FindNftByMintInput, FindNftByMintOperation, FindNftsByMintListInput,
    FindNftsByMintListOperation, LoadMetadataInput, LoadMetadataOperation, PrintNewEditionInput,
    PrintNewEditionOperation, PrintNewEditionOutput, UpdateNftInput, UpdateNftOperation,
    UpdateNftOutput,
};

/// Entry point for NFT operations, obtained through
/// [`NftkitClient::nfts`](crate::client::NftkitClient::nfts).
pub struct NftClient<'a> {
    client: &'a NftkitClient,
}

impl<'a> NftClient<'a> {
    pub(crate) fn new(client: &'a NftkitClient) -> Self {
        Self { client }
    }

    /// Create a non-fungible token in one transaction.
    pub async fn create(&self, input: CreateNftInput) -> ClientResult<CreateNftOutput> {
        self.client.execute(CreateNftOperation { input }).await
    }

    /// Create a semi-fungible token in one transaction.
    pub async fn create_sft(&self, input: CreateSftInput) -> ClientResult<CreateSftOutput> {
        self.client.execute(CreateSftOperation { input }).await
    }

    /// Fetch an NFT by mint, resolving its off-chain JSON best-effort.
    pub async fn find_by_mint(&self, mint_address: Pubkey) -> ClientResult<Nft> {
        self.find_by_mint_with(FindNftByMintInput::new(mint_address))
            .await
    }

    /// Fetch an NFT by mint with explicit options.
    pub async fn find_by_mint_with(&self, input: FindNftByMintInput) -> ClientResult<Nft> {
        self.client.execute(FindNftByMintOperation { input }).await
    }

    /// Fetch metadata snapshots for a list of mints; missing accounts yield
    /// `None` in the matching slot.
    pub async fn find_all_by_mint_list(
        &self,
        mint_addresses: Vec<Pubkey>,
    ) -> ClientResult<Vec<Option<Metadata>>> {
        self.client
            .execute(FindNftsByMintListOperation {
                input: FindNftsByMintListInput {
                    mint_addresses,
                    commitment: None,
                },
            })
            .await
    }

    /// Resolve the off-chain JSON document of a snapshot; failures are hard
    /// errors here.
    pub async fn load_metadata(&self, metadata: Metadata) -> ClientResult<Metadata> {
        self.client
            .execute(LoadMetadataOperation {
                input: LoadMetadataInput { metadata },
            })
            .await
    }

    /// Update on-chain metadata fields.
    pub async fn update(&self, input: UpdateNftInput) -> ClientResult<UpdateNftOutput> {
        self.client.execute(UpdateNftOperation { input }).await
    }

    /// Print the next edition from a master edition.
    pub async fn print_new_edition(
        &self,
        input: PrintNewEditionInput,
    ) -> ClientResult<PrintNewEditionOutput> {
        self.client.execute(PrintNewEditionOperation { input }).await
    }
}
