//! Main client implementation.
//!
//! `NftkitClient` is the entry point: it owns the RPC connection, the
//! current identity, the operation registry and the program registry, and
//! exposes namespaced clients (`nfts()`, `tokens()`) that construct
//! operations and delegate to the registry.

use std::sync::Arc;

use solana_sdk::signature::Keypair;

use crate::config::ClientConfig;
use crate::downloader::{HttpDownloader, MetadataDownloader};
use crate::errors::ClientResult;
use crate::nft::NftClient;
use crate::operation::{Operation, OperationRegistry, OperationScope};
use crate::programs::ProgramRegistry;
use crate::rpc::{RpcConnection, SolanaConnection};
use crate::token::TokenClient;
use crate::{nft, token};

/// Client for the token and token-metadata programs.
///
/// Construction installs the built-in modules: every supported operation is
/// registered once, and the registries are read-only afterwards.
///
/// # Example
///
/// ```ignore
/// use nftkit_client::{ClientConfigBuilder, NftkitClient};
///
/// let config = ClientConfigBuilder::new()
///     .rpc_url("https://api.mainnet-beta.solana.com")
///     .identity(identity_keypair)
///     .build()?;
/// let client = NftkitClient::new(config);
///
/// let nft = client.nfts().find_by_mint(mint_address).await?;
/// ```
pub struct NftkitClient {
    connection: Arc<dyn RpcConnection>,
    downloader: Arc<dyn MetadataDownloader>,
    identity: Arc<Keypair>,
    operations: OperationRegistry,
    programs: ProgramRegistry,
}

impl NftkitClient {
    /// Create a client over a real RPC endpoint.
    pub fn new(config: ClientConfig) -> Self {
        let identity = config.identity.clone();
        let connection = Arc::new(SolanaConnection::new(&config));
        Self::with_connection(connection, Arc::new(HttpDownloader::new()), identity)
    }

    /// Create a client over an explicit connection and downloader.
    ///
    /// This is the seam used by tests to substitute an in-memory ledger.
    pub fn with_connection(
        connection: Arc<dyn RpcConnection>,
        downloader: Arc<dyn MetadataDownloader>,
        identity: Arc<Keypair>,
    ) -> Self {
        let mut operations = OperationRegistry::new();
        let mut programs = ProgramRegistry::new();
        nft::install(&mut operations, &mut programs);
        token::install(&mut operations, &mut programs);

        Self {
            connection,
            downloader,
            identity,
            operations,
            programs,
        }
    }

    /// The RPC connection collaborator.
    pub fn connection(&self) -> &dyn RpcConnection {
        self.connection.as_ref()
    }

    /// The off-chain metadata downloader collaborator.
    pub fn downloader(&self) -> &dyn MetadataDownloader {
        self.downloader.as_ref()
    }

    /// The current identity: default payer and authority for operations.
    pub fn identity(&self) -> &Arc<Keypair> {
        &self.identity
    }

    /// The operation registry.
    pub fn operations(&self) -> &OperationRegistry {
        &self.operations
    }

    /// The program registry.
    pub fn programs(&self) -> &ProgramRegistry {
        &self.programs
    }

    /// NFT operations namespace.
    pub fn nfts(&self) -> NftClient<'_> {
        NftClient::new(self)
    }

    /// Token operations namespace.
    pub fn tokens(&self) -> TokenClient<'_> {
        TokenClient::new(self)
    }

    /// Dispatch an operation with a fresh cancellation scope.
    pub async fn execute<O: Operation>(&self, operation: O) -> ClientResult<O::Output> {
        self.execute_with_scope(operation, &OperationScope::new())
            .await
    }

    /// Dispatch an operation under a caller-owned cancellation scope.
    pub async fn execute_with_scope<O: Operation>(
        &self,
        operation: O,
        scope: &OperationScope,
    ) -> ClientResult<O::Output> {
        self.operations.execute(operation, self, scope).await
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self::with_connection(
            Arc::new(crate::testing::CountingStubConnection::new()),
            Arc::new(crate::testing::StubDownloader),
            Arc::new(Keypair::new()),
        )
    }
}
