pub mod mock_connection;

use std::sync::Arc;

use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::signature::{Keypair, Signer};

use nftkit_client::types::JsonMetadata;
use nftkit_client::NftkitClient;

pub use mock_connection::MockConnection;
pub use mock_downloader::MockDownloader;

/// A client wired to an in-memory ledger and a canned downloader, with a
/// funded identity.
pub struct TestContext {
    pub client: NftkitClient,
    pub connection: Arc<MockConnection>,
    pub downloader: Arc<MockDownloader>,
    pub identity: Arc<Keypair>,
}

impl TestContext {
    pub fn new() -> Self {
        let identity = Arc::new(Keypair::new());
        let connection = Arc::new(MockConnection::new());
        connection.airdrop(identity.pubkey(), 100 * LAMPORTS_PER_SOL);
        let downloader = Arc::new(MockDownloader::new());
        let client = NftkitClient::with_connection(
            connection.clone(),
            downloader.clone(),
            identity.clone(),
        );
        Self {
            client,
            connection,
            downloader,
            identity,
        }
    }

    /// Fund an extra wallet on the mock ledger.
    pub fn fund(&self, wallet: &Keypair) {
        self.connection
            .airdrop(wallet.pubkey(), 100 * LAMPORTS_PER_SOL);
    }

    /// Serve a JSON document for a URI.
    pub fn serve_json(&self, uri: &str, document: JsonMetadata) {
        self.downloader.serve(uri, document);
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
