//! Namespaced token client.

use crate::client::NftkitClient;
use crate::errors::ClientResult;

use super::{SendTokensInput, SendTokensOperation, SendTokensOutput};

/// Entry point for token operations, obtained through
/// [`NftkitClient::tokens`](crate::client::NftkitClient::tokens).
pub struct TokenClient<'a> {
    client: &'a NftkitClient,
}

impl<'a> TokenClient<'a> {
    pub(crate) fn new(client: &'a NftkitClient) -> Self {
        Self { client }
    }

    /// Transfer tokens, creating the destination ATA when needed.
    pub async fn send(&self, input: SendTokensInput) -> ClientResult<SendTokensOutput> {
        self.client.execute(SendTokensOperation { input }).await
    }
}
