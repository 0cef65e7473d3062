//! RPC connection layer.
//!
//! The client core only consumes the [`RpcConnection`] trait; the production
//! implementation [`SolanaConnection`] wraps the nonblocking RPC client with
//! rate limiting and retries. Tests substitute an in-memory mock.

pub mod rate_limiter;
pub mod retry;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use solana_client::client_error::{ClientError as RpcClientError, ClientErrorKind};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcTransactionConfig;
use solana_client::rpc_request::{RpcError, RpcResponseErrorData};
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey,
    signature::Signature, transaction::Transaction,
};
use solana_transaction_status::UiTransactionEncoding;

use crate::config::ClientConfig;
use crate::constants::CONFIRMATION_POLL_INTERVAL_MS;
use crate::errors::{ClientError, ClientResult};

pub use rate_limiter::RpcRateLimiter;
pub use retry::RetryExecutor;

/// Options for sending and confirming a transaction.
#[derive(Debug, Clone, Default)]
pub struct ConfirmOptions {
    /// Commitment level to confirm at; defaults to the connection's
    /// configured commitment.
    pub commitment: Option<CommitmentConfig>,
    /// Confirmation budget; defaults to the connection's retry config.
    pub timeout: Option<Duration>,
}

/// Response of a successful send-and-confirm cycle.
#[derive(Debug, Clone)]
pub struct SendAndConfirmResponse {
    /// Signature of the confirmed transaction.
    pub signature: Signature,
    /// Raw program logs of the confirmed transaction, when the RPC node
    /// exposes them. Empty when unavailable.
    pub logs: Vec<String>,
}

/// External collaborator supplying ledger access.
///
/// Implementations own transport policy (rate limiting, retries). The core
/// never retries on top of this interface.
#[async_trait]
pub trait RpcConnection: Send + Sync {
    /// Fetch a single account, `None` if it does not exist.
    async fn get_account(
        &self,
        address: &Pubkey,
        commitment: CommitmentConfig,
    ) -> ClientResult<Option<Account>>;

    /// Fetch a batch of accounts; missing accounts yield `None` slots.
    async fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
        commitment: CommitmentConfig,
    ) -> ClientResult<Vec<Option<Account>>>;

    /// Latest blockhash for transaction assembly.
    async fn get_latest_blockhash(&self) -> ClientResult<Hash>;

    /// Rent-exempt minimum for an account of the given size.
    async fn minimum_balance_for_rent_exemption(&self, size: usize) -> ClientResult<u64>;

    /// Submit a signed transaction. Rejections surface as
    /// [`ClientError::RpcSubmission`] with program logs attached.
    async fn send_transaction(&self, transaction: &Transaction) -> ClientResult<Signature>;

    /// Whether the transaction has reached the given commitment.
    async fn confirm_transaction(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> ClientResult<bool>;

    /// Program logs of a confirmed transaction; empty when unavailable.
    async fn transaction_logs(&self, signature: &Signature) -> ClientResult<Vec<String>>;

    /// Default commitment of this connection.
    fn default_commitment(&self) -> CommitmentConfig;

    /// Default confirmation budget of this connection.
    fn default_confirmation_timeout(&self) -> Duration;
}

/// Poll until the transaction reaches `commitment` or the budget elapses.
///
/// Cancellation past this point cannot un-send the transaction; a timeout
/// means confirmation was not observed, not that the transaction failed.
pub async fn confirm_with_timeout(
    connection: &dyn RpcConnection,
    signature: &Signature,
    commitment: CommitmentConfig,
    timeout: Duration,
) -> ClientResult<()> {
    let started = tokio::time::Instant::now();
    loop {
        if connection.confirm_transaction(signature, commitment).await? {
            return Ok(());
        }
        if started.elapsed() >= timeout {
            return Err(ClientError::ConfirmationTimeout {
                timeout_ms: timeout.as_millis() as u64,
            });
        }
        tokio::time::sleep(Duration::from_millis(CONFIRMATION_POLL_INTERVAL_MS)).await;
    }
}

/// Production connection over the nonblocking RPC client.
pub struct SolanaConnection {
    rpc: Arc<RpcClient>,
    rate_limiter: RpcRateLimiter,
    retry_executor: RetryExecutor,
    commitment: CommitmentConfig,
}

impl SolanaConnection {
    /// Create a connection from the client configuration.
    pub fn new(config: &ClientConfig) -> Self {
        let rpc = Arc::new(RpcClient::new_with_commitment(
            config.rpc_url.clone(),
            config.commitment,
        ));
        Self {
            rpc,
            rate_limiter: RpcRateLimiter::new(config.rate_limit.clone()),
            retry_executor: RetryExecutor::new(config.retry.clone()),
            commitment: config.commitment,
        }
    }

    /// Access the underlying RPC client for advanced calls.
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// Pull program logs out of a preflight rejection, if present.
    fn submission_error(err: RpcClientError) -> ClientError {
        if let ClientErrorKind::RpcError(RpcError::RpcResponseError {
            data: RpcResponseErrorData::SendTransactionPreflightFailure(sim),
            message,
            ..
        }) = &err.kind
        {
            return ClientError::RpcSubmission {
                message: message.clone(),
                logs: sim.logs.clone().unwrap_or_default(),
            };
        }
        ClientError::Rpc(err)
    }
}

#[async_trait]
impl RpcConnection for SolanaConnection {
    async fn get_account(
        &self,
        address: &Pubkey,
        commitment: CommitmentConfig,
    ) -> ClientResult<Option<Account>> {
        let _guard = self.rate_limiter.acquire().await?;
        self.retry_executor
            .execute(|| async {
                let response = self
                    .rpc
                    .get_account_with_commitment(address, commitment)
                    .await?;
                Ok(response.value)
            })
            .await
    }

    async fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
        commitment: CommitmentConfig,
    ) -> ClientResult<Vec<Option<Account>>> {
        let _guard = self.rate_limiter.acquire().await?;
        self.retry_executor
            .execute(|| async {
                let response = self
                    .rpc
                    .get_multiple_accounts_with_commitment(addresses, commitment)
                    .await?;
                Ok(response.value)
            })
            .await
    }

    async fn get_latest_blockhash(&self) -> ClientResult<Hash> {
        let _guard = self.rate_limiter.acquire().await?;
        self.retry_executor
            .execute(|| async { Ok(self.rpc.get_latest_blockhash().await?) })
            .await
    }

    async fn minimum_balance_for_rent_exemption(&self, size: usize) -> ClientResult<u64> {
        let _guard = self.rate_limiter.acquire().await?;
        self.retry_executor
            .execute(|| async {
                Ok(self
                    .rpc
                    .get_minimum_balance_for_rent_exemption(size)
                    .await?)
            })
            .await
    }

    async fn send_transaction(&self, transaction: &Transaction) -> ClientResult<Signature> {
        let _guard = self.rate_limiter.acquire().await?;
        // Single attempt: a rejection is not transient, and re-sending is
        // left to the caller who still holds the builder inputs.
        self.rpc
            .send_transaction(transaction)
            .await
            .map_err(Self::submission_error)
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> ClientResult<bool> {
        let _guard = self.rate_limiter.acquire().await?;
        let response = self
            .rpc
            .confirm_transaction_with_commitment(signature, commitment)
            .await?;
        Ok(response.value)
    }

    async fn transaction_logs(&self, signature: &Signature) -> ClientResult<Vec<String>> {
        let _guard = self.rate_limiter.acquire().await?;
        let config = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::Base64),
            commitment: Some(self.commitment),
            max_supported_transaction_version: Some(0),
        };
        match self.rpc.get_transaction_with_config(signature, config).await {
            Ok(tx) => Ok(tx
                .transaction
                .meta
                .and_then(|meta| Option::<Vec<String>>::from(meta.log_messages))
                .unwrap_or_default()),
            Err(err) => {
                tracing::warn!(signature = %signature, error = %err, "Could not fetch transaction logs");
                Ok(Vec::new())
            }
        }
    }

    fn default_commitment(&self) -> CommitmentConfig {
        self.commitment
    }

    fn default_confirmation_timeout(&self) -> Duration {
        self.retry_executor.confirmation_timeout()
    }
}
