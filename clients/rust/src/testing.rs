//! Crate-internal test stubs.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey,
    signature::Signature, transaction::Transaction,
};

use crate::downloader::MetadataDownloader;
use crate::errors::{ClientError, ClientResult};
use crate::rpc::RpcConnection;
use crate::types::JsonMetadata;

/// Connection stub that counts calls and fails on use.
///
/// Lets tests assert that validation errors fire before any network call.
pub(crate) struct CountingStubConnection {
    calls: AtomicU32,
}

impl CountingStubConnection {
    pub(crate) fn new() -> Self {
        Self {
            calls: AtomicU32::new(0),
        }
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) -> ClientError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ClientError::Internal(anyhow::anyhow!("stub connection used"))
    }
}

#[async_trait]
impl RpcConnection for CountingStubConnection {
    async fn get_account(
        &self,
        _address: &Pubkey,
        _commitment: CommitmentConfig,
    ) -> ClientResult<Option<Account>> {
        Err(self.touch())
    }

    async fn get_multiple_accounts(
        &self,
        _addresses: &[Pubkey],
        _commitment: CommitmentConfig,
    ) -> ClientResult<Vec<Option<Account>>> {
        Err(self.touch())
    }

    async fn get_latest_blockhash(&self) -> ClientResult<Hash> {
        Err(self.touch())
    }

    async fn minimum_balance_for_rent_exemption(&self, _size: usize) -> ClientResult<u64> {
        Err(self.touch())
    }

    async fn send_transaction(&self, _transaction: &Transaction) -> ClientResult<Signature> {
        Err(self.touch())
    }

    async fn confirm_transaction(
        &self,
        _signature: &Signature,
        _commitment: CommitmentConfig,
    ) -> ClientResult<bool> {
        Err(self.touch())
    }

    async fn transaction_logs(&self, _signature: &Signature) -> ClientResult<Vec<String>> {
        Err(self.touch())
    }

    fn default_commitment(&self) -> CommitmentConfig {
        CommitmentConfig::confirmed()
    }

    fn default_confirmation_timeout(&self) -> Duration {
        Duration::from_secs(1)
    }
}

/// Connection stub that accepts submissions but never observes confirmation.
///
/// Every `confirm_transaction` poll reports the signature as unconfirmed, so
/// send-and-confirm exhausts whatever budget it was given.
pub(crate) struct UnconfirmedConnection;

#[async_trait]
impl RpcConnection for UnconfirmedConnection {
    async fn get_account(
        &self,
        _address: &Pubkey,
        _commitment: CommitmentConfig,
    ) -> ClientResult<Option<Account>> {
        Ok(None)
    }

    async fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
        _commitment: CommitmentConfig,
    ) -> ClientResult<Vec<Option<Account>>> {
        Ok(vec![None; addresses.len()])
    }

    async fn get_latest_blockhash(&self) -> ClientResult<Hash> {
        Ok(Hash::new_unique())
    }

    async fn minimum_balance_for_rent_exemption(&self, _size: usize) -> ClientResult<u64> {
        Ok(0)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> ClientResult<Signature> {
        Ok(transaction.signatures.first().copied().unwrap_or_default())
    }

    async fn confirm_transaction(
        &self,
        _signature: &Signature,
        _commitment: CommitmentConfig,
    ) -> ClientResult<bool> {
        Ok(false)
    }

    async fn transaction_logs(&self, _signature: &Signature) -> ClientResult<Vec<String>> {
        Ok(Vec::new())
    }

    fn default_commitment(&self) -> CommitmentConfig {
        CommitmentConfig::confirmed()
    }

    fn default_confirmation_timeout(&self) -> Duration {
        Duration::from_millis(0)
    }
}

/// Downloader stub that always fails.
pub(crate) struct StubDownloader;

#[async_trait]
impl MetadataDownloader for StubDownloader {
    async fn download(&self, uri: &str) -> ClientResult<JsonMetadata> {
        Err(ClientError::MetadataDownload {
            uri: uri.to_string(),
            message: "stub downloader".to_string(),
        })
    }
}
