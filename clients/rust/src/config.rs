//! Configuration types for the client.
//!
//! This module provides configuration structs for rate limiting, retries,
//! and the main client configuration.

use std::sync::Arc;

use solana_sdk::{commitment_config::CommitmentConfig, signature::Keypair, signer::Signer};

use crate::errors::{ClientError, ClientResult};

/// Rate limiting configuration for RPC requests.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per second
    pub max_rps: u32,
    /// Burst capacity for token bucket
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_rps: 10,
            burst_size: 20,
        }
    }
}

/// Retry configuration for transport-level failures.
///
/// Retries apply only inside the RPC connection layer; the transaction
/// builder and operation registry never retry on their own.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial delay between retries in milliseconds
    pub initial_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Transaction confirmation timeout in milliseconds
    pub confirmation_timeout_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay_ms: 500,
            max_delay_ms: 30_000,
            backoff_multiplier: 2.0,
            confirmation_timeout_ms: 60_000,
        }
    }
}

/// Main configuration for the client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Solana RPC URL
    pub rpc_url: String,
    /// Default commitment level for fetches and confirmations
    pub commitment: CommitmentConfig,
    /// Current identity: default payer, update authority and mint authority
    pub identity: Arc<Keypair>,
    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,
    /// Retry configuration
    pub retry: RetryConfig,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("rpc_url", &self.rpc_url)
            .field("commitment", &self.commitment)
            .field("identity", &self.identity.pubkey())
            .field("rate_limit", &self.rate_limit)
            .field("retry", &self.retry)
            .finish()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Default)]
pub struct ClientConfigBuilder {
    rpc_url: Option<String>,
    commitment: Option<CommitmentConfig>,
    identity: Option<Arc<Keypair>>,
    rate_limit: Option<RateLimitConfig>,
    retry: Option<RetryConfig>,
}

impl ClientConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the RPC URL (required).
    pub fn rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = Some(url.into());
        self
    }

    /// Set the default commitment level.
    pub fn commitment(mut self, commitment: CommitmentConfig) -> Self {
        self.commitment = Some(commitment);
        self
    }

    /// Set the identity keypair (required).
    pub fn identity(mut self, identity: Arc<Keypair>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Set the rate limit configuration.
    pub fn rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    /// Set the retry configuration.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Build the configuration, validating required fields.
    pub fn build(self) -> ClientResult<ClientConfig> {
        let missing = |field: &str| ClientError::MissingField {
            field: field.to_string(),
        };
        Ok(ClientConfig {
            rpc_url: self.rpc_url.ok_or_else(|| missing("rpc_url"))?,
            commitment: self.commitment.unwrap_or_else(CommitmentConfig::confirmed),
            identity: self.identity.ok_or_else(|| missing("identity"))?,
            rate_limit: self.rate_limit.unwrap_or_default(),
            retry: self.retry.unwrap_or_default(),
        })
    }
}
