//! Error types for the nftkit client.
//!
//! Provides rich error types with retry hints and categorization
//! for better error handling and observability.

use thiserror::Error;

/// Result alias used throughout the client.
pub type ClientResult<T> = Result<T, ClientError>;

/// Main error type for client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    // Network Errors
    #[error("RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    #[error("Rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    // Transaction Errors
    #[error("Transaction rejected: {message}")]
    RpcSubmission { message: String, logs: Vec<String> },

    #[error("Confirmation timeout after {timeout_ms}ms")]
    ConfirmationTimeout { timeout_ms: u64 },

    // Program Errors
    #[error("Program error in {program}: {message}")]
    ProgramLogic {
        program: String,
        message: String,
        logs: Vec<String>,
    },

    // Builder / Input Validation Errors
    #[error("Transaction has no fee payer")]
    MissingFeePayer,

    #[error("Duplicate instruction key: {key}")]
    DuplicateInstructionKey { key: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Dispatch Errors
    #[error("No handler registered for operation: {key}")]
    UnregisteredOperation { key: String },

    #[error("Operation canceled: {key}")]
    OperationCanceled { key: String },

    // Configuration Errors
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    // Account Errors
    #[error("Account not found: {address}")]
    AccountNotFound { address: String },

    #[error("Unexpected account at {address}: {message}")]
    UnexpectedAccount { address: String, message: String },

    #[error("Failed to decode account {address}: {message}")]
    AccountDecode { address: String, message: String },

    // Off-chain Metadata Errors
    #[error("Failed to download metadata from {uri}: {message}")]
    MetadataDownload { uri: String, message: String },

    // Internal Errors
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl ClientError {
    /// Check if this error is retryable.
    ///
    /// Retryable errors are typically transient network issues
    /// that may succeed on retry. Retry policy lives in the RPC
    /// transport layer; the builder and registry never retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Rpc(_)
                | ClientError::RateLimited { .. }
                | ClientError::ConfirmationTimeout { .. }
        )
    }

    /// Get a retry hint in milliseconds, if available.
    pub fn retry_hint_ms(&self) -> Option<u64> {
        match self {
            ClientError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            ClientError::ConfirmationTimeout { .. } => Some(2000),
            _ => None,
        }
    }

    /// Categorize the error for metrics and logging.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::Rpc(_) | ClientError::RateLimited { .. } => ErrorCategory::Network,

            ClientError::RpcSubmission { .. } | ClientError::ConfirmationTimeout { .. } => {
                ErrorCategory::Transaction
            }

            ClientError::ProgramLogic { .. } => ErrorCategory::Program,

            ClientError::MissingFeePayer
            | ClientError::DuplicateInstructionKey { .. }
            | ClientError::InvalidInput(_) => ErrorCategory::Validation,

            ClientError::UnregisteredOperation { .. } | ClientError::OperationCanceled { .. } => {
                ErrorCategory::Dispatch
            }

            ClientError::InvalidConfig { .. } | ClientError::MissingField { .. } => {
                ErrorCategory::Config
            }

            ClientError::AccountNotFound { .. }
            | ClientError::UnexpectedAccount { .. }
            | ClientError::AccountDecode { .. } => ErrorCategory::Account,

            ClientError::MetadataDownload { .. } => ErrorCategory::OffChain,

            ClientError::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// Create a submission error from an RPC rejection plus program logs.
    pub fn submission_failed(message: impl Into<String>, logs: Vec<String>) -> Self {
        ClientError::RpcSubmission {
            message: message.into(),
            logs,
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ClientError::InvalidInput(message.into())
    }

    /// Create an account-not-found error.
    pub fn account_not_found(address: impl ToString) -> Self {
        ClientError::AccountNotFound {
            address: address.to_string(),
        }
    }
}

/// Error category for metrics and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (RPC, rate limiting)
    Network,
    /// Transaction-related errors (submission, confirmation)
    Transaction,
    /// On-chain program failures derived from logs
    Program,
    /// Input validation errors caught before any network call
    Validation,
    /// Operation dispatch errors (unknown key, cancellation)
    Dispatch,
    /// Configuration errors
    Config,
    /// Account fetch/decode errors
    Account,
    /// Off-chain metadata errors
    OffChain,
    /// Internal errors
    Internal,
}

impl ErrorCategory {
    /// Short label for log fields and metric tags.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Transaction => "transaction",
            ErrorCategory::Program => "program",
            ErrorCategory::Validation => "validation",
            ErrorCategory::Dispatch => "dispatch",
            ErrorCategory::Config => "config",
            ErrorCategory::Account => "account",
            ErrorCategory::OffChain => "offchain",
            ErrorCategory::Internal => "internal",
        }
    }
}
