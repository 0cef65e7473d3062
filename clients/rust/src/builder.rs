//! Transaction builder.
//!
//! Accumulates instruction records into one atomic transaction, tracking the
//! fee payer, the required signers and an optional typed context of side
//! outputs (derived addresses a caller needs before confirmation). A builder
//! is consumed by sending; resubmission requires rebuilding.

use std::collections::HashSet;
use std::sync::Arc;

use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    message::Message,
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
    transaction::Transaction,
};

use crate::errors::{ClientError, ClientResult};
use crate::rpc::{confirm_with_timeout, ConfirmOptions, RpcConnection, SendAndConfirmResponse};

/// One instruction together with its required signers and a unique label.
///
/// Owned by the builder once added; immutable thereafter. The key labels the
/// instruction so callers can tell which step of a composed transaction a
/// failure belongs to.
pub struct InstructionRecord {
    pub instruction: Instruction,
    pub signers: Vec<Arc<Keypair>>,
    pub key: String,
}

impl InstructionRecord {
    pub fn new(
        instruction: Instruction,
        signers: Vec<Arc<Keypair>>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            instruction,
            signers,
            key: key.into(),
        }
    }
}

/// Ordered accumulator of instruction records.
pub struct TransactionBuilder<C = ()> {
    records: Vec<InstructionRecord>,
    fee_payer: Option<Arc<Keypair>>,
    context: Option<C>,
}

impl<C> Default for TransactionBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> TransactionBuilder<C> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            fee_payer: None,
            context: None,
        }
    }

    /// Append one instruction record.
    ///
    /// Fails with [`ClientError::DuplicateInstructionKey`] if a record with
    /// the same key was already added.
    pub fn add(mut self, record: InstructionRecord) -> ClientResult<Self> {
        if self.records.iter().any(|r| r.key == record.key) {
            return Err(ClientError::DuplicateInstructionKey { key: record.key });
        }
        self.records.push(record);
        Ok(self)
    }

    /// Splice all records of a nested builder at the current insertion point,
    /// preserving their order.
    ///
    /// The child is consumed (explicit flatten, no aliasing). Its fee payer
    /// and context do not carry over.
    pub fn merge<D>(mut self, sub_builder: TransactionBuilder<D>) -> ClientResult<Self> {
        for record in sub_builder.records {
            self = self.add(record)?;
        }
        Ok(self)
    }

    /// Record who pays the transaction fee. Required before sending.
    pub fn set_fee_payer(mut self, fee_payer: Arc<Keypair>) -> Self {
        self.fee_payer = Some(fee_payer);
        self
    }

    pub fn fee_payer(&self) -> Option<&Arc<Keypair>> {
        self.fee_payer.as_ref()
    }

    /// Store a typed side output produced mid-build.
    pub fn set_context(mut self, context: C) -> Self {
        self.context = Some(context);
        self
    }

    pub fn context(&self) -> Option<&C> {
        self.context.as_ref()
    }

    pub fn into_context(self) -> Option<C> {
        self.context
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Instruction keys in insertion order.
    pub fn instruction_keys(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.key.as_str()).collect()
    }

    /// Instructions in insertion order.
    pub fn instructions(&self) -> Vec<Instruction> {
        self.records.iter().map(|r| r.instruction.clone()).collect()
    }

    /// All signers, fee payer first, deduplicated by public key.
    pub fn signers(&self) -> Vec<Arc<Keypair>> {
        let mut seen: HashSet<Pubkey> = HashSet::new();
        let mut signers = Vec::new();
        if let Some(fee_payer) = &self.fee_payer {
            seen.insert(fee_payer.pubkey());
            signers.push(fee_payer.clone());
        }
        for record in &self.records {
            for signer in &record.signers {
                if seen.insert(signer.pubkey()) {
                    signers.push(signer.clone());
                }
            }
        }
        signers
    }

    /// Assemble and sign the atomic transaction.
    pub fn to_transaction(&self, blockhash: Hash) -> ClientResult<Transaction> {
        let fee_payer = self.fee_payer.as_ref().ok_or(ClientError::MissingFeePayer)?;
        let instructions = self.instructions();
        let signers = self.signers();
        let signer_refs: Vec<&Keypair> = signers.iter().map(|s| s.as_ref()).collect();

        let message = Message::new_with_blockhash(
            &instructions,
            Some(&fee_payer.pubkey()),
            &blockhash,
        );
        let mut transaction = Transaction::new_unsigned(message);
        transaction
            .try_sign(&signer_refs, blockhash)
            .map_err(|e| ClientError::invalid_input(format!("signing failed: {e}")))?;
        Ok(transaction)
    }

    /// Serialize, sign, submit and block until the transaction is confirmed
    /// at the requested commitment.
    ///
    /// Validation failures (missing fee payer) are raised before any network
    /// call. Submission rejections carry the program logs; a confirmation
    /// timeout is a distinct error from a rejection.
    pub async fn send_and_confirm(
        self,
        connection: &dyn RpcConnection,
        options: &ConfirmOptions,
    ) -> ClientResult<SendAndConfirmResponse> {
        if self.fee_payer.is_none() {
            return Err(ClientError::MissingFeePayer);
        }

        let commitment = options
            .commitment
            .unwrap_or_else(|| connection.default_commitment());
        let timeout = options
            .timeout
            .unwrap_or_else(|| connection.default_confirmation_timeout());

        let blockhash = connection.get_latest_blockhash().await?;
        let transaction = self.to_transaction(blockhash)?;

        let signature = connection.send_transaction(&transaction).await?;
        tracing::debug!(signature = %signature, "Transaction submitted");

        confirm_with_timeout(connection, &signature, commitment, timeout).await?;

        let logs = connection.transaction_logs(&signature).await?;
        Ok(SendAndConfirmResponse { signature, logs })
    }
}
