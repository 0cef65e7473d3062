//! Transfer tokens between wallets.
//!
//! The transfer uses `transfer_checked`, so the amount's decimals must match
//! the mint. Destination accounts default to the owner's associated token
//! account and are created on the fly when absent.

use std::sync::Arc;

use async_trait::async_trait;
use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer};

use crate::builder::{InstructionRecord, TransactionBuilder};
use crate::client::NftkitClient;
use crate::errors::{ClientError, ClientResult};
use crate::operation::{Operation, OperationHandler, OperationScope};
use crate::pdas::find_associated_token_account_pda;
use crate::rpc::{ConfirmOptions, SendAndConfirmResponse};
use crate::types::TokenAmount;

/// Inputs for [`SendTokensOperation`].
pub struct SendTokensInput {
    pub mint_address: Pubkey,
    /// Amount to move; its decimals are validated on chain against the mint.
    pub amount: TokenAmount,
    /// Destination wallet; defaults to the client identity.
    pub to_owner: Option<Pubkey>,
    /// Explicit destination token account; defaults to the owner's ATA.
    pub to_token: Option<Pubkey>,
    /// Owner of the source tokens; defaults to the client identity.
    pub from_owner: Option<Arc<Keypair>>,
    /// Explicit source token account; defaults to the sender's ATA.
    pub from_token: Option<Pubkey>,
    pub payer: Option<Arc<Keypair>>,
    pub confirm_options: ConfirmOptions,
}

impl SendTokensInput {
    pub fn new(mint_address: Pubkey, amount: TokenAmount) -> Self {
        Self {
            mint_address,
            amount,
            to_owner: None,
            to_token: None,
            from_owner: None,
            from_token: None,
            payer: None,
            confirm_options: ConfirmOptions::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SendTokensOutput {
    pub response: SendAndConfirmResponse,
    pub source_address: Pubkey,
    pub destination_address: Pubkey,
}

pub struct SendTokensOperation {
    pub input: SendTokensInput,
}

impl Operation for SendTokensOperation {
    const KEY: &'static str = "SendTokensOperation";
    type Output = SendTokensOutput;
}

pub(crate) struct SendTokensHandler;

#[async_trait]
impl OperationHandler<SendTokensOperation> for SendTokensHandler {
    async fn handle(
        &self,
        operation: SendTokensOperation,
        client: &NftkitClient,
        scope: &OperationScope,
    ) -> ClientResult<SendTokensOutput> {
        scope.throw_if_canceled(SendTokensOperation::KEY)?;
        let input = operation.input;

        let identity = client.identity().clone();
        let payer = input.payer.unwrap_or_else(|| identity.clone());
        let from_owner = input.from_owner.unwrap_or_else(|| identity.clone());
        let to_owner = input.to_owner.unwrap_or_else(|| identity.pubkey());

        let source = input.from_token.unwrap_or_else(|| {
            find_associated_token_account_pda(&input.mint_address, &from_owner.pubkey()).address
        });
        let destination = input.to_token.unwrap_or_else(|| {
            find_associated_token_account_pda(&input.mint_address, &to_owner).address
        });

        // Only a derived ATA can be created on the fly; an explicit token
        // account has to exist already.
        let create_destination = if input.to_token.is_none() {
            let commitment = client.connection().default_commitment();
            client
                .connection()
                .get_account(&destination, commitment)
                .await?
                .is_none()
        } else {
            false
        };
        scope.throw_if_canceled(SendTokensOperation::KEY)?;

        let builder = send_tokens_builder(SendTokensBuilderParams {
            payer,
            mint_address: input.mint_address,
            amount: input.amount,
            from_owner,
            source,
            to_owner,
            destination,
            create_destination,
        })?;

        let response = builder
            .send_and_confirm(client.connection(), &input.confirm_options)
            .await?;

        Ok(SendTokensOutput {
            response,
            source_address: source,
            destination_address: destination,
        })
    }
}

pub struct SendTokensBuilderParams {
    pub payer: Arc<Keypair>,
    pub mint_address: Pubkey,
    pub amount: TokenAmount,
    pub from_owner: Arc<Keypair>,
    pub source: Pubkey,
    pub to_owner: Pubkey,
    pub destination: Pubkey,
    pub create_destination: bool,
}

/// Assemble the transfer transaction without touching the network.
pub fn send_tokens_builder(
    params: SendTokensBuilderParams,
) -> ClientResult<TransactionBuilder<()>> {
    let mut builder = TransactionBuilder::new().set_fee_payer(params.payer.clone());

    if params.create_destination {
        builder = builder.add(InstructionRecord::new(
            spl_associated_token_account::instruction::create_associated_token_account(
                &params.payer.pubkey(),
                &params.to_owner,
                &params.mint_address,
                &spl_token::id(),
            ),
            vec![params.payer.clone()],
            "createAssociatedTokenAccount",
        ))?;
    }

    builder.add(InstructionRecord::new(
        spl_token::instruction::transfer_checked(
            &spl_token::id(),
            &params.source,
            &params.mint_address,
            &params.destination,
            &params.from_owner.pubkey(),
            &[],
            params.amount.basis_points,
            params.amount.decimals,
        )
        .map_err(|e| ClientError::invalid_input(e.to_string()))?,
        vec![params.from_owner],
        "transferTokens",
    ))
}
