//! Create a non-fungible token.
//!
//! Builds on the SFT transaction (decimals 0, supply 1) and appends the
//! master edition instruction, which freezes the mint authority and caps
//! further minting. The whole sequence is one atomic transaction.

use std::sync::Arc;

use async_trait::async_trait;
use mpl_token_metadata::instructions::CreateMasterEditionV3Builder;
use solana_program::program_pack::Pack;
use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer};

use crate::builder::{InstructionRecord, TransactionBuilder};
use crate::client::NftkitClient;
use crate::errors::{ClientError, ClientResult};
use crate::operation::{Operation, OperationHandler, OperationScope};
use crate::pdas::{find_master_edition_pda, Pda};
use crate::rpc::{ConfirmOptions, SendAndConfirmResponse};
use crate::types::{Collection, Creator, Uses};

use super::create_sft::{create_sft_builder, sft_data, CreateSftBuilderParams};

/// Inputs for [`CreateNftOperation`].
///
/// `max_supply` follows the metadata program's convention: `Some(0)` forbids
/// prints, `Some(n)` allows up to `n`, `None` is unlimited.
pub struct CreateNftInput {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub seller_fee_basis_points: u16,
    pub payer: Option<Arc<Keypair>>,
    pub update_authority: Option<Arc<Keypair>>,
    pub mint_authority: Option<Arc<Keypair>>,
    pub mint: Option<Arc<Keypair>>,
    pub token_owner: Option<Pubkey>,
    pub creators: Option<Vec<Creator>>,
    pub is_mutable: bool,
    pub max_supply: Option<u64>,
    pub collection: Option<Collection>,
    pub uses: Option<Uses>,
    pub confirm_options: ConfirmOptions,
}

impl Default for CreateNftInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            symbol: String::new(),
            uri: String::new(),
            seller_fee_basis_points: 0,
            payer: None,
            update_authority: None,
            mint_authority: None,
            mint: None,
            token_owner: None,
            creators: None,
            is_mutable: true,
            max_supply: Some(0),
            collection: None,
            uses: None,
            confirm_options: ConfirmOptions::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateNftOutput {
    pub response: SendAndConfirmResponse,
    pub mint_address: Pubkey,
    pub metadata_address: Pda,
    pub master_edition_address: Pda,
    pub token_address: Pubkey,
}

pub struct CreateNftOperation {
    pub input: CreateNftInput,
}

impl Operation for CreateNftOperation {
    const KEY: &'static str = "CreateNftOperation";
    type Output = CreateNftOutput;
}

pub(crate) struct CreateNftHandler;

#[async_trait]
impl OperationHandler<CreateNftOperation> for CreateNftHandler {
    async fn handle(
        &self,
        operation: CreateNftOperation,
        client: &NftkitClient,
        scope: &OperationScope,
    ) -> ClientResult<CreateNftOutput> {
        scope.throw_if_canceled(CreateNftOperation::KEY)?;
        let input = operation.input;

        let identity = client.identity().clone();
        let payer = input.payer.unwrap_or_else(|| identity.clone());
        let update_authority = input.update_authority.unwrap_or_else(|| identity.clone());
        let mint_authority = input.mint_authority.unwrap_or_else(|| identity.clone());
        let mint = input.mint.unwrap_or_else(|| Arc::new(Keypair::new()));
        let token_owner = input.token_owner.unwrap_or_else(|| identity.pubkey());

        let mint_rent = client
            .connection()
            .minimum_balance_for_rent_exemption(spl_token::state::Mint::LEN)
            .await?;
        scope.throw_if_canceled(CreateNftOperation::KEY)?;

        let data = sft_data(
            input.name,
            input.symbol,
            input.uri,
            input.seller_fee_basis_points,
            input.creators,
            input.collection,
            input.uses,
            &update_authority.pubkey(),
        );

        let builder = create_nft_builder(CreateNftBuilderParams {
            sft: CreateSftBuilderParams {
                payer: payer.clone(),
                update_authority,
                mint_authority,
                mint,
                freeze_authority: None,
                decimals: 0,
                mint_rent,
                token_owner: Some(token_owner),
                token_amount: Some(1),
                data,
                is_mutable: input.is_mutable,
            },
            max_supply: input.max_supply,
        })?;

        let context = builder
            .context()
            .cloned()
            .ok_or_else(|| ClientError::invalid_input("builder produced no context"))?;

        let response = builder
            .send_and_confirm(client.connection(), &input.confirm_options)
            .await?;

        Ok(CreateNftOutput {
            response,
            mint_address: context.mint_address,
            metadata_address: context.metadata_address,
            master_edition_address: context.master_edition_address,
            token_address: context.token_address,
        })
    }
}

pub struct CreateNftBuilderParams {
    pub sft: CreateSftBuilderParams,
    pub max_supply: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct CreateNftBuilderContext {
    pub mint_address: Pubkey,
    pub metadata_address: Pda,
    pub master_edition_address: Pda,
    pub token_address: Pubkey,
}

/// Assemble the create-NFT transaction without touching the network.
pub fn create_nft_builder(
    params: CreateNftBuilderParams,
) -> ClientResult<TransactionBuilder<CreateNftBuilderContext>> {
    let payer = params.sft.payer.clone();
    let update_authority = params.sft.update_authority.clone();
    let mint_authority = params.sft.mint_authority.clone();

    let sft_builder = create_sft_builder(params.sft)?;
    let sft_context = sft_builder
        .context()
        .cloned()
        .ok_or_else(|| ClientError::invalid_input("builder produced no context"))?;
    let token_address = sft_context
        .token_address
        .ok_or_else(|| ClientError::invalid_input("an NFT requires a token owner"))?;
    let master_edition_address = find_master_edition_pda(&sft_context.mint_address);

    let mut edition_builder = CreateMasterEditionV3Builder::new();
    edition_builder
        .edition(master_edition_address.address)
        .mint(sft_context.mint_address)
        .update_authority(update_authority.pubkey())
        .mint_authority(mint_authority.pubkey())
        .payer(payer.pubkey())
        .metadata(sft_context.metadata_address.address);
    if let Some(max_supply) = params.max_supply {
        edition_builder.max_supply(max_supply);
    }

    TransactionBuilder::new()
        .set_fee_payer(payer.clone())
        .set_context(CreateNftBuilderContext {
            mint_address: sft_context.mint_address,
            metadata_address: sft_context.metadata_address,
            master_edition_address,
            token_address,
        })
        .merge(sft_builder)?
        .add(InstructionRecord::new(
            edition_builder.instruction(),
            vec![payer, mint_authority, update_authority],
            "createMasterEdition",
        ))
}
