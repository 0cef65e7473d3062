//! Create a semi-fungible token: mint account, optional token account and
//! initial supply, and the metadata account, in one atomic transaction.

use std::sync::Arc;

use async_trait::async_trait;
use mpl_token_metadata::instructions::CreateMetadataAccountV3Builder;
use solana_program::program_pack::Pack;
use solana_sdk::{
    pubkey::Pubkey, signature::Keypair, signer::Signer, system_instruction,
};

use crate::builder::{InstructionRecord, TransactionBuilder};
use crate::client::NftkitClient;
use crate::errors::{ClientError, ClientResult};
use crate::operation::{Operation, OperationHandler, OperationScope};
use crate::pdas::{find_associated_token_account_pda, find_metadata_pda, Pda};
use crate::rpc::{ConfirmOptions, SendAndConfirmResponse};
use crate::types::{Collection, Creator, DataV2, TokenAmount, Uses};

/// Inputs for [`CreateSftOperation`].
///
/// Signers default to the client identity; the mint defaults to a fresh
/// keypair. Without a `token_owner` no token account is created and the
/// supply stays at zero.
pub struct CreateSftInput {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub seller_fee_basis_points: u16,
    pub decimals: u8,
    pub payer: Option<Arc<Keypair>>,
    pub update_authority: Option<Arc<Keypair>>,
    pub mint_authority: Option<Arc<Keypair>>,
    pub mint: Option<Arc<Keypair>>,
    pub freeze_authority: Option<Pubkey>,
    pub token_owner: Option<Pubkey>,
    pub token_amount: Option<TokenAmount>,
    pub creators: Option<Vec<Creator>>,
    pub is_mutable: bool,
    pub collection: Option<Collection>,
    pub uses: Option<Uses>,
    pub confirm_options: ConfirmOptions,
}

impl Default for CreateSftInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            symbol: String::new(),
            uri: String::new(),
            seller_fee_basis_points: 0,
            decimals: 0,
            payer: None,
            update_authority: None,
            mint_authority: None,
            mint: None,
            freeze_authority: None,
            token_owner: None,
            token_amount: None,
            creators: None,
            is_mutable: true,
            collection: None,
            uses: None,
            confirm_options: ConfirmOptions::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateSftOutput {
    pub response: SendAndConfirmResponse,
    pub mint_address: Pubkey,
    pub metadata_address: Pda,
    pub token_address: Option<Pubkey>,
}

pub struct CreateSftOperation {
    pub input: CreateSftInput,
}

impl Operation for CreateSftOperation {
    const KEY: &'static str = "CreateSftOperation";
    type Output = CreateSftOutput;
}

pub(crate) struct CreateSftHandler;

#[async_trait]
impl OperationHandler<CreateSftOperation> for CreateSftHandler {
    async fn handle(
        &self,
        operation: CreateSftOperation,
        client: &NftkitClient,
        scope: &OperationScope,
    ) -> ClientResult<CreateSftOutput> {
        scope.throw_if_canceled(CreateSftOperation::KEY)?;
        let input = operation.input;

        let identity = client.identity().clone();
        let payer = input.payer.unwrap_or_else(|| identity.clone());
        let update_authority = input.update_authority.unwrap_or_else(|| identity.clone());
        let mint_authority = input.mint_authority.unwrap_or_else(|| identity.clone());
        let mint = input.mint.unwrap_or_else(|| Arc::new(Keypair::new()));

        let mint_rent = client
            .connection()
            .minimum_balance_for_rent_exemption(spl_token::state::Mint::LEN)
            .await?;
        scope.throw_if_canceled(CreateSftOperation::KEY)?;

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

        let builder = create_sft_builder(CreateSftBuilderParams {
            payer: payer.clone(),
            update_authority,
            mint_authority,
            mint,
            freeze_authority: input.freeze_authority,
            decimals: input.decimals,
            mint_rent,
            token_owner: input.token_owner,
            token_amount: input.token_amount.map(|amount| amount.basis_points),
            data,
            is_mutable: input.is_mutable,
        })?;

        let context = builder
            .context()
            .cloned()
            .ok_or_else(|| ClientError::invalid_input("builder produced no context"))?;

        let response = builder
            .send_and_confirm(client.connection(), &input.confirm_options)
            .await?;

        Ok(CreateSftOutput {
            response,
            mint_address: context.mint_address,
            metadata_address: context.metadata_address,
            token_address: context.token_address,
        })
    }
}

/// Resolved, signer-complete parameters for [`create_sft_builder`].
pub struct CreateSftBuilderParams {
    pub payer: Arc<Keypair>,
    pub update_authority: Arc<Keypair>,
    pub mint_authority: Arc<Keypair>,
    pub mint: Arc<Keypair>,
    pub freeze_authority: Option<Pubkey>,
    pub decimals: u8,
    pub mint_rent: u64,
    pub token_owner: Option<Pubkey>,
    pub token_amount: Option<u64>,
    pub data: DataV2,
    pub is_mutable: bool,
}

/// Addresses derived while assembling the transaction.
#[derive(Debug, Clone)]
pub struct CreateSftBuilderContext {
    pub mint_address: Pubkey,
    pub metadata_address: Pda,
    pub token_address: Option<Pubkey>,
}

/// Assemble the create-SFT transaction without touching the network.
///
/// Instruction order matters: the mint must exist and be initialized before
/// the token account, the supply and the metadata refer to it.
pub fn create_sft_builder(
    params: CreateSftBuilderParams,
) -> ClientResult<TransactionBuilder<CreateSftBuilderContext>> {
    let mint_address = params.mint.pubkey();
    let metadata_address = find_metadata_pda(&mint_address);
    let token_address = params
        .token_owner
        .map(|owner| find_associated_token_account_pda(&mint_address, &owner).address);

    let mut builder = TransactionBuilder::new()
        .set_fee_payer(params.payer.clone())
        .set_context(CreateSftBuilderContext {
            mint_address,
            metadata_address,
            token_address,
        })
        .add(InstructionRecord::new(
            system_instruction::create_account(
                &params.payer.pubkey(),
                &mint_address,
                params.mint_rent,
                spl_token::state::Mint::LEN as u64,
                &spl_token::id(),
            ),
            vec![params.payer.clone(), params.mint.clone()],
            "createMintAccount",
        ))?
        .add(InstructionRecord::new(
            spl_token::instruction::initialize_mint2(
                &spl_token::id(),
                &mint_address,
                &params.mint_authority.pubkey(),
                params.freeze_authority.as_ref(),
                params.decimals,
            )
            .map_err(|e| ClientError::invalid_input(e.to_string()))?,
            vec![],
            "initializeMint",
        ))?;

    if let (Some(owner), Some(token_address)) = (params.token_owner, token_address) {
        builder = builder.add(InstructionRecord::new(
            spl_associated_token_account::instruction::create_associated_token_account(
                &params.payer.pubkey(),
                &owner,
                &mint_address,
                &spl_token::id(),
            ),
            vec![params.payer.clone()],
            "createAssociatedTokenAccount",
        ))?;

        if let Some(amount) = params.token_amount {
            builder = builder.add(InstructionRecord::new(
                spl_token::instruction::mint_to(
                    &spl_token::id(),
                    &mint_address,
                    &token_address,
                    &params.mint_authority.pubkey(),
                    &[],
                    amount,
                )
                .map_err(|e| ClientError::invalid_input(e.to_string()))?,
                vec![params.mint_authority.clone()],
                "mintTokens",
            ))?;
        }
    }

    builder = builder.add(InstructionRecord::new(
        CreateMetadataAccountV3Builder::new()
            .metadata(metadata_address.address)
            .mint(mint_address)
            .mint_authority(params.mint_authority.pubkey())
            .payer(params.payer.pubkey())
            .update_authority(params.update_authority.pubkey(), true)
            .data(params.data)
            .is_mutable(params.is_mutable)
            .instruction(),
        vec![
            params.payer,
            params.mint_authority,
            params.update_authority,
        ],
        "createMetadata",
    ))?;

    Ok(builder)
}

/// Fill in on-chain data defaults: absent creators become the update
/// authority as sole, verified creator.
#[allow(clippy::too_many_arguments)]
pub(crate) fn sft_data(
    name: String,
    symbol: String,
    uri: String,
    seller_fee_basis_points: u16,
    creators: Option<Vec<Creator>>,
    collection: Option<Collection>,
    uses: Option<Uses>,
    update_authority: &Pubkey,
) -> DataV2 {
    let creators = creators.unwrap_or_else(|| {
        vec![Creator {
            address: *update_authority,
            verified: true,
            share: 100,
        }]
    });
    DataV2 {
        name,
        symbol,
        uri,
        seller_fee_basis_points,
        creators: Some(creators),
        collection,
        uses,
    }
}
