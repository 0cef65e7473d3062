//! Update the on-chain metadata of an existing NFT or SFT.
//!
//! The operation takes a current snapshot plus the fields to change, merges
//! them into the full data payload the program expects, and submits one
//! update instruction signed by the update authority.

use std::sync::Arc;

use async_trait::async_trait;
use mpl_token_metadata::instructions::UpdateMetadataAccountV2Builder;
use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer};

use crate::builder::{InstructionRecord, TransactionBuilder};
use crate::client::NftkitClient;
use crate::errors::ClientResult;
use crate::models::Metadata;
use crate::operation::{Operation, OperationHandler, OperationScope};
use crate::rpc::{ConfirmOptions, SendAndConfirmResponse};
use crate::types::{Collection, Creator, DataV2, Uses};

/// Inputs for [`UpdateNftOperation`].
///
/// `None` fields keep the snapshot's current value. The update authority
/// must match the one recorded on chain or the program rejects the
/// transaction.
pub struct UpdateNftInput {
    pub metadata: Metadata,
    pub update_authority: Option<Arc<Keypair>>,
    pub payer: Option<Arc<Keypair>>,
    pub new_update_authority: Option<Pubkey>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub uri: Option<String>,
    pub seller_fee_basis_points: Option<u16>,
    pub creators: Option<Vec<Creator>>,
    pub collection: Option<Collection>,
    pub uses: Option<Uses>,
    pub primary_sale_happened: Option<bool>,
    pub is_mutable: Option<bool>,
    pub confirm_options: ConfirmOptions,
}

impl UpdateNftInput {
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            update_authority: None,
            payer: None,
            new_update_authority: None,
            name: None,
            symbol: None,
            uri: None,
            seller_fee_basis_points: None,
            creators: None,
            collection: None,
            uses: None,
            primary_sale_happened: None,
            is_mutable: None,
            confirm_options: ConfirmOptions::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateNftOutput {
    pub response: SendAndConfirmResponse,
}

pub struct UpdateNftOperation {
    pub input: UpdateNftInput,
}

impl Operation for UpdateNftOperation {
    const KEY: &'static str = "UpdateNftOperation";
    type Output = UpdateNftOutput;
}

pub(crate) struct UpdateNftHandler;

#[async_trait]
impl OperationHandler<UpdateNftOperation> for UpdateNftHandler {
    async fn handle(
        &self,
        operation: UpdateNftOperation,
        client: &NftkitClient,
        scope: &OperationScope,
    ) -> ClientResult<UpdateNftOutput> {
        scope.throw_if_canceled(UpdateNftOperation::KEY)?;
        let input = operation.input;

        let identity = client.identity().clone();
        let update_authority = input.update_authority.unwrap_or_else(|| identity.clone());
        let payer = input.payer.unwrap_or(identity);

        let snapshot = &input.metadata;
        let creators = input.creators.or_else(|| {
            if snapshot.creators.is_empty() {
                None
            } else {
                Some(snapshot.creators.clone())
            }
        });
        let data = DataV2 {
            name: input.name.unwrap_or_else(|| snapshot.name.clone()),
            symbol: input.symbol.unwrap_or_else(|| snapshot.symbol.clone()),
            uri: input.uri.unwrap_or_else(|| snapshot.uri.clone()),
            seller_fee_basis_points: input
                .seller_fee_basis_points
                .unwrap_or(snapshot.seller_fee_basis_points),
            creators,
            collection: input.collection.or_else(|| snapshot.collection.clone()),
            uses: input.uses.or_else(|| snapshot.uses.clone()),
        };

        let builder = update_nft_builder(UpdateNftBuilderParams {
            payer,
            update_authority,
            metadata_address: snapshot.address.address,
            data,
            new_update_authority: input.new_update_authority,
            primary_sale_happened: input.primary_sale_happened,
            is_mutable: input.is_mutable,
        })?;

        let response = builder
            .send_and_confirm(client.connection(), &input.confirm_options)
            .await?;
        Ok(UpdateNftOutput { response })
    }
}

pub struct UpdateNftBuilderParams {
    pub payer: Arc<Keypair>,
    pub update_authority: Arc<Keypair>,
    pub metadata_address: Pubkey,
    pub data: DataV2,
    pub new_update_authority: Option<Pubkey>,
    pub primary_sale_happened: Option<bool>,
    pub is_mutable: Option<bool>,
}

/// Assemble the update transaction without touching the network.
pub fn update_nft_builder(
    params: UpdateNftBuilderParams,
) -> ClientResult<TransactionBuilder<()>> {
    let mut instruction_builder = UpdateMetadataAccountV2Builder::new();
    instruction_builder
        .metadata(params.metadata_address)
        .update_authority(params.update_authority.pubkey())
        .data(params.data);
    if let Some(new_update_authority) = params.new_update_authority {
        instruction_builder.new_update_authority(new_update_authority);
    }
    if let Some(primary_sale_happened) = params.primary_sale_happened {
        instruction_builder.primary_sale_happened(primary_sale_happened);
    }
    if let Some(is_mutable) = params.is_mutable {
        instruction_builder.is_mutable(is_mutable);
    }

    TransactionBuilder::new()
        .set_fee_payer(params.payer)
        .add(InstructionRecord::new(
            instruction_builder.instruction(),
            vec![params.update_authority],
            "updateMetadata",
        ))
}
