//! Find a single NFT by its mint address.
//!
//! One batched account fetch covers the mint, the metadata account and the
//! edition companion, followed by a best-effort off-chain JSON resolution.

use async_trait::async_trait;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};

use crate::client::NftkitClient;
use crate::errors::{ClientError, ClientResult};
use crate::models::{parse_metadata_account, parse_mint_account, Metadata, Mint, Nft, NftEdition};
use crate::operation::{Operation, OperationHandler, OperationScope};
use crate::pdas::{find_edition_pda, find_metadata_pda};

/// Inputs for [`FindNftByMintOperation`].
pub struct FindNftByMintInput {
    pub mint_address: Pubkey,
    /// Resolve the off-chain JSON document. A failing or unreachable URI
    /// degrades to an absent document, never an error.
    pub load_json: bool,
    pub commitment: Option<CommitmentConfig>,
}

impl FindNftByMintInput {
    pub fn new(mint_address: Pubkey) -> Self {
        Self {
            mint_address,
            load_json: true,
            commitment: None,
        }
    }
}

pub struct FindNftByMintOperation {
    pub input: FindNftByMintInput,
}

impl Operation for FindNftByMintOperation {
    const KEY: &'static str = "FindNftByMintOperation";
    type Output = Nft;
}

pub(crate) struct FindNftByMintHandler;

#[async_trait]
impl OperationHandler<FindNftByMintOperation> for FindNftByMintHandler {
    async fn handle(
        &self,
        operation: FindNftByMintOperation,
        client: &NftkitClient,
        scope: &OperationScope,
    ) -> ClientResult<Nft> {
        scope.throw_if_canceled(FindNftByMintOperation::KEY)?;
        let input = operation.input;
        let commitment = input
            .commitment
            .unwrap_or_else(|| client.connection().default_commitment());

        let mint_address = input.mint_address;
        let metadata_address = find_metadata_pda(&mint_address);
        let edition_address = find_edition_pda(&mint_address);

        let accounts = client
            .connection()
            .get_multiple_accounts(
                &[mint_address, metadata_address.address, edition_address.address],
                commitment,
            )
            .await?;
        scope.throw_if_canceled(FindNftByMintOperation::KEY)?;

        let [mint_account, metadata_account, edition_account] = accounts.as_slice() else {
            return Err(ClientError::Internal(anyhow::anyhow!(
                "batch account response of unexpected length"
            )));
        };

        let mint_account = mint_account
            .as_ref()
            .ok_or_else(|| ClientError::account_not_found(mint_address))?;
        let mint = Mint::from_account(mint_address, parse_mint_account(&mint_address, mint_account)?);

        let metadata_account = metadata_account
            .as_ref()
            .ok_or_else(|| ClientError::account_not_found(metadata_address))?;
        let mut metadata = Metadata::from_account(parse_metadata_account(
            &metadata_address.address,
            metadata_account,
        )?);

        // The edition account only exists for non-fungibles.
        let edition = edition_account
            .as_ref()
            .map(|account| NftEdition::from_account(&mint_address, account))
            .transpose()?;

        if input.load_json {
            let json = match client.downloader().download(&metadata.uri).await {
                Ok(json) => Some(json),
                Err(err) => {
                    tracing::warn!(
                        mint = %mint_address,
                        uri = %metadata.uri,
                        error = %err,
                        "Off-chain metadata unavailable"
                    );
                    None
                }
            };
            metadata = metadata.with_json(json);
        }

        Ok(Nft::new(metadata, mint, edition))
    }
}
