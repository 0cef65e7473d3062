//! Batch lookup of metadata accounts for a list of mints.

use async_trait::async_trait;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};

use crate::client::NftkitClient;
use crate::errors::ClientResult;
use crate::models::{parse_metadata_account, Metadata};
use crate::operation::{Operation, OperationHandler, OperationScope};
use crate::pdas::find_metadata_pda;

// getMultipleAccounts caps each request at 100 addresses.
const ACCOUNT_BATCH_SIZE: usize = 100;

/// Inputs for [`FindNftsByMintListOperation`].
pub struct FindNftsByMintListInput {
    pub mint_addresses: Vec<Pubkey>,
    pub commitment: Option<CommitmentConfig>,
}

pub struct FindNftsByMintListOperation {
    pub input: FindNftsByMintListInput,
}

impl Operation for FindNftsByMintListOperation {
    const KEY: &'static str = "FindNftsByMintListOperation";
    type Output = Vec<Option<Metadata>>;
}

pub(crate) struct FindNftsByMintListHandler;

#[async_trait]
impl OperationHandler<FindNftsByMintListOperation> for FindNftsByMintListHandler {
    /// Output slots align with the input mints; a mint without a metadata
    /// account yields `None`. Off-chain JSON is never resolved here, so
    /// every returned snapshot has `json_loaded == false`.
    async fn handle(
        &self,
        operation: FindNftsByMintListOperation,
        client: &NftkitClient,
        scope: &OperationScope,
    ) -> ClientResult<Vec<Option<Metadata>>> {
        scope.throw_if_canceled(FindNftsByMintListOperation::KEY)?;
        let input = operation.input;
        let commitment = input
            .commitment
            .unwrap_or_else(|| client.connection().default_commitment());

        let addresses: Vec<Pubkey> = input
            .mint_addresses
            .iter()
            .map(|mint| find_metadata_pda(mint).address)
            .collect();

        let mut metadatas = Vec::with_capacity(addresses.len());
        for chunk in addresses.chunks(ACCOUNT_BATCH_SIZE) {
            scope.throw_if_canceled(FindNftsByMintListOperation::KEY)?;
            let accounts = client
                .connection()
                .get_multiple_accounts(chunk, commitment)
                .await?;
            for (address, account) in chunk.iter().zip(accounts) {
                let metadata = match account {
                    Some(account) => Some(Metadata::from_account(parse_metadata_account(
                        address, &account,
                    )?)),
                    None => None,
                };
                metadatas.push(metadata);
            }
        }

        Ok(metadatas)
    }
}
