//! Explicitly resolve the off-chain JSON document of a metadata snapshot.
//!
//! Unlike the find operations, a download failure here is a hard error: the
//! caller asked for the document specifically.

use async_trait::async_trait;

use crate::client::NftkitClient;
use crate::errors::ClientResult;
use crate::models::Metadata;
use crate::operation::{Operation, OperationHandler, OperationScope};

pub struct LoadMetadataInput {
    pub metadata: Metadata,
}

pub struct LoadMetadataOperation {
    pub input: LoadMetadataInput,
}

impl Operation for LoadMetadataOperation {
    const KEY: &'static str = "LoadMetadataOperation";
    type Output = Metadata;
}

pub(crate) struct LoadMetadataHandler;

#[async_trait]
impl OperationHandler<LoadMetadataOperation> for LoadMetadataHandler {
    async fn handle(
        &self,
        operation: LoadMetadataOperation,
        client: &NftkitClient,
        scope: &OperationScope,
    ) -> ClientResult<Metadata> {
        scope.throw_if_canceled(LoadMetadataOperation::KEY)?;
        let metadata = operation.input.metadata;

        // Idempotent: a snapshot that already carries its document (or a
        // recorded absence) is returned as-is.
        if metadata.json_loaded {
            return Ok(metadata);
        }

        let json = client.downloader().download(&metadata.uri).await?;
        Ok(metadata.with_json(Some(json)))
    }
}
