//! Print a new edition from a master edition.
//!
//! The next edition number is read from the master edition's current supply
//! before the transaction is assembled, so two concurrent prints of the same
//! master can race: the loser is rejected by the program and the caller
//! retries, which re-reads the supply. The print itself is one atomic
//! transaction; it never mutates the master on partial failure.

use std::sync::Arc;

use async_trait::async_trait;
use mpl_token_metadata::instructions::MintNewEditionFromMasterEditionViaTokenBuilder;
use mpl_token_metadata::types::MintNewEditionFromMasterEditionViaTokenArgs;
use solana_program::program_pack::Pack;
use solana_sdk::{
    pubkey::Pubkey, signature::Keypair, signer::Signer, system_instruction,
};

use crate::builder::{InstructionRecord, TransactionBuilder};
use crate::client::NftkitClient;
use crate::errors::{ClientError, ClientResult};
use crate::models::NftEdition;
use crate::operation::{Operation, OperationHandler, OperationScope};
use crate::pdas::{
    find_associated_token_account_pda, find_edition_marker_pda, find_master_edition_pda,
    find_metadata_pda, Pda,
};
use crate::rpc::{ConfirmOptions, SendAndConfirmResponse};

/// Inputs for [`PrintNewEditionOperation`].
///
/// The original token owner must sign: holding the master edition token is
/// the program's proof of print authority.
pub struct PrintNewEditionInput {
    pub original_mint: Pubkey,
    pub new_mint: Option<Arc<Keypair>>,
    pub new_owner: Option<Pubkey>,
    pub new_update_authority: Option<Pubkey>,
    pub original_token_owner: Option<Arc<Keypair>>,
    pub original_token_account: Option<Pubkey>,
    pub payer: Option<Arc<Keypair>>,
    pub confirm_options: ConfirmOptions,
}

impl PrintNewEditionInput {
    pub fn new(original_mint: Pubkey) -> Self {
        Self {
            original_mint,
            new_mint: None,
            new_owner: None,
            new_update_authority: None,
            original_token_owner: None,
            original_token_account: None,
            payer: None,
            confirm_options: ConfirmOptions::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PrintNewEditionOutput {
    pub response: SendAndConfirmResponse,
    pub new_mint_address: Pubkey,
    pub new_metadata_address: Pda,
    pub new_edition_address: Pda,
    pub edition_number: u64,
}

pub struct PrintNewEditionOperation {
    pub input: PrintNewEditionInput,
}

impl Operation for PrintNewEditionOperation {
    const KEY: &'static str = "PrintNewEditionOperation";
    type Output = PrintNewEditionOutput;
}

pub(crate) struct PrintNewEditionHandler;

#[async_trait]
impl OperationHandler<PrintNewEditionOperation> for PrintNewEditionHandler {
    async fn handle(
        &self,
        operation: PrintNewEditionOperation,
        client: &NftkitClient,
        scope: &OperationScope,
    ) -> ClientResult<PrintNewEditionOutput> {
        scope.throw_if_canceled(PrintNewEditionOperation::KEY)?;
        let input = operation.input;

        let identity = client.identity().clone();
        let payer = input.payer.unwrap_or_else(|| identity.clone());
        let new_mint = input.new_mint.unwrap_or_else(|| Arc::new(Keypair::new()));
        let new_owner = input.new_owner.unwrap_or_else(|| identity.pubkey());
        let new_update_authority = input
            .new_update_authority
            .unwrap_or_else(|| identity.pubkey());
        let original_token_owner = input
            .original_token_owner
            .unwrap_or_else(|| identity.clone());
        let original_token_account = input.original_token_account.unwrap_or_else(|| {
            find_associated_token_account_pda(&input.original_mint, &original_token_owner.pubkey())
                .address
        });

        let master_edition_address = find_master_edition_pda(&input.original_mint);
        let commitment = client.connection().default_commitment();
        let master_account = client
            .connection()
            .get_account(&master_edition_address.address, commitment)
            .await?
            .ok_or_else(|| ClientError::account_not_found(master_edition_address))?;
        let edition_number = match NftEdition::from_account(&input.original_mint, &master_account)? {
            NftEdition::Original {
                supply, max_supply, ..
            } => {
                let next = supply + 1;
                if let Some(max) = max_supply {
                    if next > max {
                        return Err(ClientError::invalid_input(format!(
                            "master edition supply exhausted: {supply} of {max} prints minted"
                        )));
                    }
                }
                next
            }
            NftEdition::Print { .. } => {
                return Err(ClientError::invalid_input(
                    "cannot print from a print edition, only from a master edition",
                ))
            }
        };
        scope.throw_if_canceled(PrintNewEditionOperation::KEY)?;

        let mint_rent = client
            .connection()
            .minimum_balance_for_rent_exemption(spl_token::state::Mint::LEN)
            .await?;
        scope.throw_if_canceled(PrintNewEditionOperation::KEY)?;

        let builder = print_new_edition_builder(PrintNewEditionBuilderParams {
            payer,
            original_mint: input.original_mint,
            new_mint,
            new_owner,
            new_update_authority,
            original_token_owner,
            original_token_account,
            edition_number,
            mint_rent,
        })?;

        let context = builder
            .context()
            .cloned()
            .ok_or_else(|| ClientError::invalid_input("builder produced no context"))?;

        let response = builder
            .send_and_confirm(client.connection(), &input.confirm_options)
            .await?;

        Ok(PrintNewEditionOutput {
            response,
            new_mint_address: context.new_mint_address,
            new_metadata_address: context.new_metadata_address,
            new_edition_address: context.new_edition_address,
            edition_number,
        })
    }
}

pub struct PrintNewEditionBuilderParams {
    pub payer: Arc<Keypair>,
    pub original_mint: Pubkey,
    pub new_mint: Arc<Keypair>,
    pub new_owner: Pubkey,
    pub new_update_authority: Pubkey,
    pub original_token_owner: Arc<Keypair>,
    pub original_token_account: Pubkey,
    pub edition_number: u64,
    pub mint_rent: u64,
}

#[derive(Debug, Clone)]
pub struct PrintNewEditionBuilderContext {
    pub new_mint_address: Pubkey,
    pub new_metadata_address: Pda,
    pub new_edition_address: Pda,
    pub new_token_address: Pubkey,
}

/// Assemble the print transaction without touching the network.
pub fn print_new_edition_builder(
    params: PrintNewEditionBuilderParams,
) -> ClientResult<TransactionBuilder<PrintNewEditionBuilderContext>> {
    let new_mint_address = params.new_mint.pubkey();
    let new_metadata_address = find_metadata_pda(&new_mint_address);
    let new_edition_address = find_master_edition_pda(&new_mint_address);
    let edition_marker_address =
        find_edition_marker_pda(&params.original_mint, params.edition_number);
    let new_token_address =
        find_associated_token_account_pda(&new_mint_address, &params.new_owner).address;

    let mut print_builder = MintNewEditionFromMasterEditionViaTokenBuilder::new();
    print_builder
        .new_metadata(new_metadata_address.address)
        .new_edition(new_edition_address.address)
        .master_edition(find_master_edition_pda(&params.original_mint).address)
        .new_mint(new_mint_address)
        .edition_mark_pda(edition_marker_address.address)
        .new_mint_authority(params.payer.pubkey())
        .payer(params.payer.pubkey())
        .token_account_owner(params.original_token_owner.pubkey())
        .token_account(params.original_token_account)
        .new_metadata_update_authority(params.new_update_authority)
        .metadata(find_metadata_pda(&params.original_mint).address)
        .mint_new_edition_from_master_edition_via_token_args(
            MintNewEditionFromMasterEditionViaTokenArgs {
                edition: params.edition_number,
            },
        );

    TransactionBuilder::new()
        .set_fee_payer(params.payer.clone())
        .set_context(PrintNewEditionBuilderContext {
            new_mint_address,
            new_metadata_address,
            new_edition_address,
            new_token_address,
        })
        .add(InstructionRecord::new(
            system_instruction::create_account(
                &params.payer.pubkey(),
                &new_mint_address,
                params.mint_rent,
                spl_token::state::Mint::LEN as u64,
                &spl_token::id(),
            ),
            vec![params.payer.clone(), params.new_mint.clone()],
            "createMintAccount",
        ))?
        .add(InstructionRecord::new(
            spl_token::instruction::initialize_mint2(
                &spl_token::id(),
                &new_mint_address,
                &params.payer.pubkey(),
                None,
                0,
            )
            .map_err(|e| ClientError::invalid_input(e.to_string()))?,
            vec![],
            "initializeMint",
        ))?
        .add(InstructionRecord::new(
            spl_associated_token_account::instruction::create_associated_token_account(
                &params.payer.pubkey(),
                &params.new_owner,
                &new_mint_address,
                &spl_token::id(),
            ),
            vec![params.payer.clone()],
            "createAssociatedTokenAccount",
        ))?
        .add(InstructionRecord::new(
            spl_token::instruction::mint_to(
                &spl_token::id(),
                &new_mint_address,
                &new_token_address,
                &params.payer.pubkey(),
                &[],
                1,
            )
            .map_err(|e| ClientError::invalid_input(e.to_string()))?,
            vec![params.payer.clone()],
            "mintTokens",
        ))?
        .add(InstructionRecord::new(
            print_builder.instruction(),
            vec![params.payer, params.original_token_owner],
            "printNewEdition",
        ))
}
