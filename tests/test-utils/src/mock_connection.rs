//! In-memory ledger standing in for an RPC node.
//!
//! Executes the instruction subset the client emits (system account
//! creation, token mint/transfer, associated token accounts, and the
//! token-metadata create/update/print instructions) against a hash map of
//! accounts. Program rejections produce the same "custom program error"
//! log shape real nodes return, so error-resolution paths can be tested.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use borsh::{BorshDeserialize, BorshSerialize};
use mpl_token_metadata::accounts::{
    Edition, MasterEdition as MasterEditionV2, Metadata as MetadataAccount,
};
use mpl_token_metadata::instructions::{
    CreateMasterEditionV3InstructionArgs, CreateMetadataAccountV3InstructionArgs,
    UpdateMetadataAccountV2InstructionArgs,
};
use mpl_token_metadata::types::{Key, MintNewEditionFromMasterEditionViaTokenArgs};
use solana_program::program_option::COption;
use solana_program::program_pack::Pack;
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::{hashv, Hash},
    pubkey::Pubkey,
    rent::Rent,
    signature::Signature,
    system_instruction::SystemInstruction,
    system_program,
    transaction::Transaction,
};
use spl_token::instruction::TokenInstruction;

use nftkit_client::errors::{ClientError, ClientResult};
use nftkit_client::rpc::RpcConnection;

const TOKEN_METADATA_PROGRAM_ID: Pubkey = mpl_token_metadata::ID;

// Fixed-width string sizes the on-chain program pads to.
const MAX_NAME_LENGTH: usize = 32;
const MAX_SYMBOL_LENGTH: usize = 10;
const MAX_URI_LENGTH: usize = 200;

/// A program rejection inside the mock, carrying a numeric code in the same
/// style as on-chain custom errors.
struct ProgramFailure {
    program: Pubkey,
    code: u32,
    reason: String,
}

impl ProgramFailure {
    fn new(program: Pubkey, code: u32, reason: impl Into<String>) -> Self {
        Self {
            program,
            code,
            reason: reason.into(),
        }
    }
}

/// In-memory RPC connection.
pub struct MockConnection {
    accounts: Mutex<HashMap<Pubkey, Account>>,
    transactions: Mutex<HashMap<Signature, Vec<String>>>,
    slot: Mutex<u64>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            transactions: Mutex::new(HashMap::new()),
            slot: Mutex::new(1),
        }
    }

    /// Credit lamports to a system-owned account, creating it if needed.
    pub fn airdrop(&self, address: Pubkey, lamports: u64) {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts.entry(address).or_insert_with(|| Account {
            lamports: 0,
            data: vec![],
            owner: system_program::id(),
            executable: false,
            rent_epoch: 0,
        });
        account.lamports += lamports;
    }

    /// Install a raw account, replacing any existing one.
    pub fn set_account(&self, address: Pubkey, account: Account) {
        self.accounts.lock().unwrap().insert(address, account);
    }

    /// Snapshot an account for assertions.
    pub fn account(&self, address: &Pubkey) -> Option<Account> {
        self.accounts.lock().unwrap().get(address).cloned()
    }

    fn execute(&self, transaction: &Transaction) -> Result<Vec<String>, ProgramFailure> {
        // Take a copy so a failing transaction leaves no partial writes.
        let mut accounts = self.accounts.lock().unwrap();
        let mut working = accounts.clone();
        let mut logs = Vec::new();

        let message = &transaction.message;
        for compiled in &message.instructions {
            let program_id = message.account_keys[compiled.program_id_index as usize];
            let keys: Vec<Pubkey> = compiled
                .accounts
                .iter()
                .map(|index| message.account_keys[*index as usize])
                .collect();
            logs.push(format!("Program {program_id} invoke [1]"));
            self.execute_instruction(&mut working, &program_id, &keys, &compiled.data)?;
            logs.push(format!("Program {program_id} success"));
        }

        *accounts = working;
        Ok(logs)
    }

    fn execute_instruction(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        program_id: &Pubkey,
        keys: &[Pubkey],
        data: &[u8],
    ) -> Result<(), ProgramFailure> {
        if *program_id == system_program::id() {
            self.execute_system(accounts, keys, data)
        } else if *program_id == spl_token::id() {
            self.execute_token(accounts, keys, data)
        } else if *program_id == spl_associated_token_account::id() {
            self.execute_associated_token(accounts, keys)
        } else if *program_id == TOKEN_METADATA_PROGRAM_ID {
            self.execute_token_metadata(accounts, keys, data)
        } else {
            Err(ProgramFailure::new(*program_id, 0xff, "unknown program"))
        }
    }

    fn execute_system(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        keys: &[Pubkey],
        data: &[u8],
    ) -> Result<(), ProgramFailure> {
        let program = system_program::id();
        let instruction: SystemInstruction = bincode::deserialize(data)
            .map_err(|e| ProgramFailure::new(program, 0x0, e.to_string()))?;
        match instruction {
            SystemInstruction::CreateAccount {
                lamports,
                space,
                owner,
            } => {
                let payer = keys[0];
                let new_address = keys[1];
                if accounts.contains_key(&new_address) {
                    return Err(ProgramFailure::new(program, 0x0, "account already in use"));
                }
                let payer_account = accounts
                    .get_mut(&payer)
                    .filter(|account| account.lamports >= lamports)
                    .ok_or_else(|| ProgramFailure::new(program, 0x1, "insufficient funds"))?;
                payer_account.lamports -= lamports;
                accounts.insert(
                    new_address,
                    Account {
                        lamports,
                        data: vec![0; space as usize],
                        owner,
                        executable: false,
                        rent_epoch: 0,
                    },
                );
                Ok(())
            }
            SystemInstruction::Transfer { lamports } => {
                let from = keys[0];
                let to = keys[1];
                let from_account = accounts
                    .get_mut(&from)
                    .filter(|account| account.lamports >= lamports)
                    .ok_or_else(|| ProgramFailure::new(program, 0x1, "insufficient funds"))?;
                from_account.lamports -= lamports;
                self.airdrop_into(accounts, to, lamports);
                Ok(())
            }
            _ => Err(ProgramFailure::new(
                program,
                0x0,
                "unsupported system instruction",
            )),
        }
    }

    fn airdrop_into(&self, accounts: &mut HashMap<Pubkey, Account>, address: Pubkey, lamports: u64) {
        let account = accounts.entry(address).or_insert_with(|| Account {
            lamports: 0,
            data: vec![],
            owner: system_program::id(),
            executable: false,
            rent_epoch: 0,
        });
        account.lamports += lamports;
    }

    fn execute_token(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        keys: &[Pubkey],
        data: &[u8],
    ) -> Result<(), ProgramFailure> {
        let program = spl_token::id();
        let instruction = TokenInstruction::unpack(data)
            .map_err(|e| ProgramFailure::new(program, 0xc, e.to_string()))?;
        match instruction {
            TokenInstruction::InitializeMint2 {
                decimals,
                mint_authority,
                freeze_authority,
            } => {
                let mint_address = keys[0];
                let mint_account = accounts
                    .get_mut(&mint_address)
                    .ok_or_else(|| ProgramFailure::new(program, 0x2, "mint account missing"))?;
                let state = spl_token::state::Mint {
                    mint_authority: COption::Some(mint_authority),
                    supply: 0,
                    decimals,
                    is_initialized: true,
                    freeze_authority,
                };
                state.pack_into_slice(&mut mint_account.data);
                Ok(())
            }
            TokenInstruction::MintTo { amount } => {
                let mint_address = keys[0];
                let destination = keys[1];
                let authority = keys[2];

                let mint_account = accounts
                    .get(&mint_address)
                    .ok_or_else(|| ProgramFailure::new(program, 0x2, "mint account missing"))?;
                let mut mint = spl_token::state::Mint::unpack(&mint_account.data)
                    .map_err(|e| ProgramFailure::new(program, 0x2, e.to_string()))?;
                if mint.mint_authority != COption::Some(authority) {
                    return Err(ProgramFailure::new(program, 0x4, "owner mismatch"));
                }
                mint.supply += amount;

                let destination_account = accounts
                    .get(&destination)
                    .ok_or_else(|| ProgramFailure::new(program, 0x2, "token account missing"))?;
                let mut token = spl_token::state::Account::unpack(&destination_account.data)
                    .map_err(|e| ProgramFailure::new(program, 0x2, e.to_string()))?;
                if token.mint != mint_address {
                    return Err(ProgramFailure::new(program, 0x3, "mint mismatch"));
                }
                token.amount += amount;

                let mint_account = accounts.get_mut(&mint_address).unwrap();
                spl_token::state::Mint::pack(mint, &mut mint_account.data)
                    .map_err(|e| ProgramFailure::new(program, 0x2, e.to_string()))?;
                let destination_account = accounts.get_mut(&destination).unwrap();
                spl_token::state::Account::pack(token, &mut destination_account.data)
                    .map_err(|e| ProgramFailure::new(program, 0x2, e.to_string()))?;
                Ok(())
            }
            TokenInstruction::TransferChecked { amount, decimals } => {
                let source = keys[0];
                let mint_address = keys[1];
                let destination = keys[2];
                let authority = keys[3];

                let mint_account = accounts
                    .get(&mint_address)
                    .ok_or_else(|| ProgramFailure::new(program, 0x2, "mint account missing"))?;
                let mint = spl_token::state::Mint::unpack(&mint_account.data)
                    .map_err(|e| ProgramFailure::new(program, 0x2, e.to_string()))?;
                if mint.decimals != decimals {
                    return Err(ProgramFailure::new(program, 0x12, "decimals mismatch"));
                }

                let source_account = accounts
                    .get(&source)
                    .ok_or_else(|| ProgramFailure::new(program, 0x2, "token account missing"))?;
                let mut from = spl_token::state::Account::unpack(&source_account.data)
                    .map_err(|e| ProgramFailure::new(program, 0x2, e.to_string()))?;
                if from.owner != authority {
                    return Err(ProgramFailure::new(program, 0x4, "owner mismatch"));
                }
                if from.amount < amount {
                    return Err(ProgramFailure::new(program, 0x1, "insufficient funds"));
                }
                from.amount -= amount;

                let destination_account = accounts
                    .get(&destination)
                    .ok_or_else(|| ProgramFailure::new(program, 0x2, "token account missing"))?;
                let mut to = spl_token::state::Account::unpack(&destination_account.data)
                    .map_err(|e| ProgramFailure::new(program, 0x2, e.to_string()))?;
                if to.mint != mint_address {
                    return Err(ProgramFailure::new(program, 0x3, "mint mismatch"));
                }
                to.amount += amount;

                let source_account = accounts.get_mut(&source).unwrap();
                spl_token::state::Account::pack(from, &mut source_account.data)
                    .map_err(|e| ProgramFailure::new(program, 0x2, e.to_string()))?;
                let destination_account = accounts.get_mut(&destination).unwrap();
                spl_token::state::Account::pack(to, &mut destination_account.data)
                    .map_err(|e| ProgramFailure::new(program, 0x2, e.to_string()))?;
                Ok(())
            }
            _ => Err(ProgramFailure::new(
                program,
                0xc,
                "unsupported token instruction",
            )),
        }
    }

    fn execute_associated_token(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        keys: &[Pubkey],
    ) -> Result<(), ProgramFailure> {
        let program = spl_associated_token_account::id();
        // payer, ata, owner, mint, system program, token program
        let ata = keys[1];
        let owner = keys[2];
        let mint = keys[3];
        if accounts.contains_key(&ata) {
            return Err(ProgramFailure::new(program, 0x0, "account already in use"));
        }
        let state = spl_token::state::Account {
            mint,
            owner,
            amount: 0,
            delegate: COption::None,
            state: spl_token::state::AccountState::Initialized,
            is_native: COption::None,
            delegated_amount: 0,
            close_authority: COption::None,
        };
        let mut data = vec![0; spl_token::state::Account::LEN];
        state.pack_into_slice(&mut data);
        accounts.insert(
            ata,
            Account {
                lamports: Rent::default().minimum_balance(data.len()),
                data,
                owner: spl_token::id(),
                executable: false,
                rent_epoch: 0,
            },
        );
        Ok(())
    }

    fn execute_token_metadata(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        keys: &[Pubkey],
        data: &[u8],
    ) -> Result<(), ProgramFailure> {
        let program = TOKEN_METADATA_PROGRAM_ID;
        let (discriminator, args) = data
            .split_first()
            .ok_or_else(|| ProgramFailure::new(program, 0x0, "empty instruction data"))?;
        match *discriminator {
            // CreateMetadataAccountV3
            33 => {
                let args = CreateMetadataAccountV3InstructionArgs::try_from_slice(args)
                    .map_err(|e| ProgramFailure::new(program, 0x0, e.to_string()))?;
                let metadata_address = keys[0];
                let mint = keys[1];
                let update_authority = keys[4];
                if accounts.contains_key(&metadata_address) {
                    return Err(ProgramFailure::new(program, 0x0, "account already in use"));
                }
                let metadata = MetadataAccount {
                    key: Key::MetadataV1,
                    update_authority,
                    mint,
                    name: pad(&args.data.name, MAX_NAME_LENGTH),
                    symbol: pad(&args.data.symbol, MAX_SYMBOL_LENGTH),
                    uri: pad(&args.data.uri, MAX_URI_LENGTH),
                    seller_fee_basis_points: args.data.seller_fee_basis_points,
                    creators: args.data.creators,
                    primary_sale_happened: false,
                    is_mutable: args.is_mutable,
                    edition_nonce: None,
                    token_standard: None,
                    collection: args.data.collection,
                    uses: args.data.uses,
                    collection_details: args.collection_details,
                    programmable_config: None,
                };
                self.write_metadata_owned(accounts, metadata_address, &metadata)
            }
            // CreateMasterEditionV3
            17 => {
                let args = CreateMasterEditionV3InstructionArgs::try_from_slice(args)
                    .map_err(|e| ProgramFailure::new(program, 0x0, e.to_string()))?;
                let edition_address = keys[0];
                let mint_address = keys[1];
                let mint_account = accounts
                    .get(&mint_address)
                    .ok_or_else(|| ProgramFailure::new(program, 0x7, "mint account missing"))?;
                let mint = spl_token::state::Mint::unpack(&mint_account.data)
                    .map_err(|e| ProgramFailure::new(program, 0x7, e.to_string()))?;
                if mint.decimals != 0 || mint.supply != 1 {
                    return Err(ProgramFailure::new(
                        program,
                        0x20,
                        "edition requires a mint with decimals 0 and supply 1",
                    ));
                }
                let master = MasterEditionV2 {
                    key: Key::MasterEditionV2,
                    supply: 0,
                    max_supply: args.max_supply,
                };
                let data = master
                    .try_to_vec()
                    .map_err(|e| ProgramFailure::new(program, 0x0, e.to_string()))?;
                accounts.insert(
                    edition_address,
                    Account {
                        lamports: Rent::default().minimum_balance(data.len()),
                        data,
                        owner: program,
                        executable: false,
                        rent_epoch: 0,
                    },
                );
                Ok(())
            }
            // UpdateMetadataAccountV2
            15 => {
                let args = UpdateMetadataAccountV2InstructionArgs::try_from_slice(args)
                    .map_err(|e| ProgramFailure::new(program, 0x0, e.to_string()))?;
                let metadata_address = keys[0];
                let update_authority = keys[1];
                let metadata_account = accounts
                    .get(&metadata_address)
                    .ok_or_else(|| ProgramFailure::new(program, 0x0, "metadata account missing"))?;
                let mut metadata = MetadataAccount::safe_deserialize(&metadata_account.data)
                    .map_err(|e| ProgramFailure::new(program, 0x0, e.to_string()))?;
                if metadata.update_authority != update_authority {
                    return Err(ProgramFailure::new(program, 0x7, "update authority mismatch"));
                }
                if !metadata.is_mutable {
                    return Err(ProgramFailure::new(program, 0x33, "metadata is immutable"));
                }
                if let Some(data) = args.data {
                    metadata.name = pad(&data.name, MAX_NAME_LENGTH);
                    metadata.symbol = pad(&data.symbol, MAX_SYMBOL_LENGTH);
                    metadata.uri = pad(&data.uri, MAX_URI_LENGTH);
                    metadata.seller_fee_basis_points = data.seller_fee_basis_points;
                    metadata.creators = data.creators;
                    metadata.collection = data.collection;
                    metadata.uses = data.uses;
                }
                if let Some(new_update_authority) = args.new_update_authority {
                    metadata.update_authority = new_update_authority;
                }
                if let Some(primary_sale_happened) = args.primary_sale_happened {
                    metadata.primary_sale_happened = primary_sale_happened;
                }
                if let Some(is_mutable) = args.is_mutable {
                    metadata.is_mutable = is_mutable;
                }
                self.write_metadata_owned(accounts, metadata_address, &metadata)
            }
            // MintNewEditionFromMasterEditionViaToken
            11 => {
                let args = MintNewEditionFromMasterEditionViaTokenArgs::try_from_slice(args)
                    .map_err(|e| ProgramFailure::new(program, 0x0, e.to_string()))?;
                let new_metadata_address = keys[0];
                let new_edition_address = keys[1];
                let master_edition_address = keys[2];
                let new_mint = keys[3];
                let token_account_owner = keys[7];
                let token_account_address = keys[8];
                let new_metadata_update_authority = keys[9];
                let metadata_address = keys[10];

                let token_account = accounts
                    .get(&token_account_address)
                    .ok_or_else(|| ProgramFailure::new(program, 0x2, "token account missing"))?;
                let token = spl_token::state::Account::unpack(&token_account.data)
                    .map_err(|e| ProgramFailure::new(program, 0x2, e.to_string()))?;
                if token.owner != token_account_owner || token.amount < 1 {
                    return Err(ProgramFailure::new(
                        program,
                        0x34,
                        "token account does not hold the master edition token",
                    ));
                }

                let master_account = accounts
                    .get(&master_edition_address)
                    .ok_or_else(|| ProgramFailure::new(program, 0x0, "master edition missing"))?;
                let mut master = MasterEditionV2::from_bytes(&master_account.data)
                    .map_err(|e| ProgramFailure::new(program, 0x0, e.to_string()))?;
                let edition_number = args.edition;
                if let Some(max_supply) = master.max_supply {
                    if edition_number > max_supply {
                        return Err(ProgramFailure::new(
                            program,
                            0x3a,
                            "maximum editions printed",
                        ));
                    }
                }
                master.supply = master.supply.max(edition_number);

                let original_account = accounts
                    .get(&metadata_address)
                    .ok_or_else(|| ProgramFailure::new(program, 0x0, "metadata account missing"))?;
                let original = MetadataAccount::safe_deserialize(&original_account.data)
                    .map_err(|e| ProgramFailure::new(program, 0x0, e.to_string()))?;

                let new_metadata = MetadataAccount {
                    mint: new_mint,
                    update_authority: new_metadata_update_authority,
                    primary_sale_happened: false,
                    ..original
                };
                self.write_metadata_owned(accounts, new_metadata_address, &new_metadata)?;

                let print = Edition {
                    key: Key::EditionV1,
                    parent: master_edition_address,
                    edition: edition_number,
                };
                let print_data = print
                    .try_to_vec()
                    .map_err(|e| ProgramFailure::new(program, 0x0, e.to_string()))?;
                accounts.insert(
                    new_edition_address,
                    Account {
                        lamports: Rent::default().minimum_balance(print_data.len()),
                        data: print_data,
                        owner: program,
                        executable: false,
                        rent_epoch: 0,
                    },
                );

                let master_data = master
                    .try_to_vec()
                    .map_err(|e| ProgramFailure::new(program, 0x0, e.to_string()))?;
                let master_account = accounts.get_mut(&master_edition_address).unwrap();
                master_account.data = master_data;
                Ok(())
            }
            other => Err(ProgramFailure::new(
                program,
                0x0,
                format!("unsupported token metadata instruction: {other}"),
            )),
        }
    }

    fn write_metadata_owned(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        address: Pubkey,
        metadata: &MetadataAccount,
    ) -> Result<(), ProgramFailure> {
        let data = metadata
            .try_to_vec()
            .map_err(|e| ProgramFailure::new(TOKEN_METADATA_PROGRAM_ID, 0x0, e.to_string()))?;
        accounts.insert(
            address,
            Account {
                lamports: Rent::default().minimum_balance(data.len()),
                data,
                owner: TOKEN_METADATA_PROGRAM_ID,
                executable: false,
                rent_epoch: 0,
            },
        );
        Ok(())
    }
}

impl Default for MockConnection {
    fn default() -> Self {
        Self::new()
    }
}

/// Pad a string with NULs to the fixed width the on-chain program uses.
fn pad(value: &str, width: usize) -> String {
    let mut padded = value.to_string();
    while padded.len() < width {
        padded.push('\0');
    }
    padded
}

#[async_trait]
impl RpcConnection for MockConnection {
    async fn get_account(
        &self,
        address: &Pubkey,
        _commitment: CommitmentConfig,
    ) -> ClientResult<Option<Account>> {
        Ok(self.account(address))
    }

    async fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
        _commitment: CommitmentConfig,
    ) -> ClientResult<Vec<Option<Account>>> {
        Ok(addresses.iter().map(|address| self.account(address)).collect())
    }

    async fn get_latest_blockhash(&self) -> ClientResult<Hash> {
        let mut slot = self.slot.lock().unwrap();
        *slot += 1;
        let seed = slot.to_le_bytes();
        Ok(hashv(&[seed.as_ref()]))
    }

    async fn minimum_balance_for_rent_exemption(&self, size: usize) -> ClientResult<u64> {
        Ok(Rent::default().minimum_balance(size))
    }

    async fn send_transaction(&self, transaction: &Transaction) -> ClientResult<Signature> {
        transaction
            .verify()
            .map_err(|e| ClientError::submission_failed(e.to_string(), vec![]))?;

        match self.execute(transaction) {
            Ok(logs) => {
                let signature = transaction.signatures[0];
                self.transactions.lock().unwrap().insert(signature, logs);
                Ok(signature)
            }
            Err(failure) => {
                let logs = vec![
                    format!("Program {} invoke [1]", failure.program),
                    format!(
                        "Program {} failed: custom program error: {:#x}",
                        failure.program, failure.code
                    ),
                ];
                Err(ClientError::submission_failed(failure.reason, logs))
            }
        }
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        _commitment: CommitmentConfig,
    ) -> ClientResult<bool> {
        Ok(self.transactions.lock().unwrap().contains_key(signature))
    }

    async fn transaction_logs(&self, signature: &Signature) -> ClientResult<Vec<String>> {
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .get(signature)
            .cloned()
            .unwrap_or_default())
    }

    fn default_commitment(&self) -> CommitmentConfig {
        CommitmentConfig::processed()
    }

    fn default_confirmation_timeout(&self) -> Duration {
        Duration::from_secs(5)
    }
}
