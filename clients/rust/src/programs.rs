//! Registry of the on-chain programs the client talks to.
//!
//! Entries map a program address to a name and a log-based error resolver so
//! that a ledger rejection can be translated into a typed
//! [`ClientError::ProgramLogic`]. The registry is populated at client setup
//! and read-only afterwards; resolver internals stay thin, the programs
//! themselves are external.

use std::collections::HashMap;

use solana_sdk::pubkey::Pubkey;

use crate::errors::ClientError;

/// Translate program logs into a typed error, if they belong to the program.
pub type ErrorResolver = fn(program: &RegisteredProgram, logs: &[String]) -> Option<ClientError>;

/// One registered on-chain program.
#[derive(Clone)]
pub struct RegisteredProgram {
    pub name: &'static str,
    pub address: Pubkey,
    pub error_resolver: ErrorResolver,
}

impl std::fmt::Debug for RegisteredProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredProgram")
            .field("name", &self.name)
            .field("address", &self.address)
            .finish()
    }
}

/// Resolver matching the ubiquitous "custom program error" log line.
pub fn custom_code_resolver(
    program: &RegisteredProgram,
    logs: &[String],
) -> Option<ClientError> {
    let prefix = format!("Program {} failed: custom program error: ", program.address);
    for line in logs {
        if let Some(code) = line.strip_prefix(&prefix) {
            return Some(ClientError::ProgramLogic {
                program: program.name.to_string(),
                message: format!("custom program error: {code}"),
                logs: logs.to_vec(),
            });
        }
    }
    None
}

/// Address → program mapping.
#[derive(Default)]
pub struct ProgramRegistry {
    programs: HashMap<Pubkey, RegisteredProgram>,
}

impl ProgramRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a program entry. Replaces any previous entry for the same
    /// address.
    pub fn register(&mut self, program: RegisteredProgram) {
        self.programs.insert(program.address, program);
    }

    pub fn get(&self, address: &Pubkey) -> Option<&RegisteredProgram> {
        self.programs.get(address)
    }

    /// Run the registered resolvers over a failed transaction's logs.
    ///
    /// Returns the first program-specific translation, or `None` when no
    /// registered program claims the failure.
    pub fn resolve_error(&self, logs: &[String]) -> Option<ClientError> {
        self.programs
            .values()
            .find_map(|program| (program.error_resolver)(program, logs))
    }
}
