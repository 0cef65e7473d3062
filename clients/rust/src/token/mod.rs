//! Token module: operations over the token and associated-token programs.

mod client;
mod send_tokens;

pub use client::TokenClient;
pub use send_tokens::{
    send_tokens_builder, SendTokensBuilderParams, SendTokensInput, SendTokensOperation,
    SendTokensOutput,
};

use crate::operation::OperationRegistry;
use crate::programs::{custom_code_resolver, ProgramRegistry, RegisteredProgram};

/// Register the token operations and the token programs.
pub(crate) fn install(operations: &mut OperationRegistry, programs: &mut ProgramRegistry) {
    operations.register::<SendTokensOperation, _>(send_tokens::SendTokensHandler);

    programs.register(RegisteredProgram {
        name: "TokenProgram",
        address: spl_token::id(),
        error_resolver: custom_code_resolver,
    });
    programs.register(RegisteredProgram {
        name: "AssociatedTokenProgram",
        address: spl_associated_token_account::id(),
        error_resolver: custom_code_resolver,
    });
}
