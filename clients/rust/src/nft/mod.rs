//! NFT module: operations over the token-metadata program.

mod client;
mod create_nft;
mod create_sft;
mod find_nft_by_mint;
mod find_nfts_by_mint_list;
mod load_metadata;
mod print_new_edition;
mod update_nft;

pub use client::NftClient;
pub use create_nft::{
    create_nft_builder, CreateNftBuilderContext, CreateNftBuilderParams, CreateNftInput,
    CreateNftOperation, CreateNftOutput,
};
pub use create_sft::{
    create_sft_builder, CreateSftBuilderContext, CreateSftBuilderParams, CreateSftInput,
    CreateSftOperation, CreateSftOutput,
};
pub use find_nft_by_mint::{FindNftByMintInput, FindNftByMintOperation};
pub use find_nfts_by_mint_list::{FindNftsByMintListInput, FindNftsByMintListOperation};
pub use load_metadata::{LoadMetadataInput, LoadMetadataOperation};
pub use print_new_edition::{
    print_new_edition_builder, PrintNewEditionBuilderContext, PrintNewEditionBuilderParams,
    PrintNewEditionInput, PrintNewEditionOperation, PrintNewEditionOutput,
};
pub use update_nft::{
    update_nft_builder, UpdateNftBuilderParams, UpdateNftInput, UpdateNftOperation, UpdateNftOutput,
};

use crate::constants::TOKEN_METADATA_PROGRAM_ID;
use crate::operation::OperationRegistry;
use crate::programs::{custom_code_resolver, ProgramRegistry, RegisteredProgram};

/// Register the NFT operations and the token-metadata program.
pub(crate) fn install(operations: &mut OperationRegistry, programs: &mut ProgramRegistry) {
    operations.register::<CreateNftOperation, _>(create_nft::CreateNftHandler);
    operations.register::<CreateSftOperation, _>(create_sft::CreateSftHandler);
    operations.register::<FindNftByMintOperation, _>(find_nft_by_mint::FindNftByMintHandler);
    operations
        .register::<FindNftsByMintListOperation, _>(find_nfts_by_mint_list::FindNftsByMintListHandler);
    operations.register::<LoadMetadataOperation, _>(load_metadata::LoadMetadataHandler);
    operations.register::<UpdateNftOperation, _>(update_nft::UpdateNftHandler);
    operations.register::<PrintNewEditionOperation, _>(print_new_edition::PrintNewEditionHandler);

    programs.register(RegisteredProgram {
        name: "TokenMetadataProgram",
        address: TOKEN_METADATA_PROGRAM_ID,
        error_resolver: custom_code_resolver,
    });
}
