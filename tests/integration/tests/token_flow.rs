use nftkit_client::types::TokenAmount;
use nftkit_client::{ClientError, CreateSftInput, SendTokensInput};
use nftkit_test_utils::TestContext;
use solana_program::program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};

async fn create_funded_sft(ctx: &TestContext, amount: u64, decimals: u8) -> Pubkey {
    let created = ctx
        .client
        .nfts()
        .create_sft(CreateSftInput {
            name: "Some SFT".to_string(),
            symbol: "SFT".to_string(),
            uri: "https://example.com/sft.json".to_string(),
            decimals,
            token_owner: Some(ctx.identity.pubkey()),
            token_amount: Some(TokenAmount::new(amount, decimals)),
            ..Default::default()
        })
        .await
        .unwrap();
    created.mint_address
}

fn token_balance(ctx: &TestContext, address: &Pubkey) -> u64 {
    let account = ctx.connection.account(address).unwrap();
    spl_token::state::Account::unpack(&account.data)
        .unwrap()
        .amount
}

#[tokio::test]
async fn send_tokens_creates_the_destination_ata() {
    let ctx = TestContext::new();
    let mint = create_funded_sft(&ctx, 500, 2).await;
    let recipient = Keypair::new();

    let sent = ctx
        .client
        .tokens()
        .send(SendTokensInput {
            to_owner: Some(recipient.pubkey()),
            ..SendTokensInput::new(mint, TokenAmount::new(150, 2))
        })
        .await
        .unwrap();

    assert_eq!(
        sent.destination_address,
        spl_associated_token_account::get_associated_token_address(&recipient.pubkey(), &mint)
    );
    assert_eq!(token_balance(&ctx, &sent.destination_address), 150);
    assert_eq!(token_balance(&ctx, &sent.source_address), 350);
}

#[tokio::test]
async fn sending_twice_reuses_the_existing_ata() {
    let ctx = TestContext::new();
    let mint = create_funded_sft(&ctx, 100, 0).await;
    let recipient = Keypair::new();

    for _ in 0..2 {
        ctx.client
            .tokens()
            .send(SendTokensInput {
                to_owner: Some(recipient.pubkey()),
                ..SendTokensInput::new(mint, TokenAmount::token(10))
            })
            .await
            .unwrap();
    }

    let destination =
        spl_associated_token_account::get_associated_token_address(&recipient.pubkey(), &mint);
    assert_eq!(token_balance(&ctx, &destination), 20);
}

#[tokio::test]
async fn overdrawn_transfer_surfaces_program_logs() {
    let ctx = TestContext::new();
    let mint = create_funded_sft(&ctx, 10, 0).await;

    let result = ctx
        .client
        .tokens()
        .send(SendTokensInput {
            to_owner: Some(Keypair::new().pubkey()),
            ..SendTokensInput::new(mint, TokenAmount::token(1_000))
        })
        .await;

    let Err(ClientError::RpcSubmission { logs, .. }) = result else {
        panic!("expected a submission rejection");
    };
    assert!(!logs.is_empty());

    // The registered token program translates the logs into a typed error.
    match ctx.client.programs().resolve_error(&logs) {
        Some(ClientError::ProgramLogic { program, .. }) => assert_eq!(program, "TokenProgram"),
        other => panic!("unexpected resolution: {other:?}"),
    }
}

#[tokio::test]
async fn failed_transactions_leave_no_partial_state() {
    let ctx = TestContext::new();
    let mint = create_funded_sft(&ctx, 10, 0).await;
    let recipient = Keypair::new();

    let result = ctx
        .client
        .tokens()
        .send(SendTokensInput {
            to_owner: Some(recipient.pubkey()),
            ..SendTokensInput::new(mint, TokenAmount::token(1_000))
        })
        .await;
    assert!(result.is_err());

    // The destination ATA creation in the same transaction is rolled back.
    let destination =
        spl_associated_token_account::get_associated_token_address(&recipient.pubkey(), &mint);
    assert!(ctx.connection.account(&destination).is_none());
}
