use nftkit_client::models::NftEdition;
use nftkit_client::pdas::find_master_edition_pda;
use nftkit_client::{ClientError, CreateNftInput, PrintNewEditionInput, UpdateNftInput};
use nftkit_test_utils::TestContext;

fn nft_input(name: &str, max_supply: Option<u64>) -> CreateNftInput {
    CreateNftInput {
        name: name.to_string(),
        symbol: "SNFT".to_string(),
        uri: "https://example.com/nft.json".to_string(),
        seller_fee_basis_points: 200,
        max_supply,
        ..Default::default()
    }
}

#[tokio::test]
async fn update_changes_only_the_requested_fields() {
    let ctx = TestContext::new();
    let created = ctx
        .client
        .nfts()
        .create(nft_input("Some NFT", Some(0)))
        .await
        .unwrap();
    let nft = ctx
        .client
        .nfts()
        .find_by_mint(created.mint_address)
        .await
        .unwrap();

    ctx.client
        .nfts()
        .update(UpdateNftInput {
            name: Some("Renamed NFT".to_string()),
            ..UpdateNftInput::new(nft.metadata.clone())
        })
        .await
        .unwrap();

    let updated = ctx
        .client
        .nfts()
        .find_by_mint(created.mint_address)
        .await
        .unwrap();
    assert_eq!(updated.name(), "Renamed NFT");
    assert_eq!(updated.metadata.symbol, "SNFT");
    assert_eq!(updated.metadata.seller_fee_basis_points, 200);
    assert_eq!(updated.uri(), nft.uri());
}

#[tokio::test]
async fn print_new_edition_mints_a_numbered_print() {
    let ctx = TestContext::new();
    let created = ctx
        .client
        .nfts()
        .create(nft_input("Master", Some(10)))
        .await
        .unwrap();

    let printed = ctx
        .client
        .nfts()
        .print_new_edition(PrintNewEditionInput::new(created.mint_address))
        .await
        .unwrap();
    assert_eq!(printed.edition_number, 1);

    let print = ctx
        .client
        .nfts()
        .find_by_mint(printed.new_mint_address)
        .await
        .unwrap();
    match print.edition {
        Some(NftEdition::Print { parent, number, .. }) => {
            assert_eq!(parent, find_master_edition_pda(&created.mint_address).address);
            assert_eq!(number, 1);
        }
        other => panic!("expected a print edition, got {other:?}"),
    }
    assert!(!print.is_original());
    // The print inherits the master's metadata.
    assert_eq!(print.name(), "Master");

    let master = ctx
        .client
        .nfts()
        .find_by_mint(created.mint_address)
        .await
        .unwrap();
    match master.edition {
        Some(NftEdition::Original { supply, .. }) => assert_eq!(supply, 1),
        other => panic!("expected a master edition, got {other:?}"),
    }
}

#[tokio::test]
async fn printing_past_max_supply_is_rejected_before_sending() {
    let ctx = TestContext::new();
    // Default max supply is zero: no prints allowed.
    let created = ctx
        .client
        .nfts()
        .create(nft_input("Master", Some(0)))
        .await
        .unwrap();

    let result = ctx
        .client
        .nfts()
        .print_new_edition(PrintNewEditionInput::new(created.mint_address))
        .await;
    assert!(matches!(result, Err(ClientError::InvalidInput(_))));
}
