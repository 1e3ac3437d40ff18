use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use storefront_api::{
    catalog::CatalogRepository,
    config::CatalogConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        cards::SaveCardRequest,
        cart::AddToCartRequest,
        orders::CheckoutRequest,
        profile::UpdateProfileRequest,
    },
    error::AppError,
    events::ChangeFeed,
    routes::params::Pagination,
    services::{card_service, cart_service, order_service, profile_service},
    state::AppState,
};

/// Fresh store in a temp directory, catalog pinned to the bundled copy so no
/// test ever depends on the network.
async fn setup_state(dir: &TempDir) -> anyhow::Result<AppState> {
    let db_path = dir.path().join("storefront.db");
    let database_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let pool = create_pool(&database_url).await?;
    run_migrations(&pool).await?;
    let orm = create_orm_conn(&database_url).await?;

    let catalog = CatalogRepository::new(&CatalogConfig {
        primary_url: "http://127.0.0.1:9/products".to_string(),
        secondary_url: "http://127.0.0.1:9/products.json".to_string(),
        request_timeout: Duration::from_secs(1),
        offline: true,
    })?;

    Ok(AppState {
        pool,
        orm,
        catalog: Arc::new(catalog),
        feed: Arc::new(ChangeFeed::new()),
    })
}

fn default_pagination() -> Pagination {
    Pagination {
        page: None,
        per_page: None,
    }
}

fn visa(set_default: bool) -> SaveCardRequest {
    SaveCardRequest {
        holder_name: "Jordan Example".to_string(),
        card_number: "4111 1111 1111 1234".to_string(),
        expiry: "11/2028".to_string(),
        network: "VISA".to_string(),
        set_default,
    }
}

fn mastercard(set_default: bool) -> SaveCardRequest {
    SaveCardRequest {
        holder_name: "Jordan Example".to_string(),
        card_number: "5500 0000 0000 9876".to_string(),
        expiry: "03/2027".to_string(),
        network: "MASTERCARD".to_string(),
        set_default,
    }
}

#[tokio::test]
async fn checkout_converts_cart_into_order_and_clears_it() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = setup_state(&dir).await?;

    // the offline chain serves the bundled catalog
    let (products, _) = state.catalog.load().await;
    assert!(products.len() >= 2);
    let first = &products[0];
    let second = &products[1];

    // two units of the first product, one of the second
    cart_service::add_to_cart(&state, AddToCartRequest { product_id: first.id }).await?;
    cart_service::add_to_cart(&state, AddToCartRequest { product_id: first.id }).await?;
    cart_service::add_to_cart(&state, AddToCartRequest { product_id: second.id }).await?;

    let cart = cart_service::list_cart(&state).await?.data.expect("cart");
    assert_eq!(cart.items.len(), 2);
    let expected_total = first.price * 2.0 + second.price;
    assert!((cart.total - expected_total).abs() < 1e-9);

    let checkout = order_service::checkout(&state, CheckoutRequest::default()).await?;
    let placed = checkout.data.expect("order");
    assert!(placed.order.order_number.starts_with("ORD-"));
    assert_eq!(placed.order.order_number.len(), "ORD-".len() + 8);
    assert_eq!(placed.order.status, "completed");
    assert_eq!(placed.lines.len(), 2);
    assert!((placed.order.total_amount - expected_total).abs() < 1e-9);

    // cart is empty afterwards
    let cart = cart_service::list_cart(&state).await?.data.expect("cart");
    assert!(cart.items.is_empty());
    assert_eq!(cart.total, 0.0);

    // exactly one order header with len(cart) lines was persisted
    let orders = order_service::list_orders(&state, default_pagination())
        .await?
        .data
        .expect("orders");
    assert_eq!(orders.items.len(), 1);

    let detail = order_service::get_order(&state, placed.order.id)
        .await?
        .data
        .expect("order detail");
    assert_eq!(detail.lines.len(), 2);
    assert_eq!(detail.order.order_number, placed.order.order_number);

    Ok(())
}

#[tokio::test]
async fn checkout_with_empty_cart_persists_nothing() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = setup_state(&dir).await?;

    let result = order_service::checkout(&state, CheckoutRequest::default()).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let orders = order_service::list_orders(&state, default_pagination())
        .await?
        .data
        .expect("orders");
    assert!(orders.items.is_empty());

    Ok(())
}

#[tokio::test]
async fn checkout_card_save_is_best_effort_but_applied() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = setup_state(&dir).await?;

    let (products, _) = state.catalog.load().await;
    cart_service::add_to_cart(
        &state,
        AddToCartRequest {
            product_id: products[0].id,
        },
    )
    .await?;

    let checkout = order_service::checkout(
        &state,
        CheckoutRequest {
            save_card: Some(visa(false)),
        },
    )
    .await?;
    assert!(checkout.data.is_some());

    let cards = card_service::list_cards(&state).await?.data.expect("cards");
    assert_eq!(cards.items.len(), 1);
    assert_eq!(cards.items[0].last_four, "1234");

    Ok(())
}

#[tokio::test]
async fn decreasing_quantity_removes_the_line_at_one() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = setup_state(&dir).await?;

    let (products, _) = state.catalog.load().await;
    let id = products[0].id;

    cart_service::add_to_cart(&state, AddToCartRequest { product_id: id }).await?;
    cart_service::add_to_cart(&state, AddToCartRequest { product_id: id }).await?;

    cart_service::decrease_quantity(&state, id).await?;
    let cart = cart_service::list_cart(&state).await?.data.expect("cart");
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 1);

    cart_service::decrease_quantity(&state, id).await?;
    let cart = cart_service::list_cart(&state).await?.data.expect("cart");
    assert!(cart.items.is_empty());

    // the line is gone, another decrease is a 404
    let result = cart_service::decrease_quantity(&state, id).await;
    assert!(matches!(result, Err(AppError::NotFound)));

    Ok(())
}

#[tokio::test]
async fn first_saved_card_becomes_default_and_duplicates_are_skipped() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = setup_state(&dir).await?;

    // first card is default even without asking
    let first = card_service::save_card(&state, visa(false))
        .await?
        .data
        .expect("card");
    assert!(first.is_default);
    assert_eq!(first.last_four, "1234");

    // same last four + network: silent no-op, count unchanged
    let duplicate = card_service::save_card(&state, visa(true)).await?;
    assert_eq!(duplicate.message, "Card already saved");
    let cards = card_service::list_cards(&state).await?.data.expect("cards");
    assert_eq!(cards.items.len(), 1);

    Ok(())
}

#[tokio::test]
async fn at_most_one_card_is_default() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = setup_state(&dir).await?;

    let visa_card = card_service::save_card(&state, visa(false))
        .await?
        .data
        .expect("card");
    let master_card = card_service::save_card(&state, mastercard(true))
        .await?
        .data
        .expect("card");

    // saving with set_default moved the flag
    let cards = card_service::list_cards(&state).await?.data.expect("cards");
    let defaults: Vec<_> = cards.items.iter().filter(|c| c.is_default).collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].id, master_card.id);

    // set X default, then Y: exactly one default afterwards, and it is Y
    card_service::set_default_card(&state, visa_card.id).await?;
    card_service::set_default_card(&state, master_card.id).await?;

    let cards = card_service::list_cards(&state).await?.data.expect("cards");
    let defaults: Vec<_> = cards.items.iter().filter(|c| c.is_default).collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].id, master_card.id);

    // the default card sorts first
    assert_eq!(cards.items[0].id, master_card.id);

    // deleting the default leaves no default behind
    card_service::delete_card(&state, master_card.id).await?;
    let cards = card_service::list_cards(&state).await?.data.expect("cards");
    assert_eq!(cards.items.len(), 1);
    assert!(cards.items.iter().all(|c| !c.is_default));

    Ok(())
}

#[tokio::test]
async fn profile_is_a_single_upserted_row() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = setup_state(&dir).await?;

    let missing = profile_service::get_profile(&state).await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    profile_service::update_profile(
        &state,
        UpdateProfileRequest {
            name: "Jordan Example".to_string(),
            email: "jordan@example.com".to_string(),
            photo_path: None,
        },
    )
    .await?;

    let profile = profile_service::get_profile(&state)
        .await?
        .data
        .expect("profile");
    assert_eq!(profile.name, "Jordan Example");

    // a second write replaces the same row
    profile_service::update_profile(
        &state,
        UpdateProfileRequest {
            name: "Jordan E.".to_string(),
            email: "jordan@example.com".to_string(),
            photo_path: Some("/data/profile.png".to_string()),
        },
    )
    .await?;

    let profile = profile_service::get_profile(&state)
        .await?
        .data
        .expect("profile");
    assert_eq!(profile.name, "Jordan E.");
    assert_eq!(profile.photo_path.as_deref(), Some("/data/profile.png"));

    Ok(())
}
