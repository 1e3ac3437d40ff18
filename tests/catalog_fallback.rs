use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use storefront_api::{
    catalog::{CatalogOrigin, CatalogRepository},
    config::CatalogConfig,
    models::Product,
};

#[derive(Clone)]
struct StubState {
    hits: Arc<AtomicUsize>,
    response: StubResponse,
}

#[derive(Clone)]
enum StubResponse {
    Products(Vec<Product>),
    Failure,
}

async fn serve_catalog(State(state): State<StubState>) -> Result<Json<Vec<Product>>, StatusCode> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    match &state.response {
        StubResponse::Products(products) => Ok(Json(products.clone())),
        StubResponse::Failure => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// Spin up a one-route catalog feed on an ephemeral port and count its hits.
async fn spawn_stub(response: StubResponse) -> anyhow::Result<(String, Arc<AtomicUsize>)> {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/products", get(serve_catalog))
        .with_state(StubState {
            hits: hits.clone(),
            response,
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok((format!("http://{addr}/products"), hits))
}

fn stub_products() -> Vec<Product> {
    vec![
        Product {
            id: 901,
            title: "Stub Trench Coat".to_string(),
            price: 120.0,
            description: "Belted trench coat served by the stub feed.".to_string(),
            category: "outerwear".to_string(),
            image: "https://stub.example/trench.jpg".to_string(),
        },
        Product {
            id: 902,
            title: "Stub Silk Scarf".to_string(),
            price: 25.5,
            description: "Printed silk scarf served by the stub feed.".to_string(),
            category: "accessories".to_string(),
            image: "https://stub.example/scarf.jpg".to_string(),
        },
    ]
}

fn repository(primary: &str, secondary: &str, offline: bool) -> CatalogRepository {
    CatalogRepository::new(&CatalogConfig {
        primary_url: primary.to_string(),
        secondary_url: secondary.to_string(),
        request_timeout: Duration::from_secs(2),
        offline,
    })
    .expect("catalog repository")
}

#[tokio::test]
async fn primary_feed_wins_when_healthy() -> anyhow::Result<()> {
    let (primary, primary_hits) = spawn_stub(StubResponse::Products(stub_products())).await?;
    let (secondary, secondary_hits) = spawn_stub(StubResponse::Failure).await?;
    let repo = repository(&primary, &secondary, false);

    let (products, origin) = repo.load().await;

    assert_eq!(origin, CatalogOrigin::Primary);
    assert_eq!(products.len(), 2);
    assert_eq!(primary_hits.load(Ordering::SeqCst), 1);
    assert_eq!(secondary_hits.load(Ordering::SeqCst), 0);

    // the winning source populated the detail cache
    let cached = repo.product(901).expect("cached product");
    assert_eq!(cached.title, "Stub Trench Coat");

    Ok(())
}

#[tokio::test]
async fn secondary_feed_attempted_exactly_once_when_primary_fails() -> anyhow::Result<()> {
    let (primary, primary_hits) = spawn_stub(StubResponse::Failure).await?;
    let (secondary, secondary_hits) = spawn_stub(StubResponse::Products(stub_products())).await?;
    let repo = repository(&primary, &secondary, false);

    let (products, origin) = repo.load().await;

    assert_eq!(origin, CatalogOrigin::Secondary);
    assert_eq!(products.len(), 2);
    assert_eq!(primary_hits.load(Ordering::SeqCst), 1);
    assert_eq!(secondary_hits.load(Ordering::SeqCst), 1);

    // one attempt per source per load call, no retries
    repo.load().await;
    assert_eq!(primary_hits.load(Ordering::SeqCst), 2);
    assert_eq!(secondary_hits.load(Ordering::SeqCst), 2);

    Ok(())
}

#[tokio::test]
async fn bundled_copy_serves_when_every_feed_fails() -> anyhow::Result<()> {
    let (primary, primary_hits) = spawn_stub(StubResponse::Failure).await?;
    let (secondary, secondary_hits) = spawn_stub(StubResponse::Failure).await?;
    let repo = repository(&primary, &secondary, false);

    let (products, origin) = repo.load().await;

    assert_eq!(origin, CatalogOrigin::Bundled);
    assert!(!products.is_empty(), "bundled catalog should not be empty");
    assert_eq!(primary_hits.load(Ordering::SeqCst), 1);
    assert_eq!(secondary_hits.load(Ordering::SeqCst), 1);

    // bundled data is cached like any other source
    assert!(repo.product(products[0].id).is_some());

    Ok(())
}

#[tokio::test]
async fn offline_mode_never_touches_the_network() -> anyhow::Result<()> {
    let (primary, primary_hits) = spawn_stub(StubResponse::Products(stub_products())).await?;
    let (secondary, secondary_hits) = spawn_stub(StubResponse::Products(stub_products())).await?;
    let repo = repository(&primary, &secondary, true);

    let (products, origin) = repo.load().await;

    assert_eq!(origin, CatalogOrigin::Bundled);
    assert!(!products.is_empty());
    assert_eq!(primary_hits.load(Ordering::SeqCst), 0);
    assert_eq!(secondary_hits.load(Ordering::SeqCst), 0);

    Ok(())
}
