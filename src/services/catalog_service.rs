use crate::{
    dto::catalog::ProductList,
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::CatalogQuery,
    state::AppState,
};

/// Run the fallback chain and filter the winning catalog in memory.
pub async fn list_products(
    state: &AppState,
    query: CatalogQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (mut items, origin) = state.catalog.load().await;

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        items.retain(|p: &Product| {
            p.title.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
        });
    }

    if let Some(category) = query.category.as_ref().filter(|s| !s.is_empty()) {
        items.retain(|p| p.category.eq_ignore_ascii_case(category));
    }

    let total = items.len() as i64;
    let data = ProductList {
        items,
        source: origin,
    };
    Ok(ApiResponse::success(
        "Catalog",
        data,
        Some(Meta::new(1, total, total)),
    ))
}

/// Detail lookup against the id-indexed cache; a cold cache is warmed once.
pub async fn get_product(state: &AppState, id: i64) -> AppResult<ApiResponse<Product>> {
    match state.catalog.lookup(id).await {
        Some(product) => Ok(ApiResponse::success("Product", product, None)),
        None => Err(AppError::NotFound),
    }
}
