use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiSpec;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    catalog::CatalogOrigin,
    dto::{
        cards::{CardList, SaveCardRequest},
        cart::{AddToCartRequest, CartList},
        catalog::ProductList,
        orders::{CheckoutRequest, OrderList, OrderWithLines},
        profile::UpdateProfileRequest,
    },
    models::{CartLine, Order, OrderLine, Product, Profile, SavedCard},
    response::{ApiResponse, Meta},
    routes::{cards, cart, catalog, health, orders, params, profile},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        catalog::list_products,
        catalog::get_product,
        cart::cart_list,
        cart::add_to_cart,
        cart::decrease_quantity,
        cart::remove_from_cart,
        cart::clear_cart,
        cart::stream_cart,
        orders::list_orders,
        orders::checkout,
        orders::get_order,
        orders::stream_orders,
        cards::list_cards,
        cards::save_card,
        cards::set_default_card,
        cards::delete_card,
        cards::stream_cards,
        profile::get_profile,
        profile::update_profile
    ),
    components(
        schemas(
            Product,
            CartLine,
            Order,
            OrderLine,
            SavedCard,
            Profile,
            CatalogOrigin,
            ProductList,
            CartList,
            AddToCartRequest,
            CheckoutRequest,
            OrderList,
            OrderWithLines,
            SaveCardRequest,
            CardList,
            UpdateProfileRequest,
            params::Pagination,
            params::CatalogQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CartList>,
            ApiResponse<OrderWithLines>,
            ApiResponse<OrderList>,
            ApiResponse<CardList>,
            ApiResponse<Profile>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Catalog", description = "Remote catalog with layered fallback"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Checkout and order history"),
        (name = "Cards", description = "Saved payment methods"),
        (name = "Profile", description = "Device profile"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
