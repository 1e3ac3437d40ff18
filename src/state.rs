use std::sync::Arc;

use crate::{
    catalog::CatalogRepository,
    db::{DbPool, OrmConn},
    events::ChangeFeed,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub catalog: Arc<CatalogRepository>,
    pub feed: Arc<ChangeFeed>,
}
