use std::sync::Arc;

use sqlx::PgPool;

use crate::external::store::SalesStore;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub store: Arc<dyn SalesStore>,
}
