pub mod data;
pub mod summary;

use std::sync::Arc;

use axum::Router;

use crate::web::state::AppState;

/// 組合 `/api` 底下的路由
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(data::routes())
        .merge(summary::routes())
}
