use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use axum::{routing::get, Json, Router};
use scopeguard::defer;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};

use crate::logging;
use state::AppState;

pub mod error;
pub mod routes;
pub mod state;

/// 組合完整的路由：頁面、靜態檔、健康檢查與 API
pub fn router(state: Arc<AppState>) -> Router {
    let template_dir = PathBuf::from(&state.system.template_dir);

    Router::new()
        .route_service("/", ServeFile::new(template_dir.join("index.html")))
        .route_service("/cv", ServeFile::new(template_dir.join("cv.html")))
        .nest_service("/static", ServeDir::new(&state.system.static_dir))
        .route("/health", get(health))
        .merge(routes::api_router())
        .with_state(state)
}

/// 啟動 HTTP 服務，收到 Ctrl+C 後停止
pub async fn serve(state: Arc<AppState>) -> Result<()> {
    let addr: SocketAddr = state
        .system
        .http_addr()
        .parse()
        .context("invalid bind address")?;
    let listener = TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind {}", addr))?;

    logging::info_file_async(format!("commodity board listening on http://{}", addr));
    logging::info_console(format!("commodity board listening on http://{}", addr));
    defer! {
        logging::info_file_async("commodity board stopped");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn shutdown_signal() {
    if let Err(why) = tokio::signal::ctrl_c().await {
        logging::error_file_async(format!("Failed to install Ctrl+C handler because {:?}", why));
        // 無法監聽訊號時持續服務
        std::future::pending::<()>().await;
    }
    logging::info_file_async("Shutdown signal received, gracefully stopping");
}
