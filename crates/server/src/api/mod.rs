//! API 路由模块。
//!
//! 对外提供健康检查、目录树、文件读取与终端桩四类接口。

pub mod filesystem;
pub mod state;
pub mod terminal;

use std::sync::Arc;

use axum::{Router, http::StatusCode, response::Response, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use filesystem::{TreeResponse, create_filesystem_router};
pub use state::AppState;
pub use terminal::create_terminal_router;

/// 组装完整的 HTTP 路由。
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(create_filesystem_router())
        .merge(create_terminal_router())
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// 健康检查，与文件系统状态无关。
async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

async fn fallback() -> Response {
    filesystem::not_found()
}
