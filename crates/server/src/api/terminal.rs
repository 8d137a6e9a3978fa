//! 终端 API 路由。
//!
//! 仅是桩实现：命令不会被执行，只返回固定文本。

use axum::{Json, Router, body::Bytes, extract::State, routing::post};
use fs_agent_api_types::{TerminalRequest, TerminalResponse};
use std::sync::Arc;
use tracing::{info, warn};

use super::state::AppState;

/// 创建终端 API 路由。
pub fn create_terminal_router() -> Router<Arc<AppState>> {
    Router::new().route("/terminal/execute", post(execute_command))
}

/// 请求体缺失或无法解析时按空命令处理，不拒绝请求。
async fn execute_command(State(state): State<Arc<AppState>>, body: Bytes) -> Json<TerminalResponse> {
    let request = match serde_json::from_slice::<TerminalRequest>(&body) {
        Ok(request) => request,
        Err(err) => {
            warn!(error = %err, "malformed terminal request, treating as empty command");
            TerminalRequest::default()
        }
    };

    info!(command = %request.command(), "terminal stub request");
    let output = state.terminal.execute(request.command());
    Json(TerminalResponse { output })
}
