//! 文件系统 API 路由。
//!
//! 提供目录树与文件内容给前端组件使用。遍历和读取都是阻塞调用，
//! 放到 blocking 线程池中执行。

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use fs_agent_api_types::{ErrorResponse, FileContentsResponse};
use serde::Serialize;
use std::sync::Arc;
use system_capabilities::{FileSystemError, TreeEntry};
use tokio::task::JoinError;
use tracing::{debug, error, warn};

use super::state::AppState;

/// 创建文件系统 API 路由。
///
/// `/file/` 这种空路径不会匹配通配符，交给全局 fallback 返回 404。
pub fn create_filesystem_router() -> Router<Arc<AppState>> {
    Router::new()
        // 整棵目录树
        .route("/tree", get(get_tree))
        // 单个文件内容
        .route("/file/{*path}", get(read_file))
}

#[derive(Debug, Serialize)]
pub struct TreeResponse {
    /// 根目录名称。
    pub root: String,
    pub tree: Vec<TreeEntry>,
}

/// 获取目录树。
async fn get_tree(State(state): State<Arc<AppState>>) -> Result<Json<TreeResponse>, ApiError> {
    let walker_state = state.clone();
    let tree = tokio::task::spawn_blocking(move || walker_state.filesystem.walk_root()).await??;

    Ok(Json(TreeResponse {
        root: state.filesystem.root_name(),
        tree,
    }))
}

/// 读取文件内容，响应中的 `path` 原样回显请求路径。
///
/// 读取失败一律返回 404，只影响当前请求。
async fn read_file(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Json<FileContentsResponse>, ApiError> {
    let requested = path.clone();
    let contents = tokio::task::spawn_blocking(move || state.filesystem.read_file(&requested))
        .await?
        .map_err(ApiError::file_unavailable)?;

    Ok(Json(FileContentsResponse { path, contents }))
}

/// 404 响应，保持纯文本 `Not found`。
pub(crate) fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

/// API 错误类型。
#[derive(Debug)]
pub(crate) struct ApiError {
    message: String,
    code: String,
    status: StatusCode,
}

impl ApiError {
    /// 文件读取错误：不论原因都作为 404 返回。
    fn file_unavailable(err: FileSystemError) -> Self {
        if err.is_not_found() {
            debug!(error = %err, "file not found");
        } else {
            warn!(error = %err, "file read failed, reporting not found");
        }

        ApiError {
            message: err.to_string(),
            code: "PATH_NOT_FOUND".to_string(),
            status: StatusCode::NOT_FOUND,
        }
    }
}

impl From<FileSystemError> for ApiError {
    fn from(err: FileSystemError) -> Self {
        if err.is_not_found() {
            debug!(error = %err, "filesystem path not found");
            return ApiError {
                message: err.to_string(),
                code: "PATH_NOT_FOUND".to_string(),
                status: StatusCode::NOT_FOUND,
            };
        }

        match err {
            FileSystemError::PermissionDenied(path) => ApiError {
                message: format!("Permission denied: {}", path),
                code: "PERMISSION_DENIED".to_string(),
                status: StatusCode::FORBIDDEN,
            },
            other => {
                warn!(error = %other, "filesystem request failed");
                ApiError {
                    message: format!("IO error: {}", other),
                    code: "IO_ERROR".to_string(),
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                }
            }
        }
    }
}

impl From<JoinError> for ApiError {
    fn from(err: JoinError) -> Self {
        error!(error = %err, "blocking filesystem task failed");
        ApiError {
            message: err.to_string(),
            code: "INTERNAL_ERROR".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status == StatusCode::NOT_FOUND {
            return not_found();
        }

        let body = Json(ErrorResponse {
            code: self.code,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: ApiError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        (status, String::from_utf8(body.to_vec()).expect("utf-8 body"))
    }

    #[tokio::test]
    async fn test_file_permission_denied_is_not_found() {
        let err = ApiError::file_unavailable(FileSystemError::PermissionDenied(
            "secret.txt".to_string(),
        ));
        assert_eq!(
            render(err).await,
            (StatusCode::NOT_FOUND, "Not found".to_string())
        );
    }

    #[tokio::test]
    async fn test_file_io_error_is_not_found() {
        let err = ApiError::file_unavailable(FileSystemError::Io(std::io::Error::other(
            "device not ready",
        )));
        assert_eq!(
            render(err).await,
            (StatusCode::NOT_FOUND, "Not found".to_string())
        );
    }

    #[tokio::test]
    async fn test_file_outside_root_is_not_found() {
        let err = ApiError::file_unavailable(FileSystemError::OutsideRoot("../x".to_string()));
        assert_eq!(
            render(err).await,
            (StatusCode::NOT_FOUND, "Not found".to_string())
        );
    }

    #[tokio::test]
    async fn test_tree_io_error_is_internal_json() {
        let err = ApiError::from(FileSystemError::Io(std::io::Error::other("disk gone")));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = serde_json::from_str(&body).expect("json body");
        assert_eq!(json["code"], "IO_ERROR");
    }
}
