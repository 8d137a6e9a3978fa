use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode, header};
use fs_agent_server::api::{AppState, create_router};
use system_capabilities::{FileSystemCapabilities, WalkOptions};
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    /// 外层目录，`root` 是其中的 `project` 子目录，便于构造越界场景。
    pub outer: TempDir,
    pub root: PathBuf,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_options(WalkOptions::default())
    }

    pub fn with_options(options: WalkOptions) -> Self {
        let outer = TempDir::new().expect("create temp dir");
        let root = outer.path().join("project");
        populate(&root);
        fs::write(outer.path().join("outside.txt"), "outside root").expect("write outside file");

        let filesystem = FileSystemCapabilities::new(&root, options).expect("capabilities");
        let root = filesystem.root().to_path_buf();
        let router = create_router(Arc::new(AppState::new(filesystem)));

        Self {
            outer,
            root,
            router,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Bytes) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("build request");
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: &str) -> (StatusCode, Bytes) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("build request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Bytes) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        (status, body)
    }
}

fn populate(root: &Path) {
    fs::create_dir_all(root.join("src/api")).expect("create src/api");
    fs::create_dir_all(root.join("node_modules/left-pad")).expect("create node_modules");
    fs::create_dir_all(root.join(".git/objects")).expect("create .git");
    fs::write(root.join("README.md"), "# project\n").expect("write README");
    fs::write(root.join("src/main.rs"), "fn main() {}\n").expect("write main.rs");
    fs::write(root.join("src/api/mod.rs"), "pub mod routes;\n").expect("write mod.rs");
    fs::write(root.join("node_modules/left-pad/index.js"), "").expect("write index.js");
    fs::write(root.join(".git/HEAD"), "ref: refs/heads/main\n").expect("write HEAD");
}

pub fn body_text(body: &Bytes) -> &str {
    std::str::from_utf8(body).expect("utf-8 body")
}

pub fn body_json(body: &Bytes) -> serde_json::Value {
    serde_json::from_slice(body).expect("json body")
}
