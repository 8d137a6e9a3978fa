use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use system_capabilities::{IgnoreSet, WalkOptions};
use tracing::info;

type Result<T> = anyhow::Result<T>;

/// 默认配置文件路径（相对进程工作目录）。
pub const DEFAULT_CONFIG_PATH: &str = "fs-agent.toml";

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// 遍历根目录，缺省为进程启动时的工作目录。
    #[serde(default)]
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub tree: TreeConfig,
}

impl ServerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("failed to deserialize server config")
    }

    /// 配置文件不存在时使用默认配置。
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            info!(path = %path.display(), "loading server config");
            Self::from_file(path)
        } else {
            info!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn resolve_root(&self) -> Result<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir().context("failed to read current working directory"),
        }
    }

    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            max_depth: self.tree.max_depth,
            follow_links: self.tree.follow_links,
            ignore: IgnoreSet::with_extra(self.tree.ignore.iter().cloned()),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            root: None,
            tree: TreeConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TreeConfig {
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default = "default_follow_links")]
    pub follow_links: bool,
    /// 追加到默认忽略列表的名称。
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            follow_links: default_follow_links(),
            ignore: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_follow_links() -> bool {
    true
}
