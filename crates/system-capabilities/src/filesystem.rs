//! 文件系统能力模块。
//!
//! 所有访问都以构造时给定的根目录为界：目录树遍历委托给 [`TreeWalker`]，
//! 文件读取会先规范化路径，再拒绝任何落在根目录之外的结果。

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::tree::{TreeEntry, TreeWalker, WalkOptions};

/// 文件系统错误类型。
#[derive(Debug, Error)]
pub enum FileSystemError {
    #[error("路径不存在: {0}")]
    PathNotFound(String),

    #[error("路径不是目录: {0}")]
    NotADirectory(String),

    #[error("路径不是文件: {0}")]
    NotAFile(String),

    #[error("路径超出根目录: {0}")]
    OutsideRoot(String),

    #[error("权限不足: {0}")]
    PermissionDenied(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

impl FileSystemError {
    /// 对调用方而言是否等同于“找不到”。
    ///
    /// 越界路径与目录同样归入此类，不向客户端泄露根目录之外的任何信息。
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PathNotFound(_) | Self::NotADirectory(_) | Self::NotAFile(_) | Self::OutsideRoot(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FileSystemError>;

/// 以固定根目录为界的文件系统能力。
#[derive(Debug, Clone)]
pub struct FileSystemCapabilities {
    /// 规范化后的根目录。
    root: PathBuf,
    walker: TreeWalker,
}

impl FileSystemCapabilities {
    /// 创建以 `root` 为根的能力实例。
    ///
    /// 根目录会被规范化，后续所有相对路径都相对于规范化结果计算。
    pub fn new(root: impl AsRef<Path>, options: WalkOptions) -> Result<Self> {
        let requested = root.as_ref();
        let root = canonicalize_existing(requested, &requested.display().to_string())?;

        if !root.is_dir() {
            return Err(FileSystemError::NotADirectory(root.display().to_string()));
        }

        info!(
            root = %root.display(),
            max_depth = ?options.max_depth,
            follow_links = options.follow_links,
            "filesystem capabilities initialized"
        );

        Ok(Self {
            walker: TreeWalker::new(root.clone(), options),
            root,
        })
    }

    /// 规范化后的根目录。
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 根目录的名称（文件系统根 `/` 返回空字符串）。
    pub fn root_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// 遍历整个根目录。
    pub fn walk_root(&self) -> Result<Vec<TreeEntry>> {
        self.walker.walk(&self.root)
    }

    /// 遍历根目录下的某个子目录，`directory` 可以是相对根目录的路径。
    pub fn walk(&self, directory: impl AsRef<Path>) -> Result<Vec<TreeEntry>> {
        self.walker.walk(directory.as_ref())
    }

    /// 读取根目录下某个文件的完整文本内容。
    ///
    /// 内容按 UTF-8 有损解码，非法字节被替换为 U+FFFD；二进制文件因此会被误读。
    pub fn read_file(&self, relative: &str) -> Result<String> {
        if relative.is_empty() {
            return Err(FileSystemError::PathNotFound(String::new()));
        }

        let canonical = canonicalize_existing(&self.root.join(relative), relative)?;

        if !canonical.starts_with(&self.root) {
            warn!(
                requested = %relative,
                resolved = %canonical.display(),
                "rejected file read outside root"
            );
            return Err(FileSystemError::OutsideRoot(relative.to_string()));
        }

        let metadata = std::fs::metadata(&canonical).map_err(|e| map_io(e, relative))?;
        if metadata.is_dir() {
            return Err(FileSystemError::NotAFile(relative.to_string()));
        }

        debug!(path = %canonical.display(), size = metadata.len(), "Reading file");
        let bytes = std::fs::read(&canonical).map_err(|e| map_io(e, relative))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// 规范化一个必须存在的路径。
pub(crate) fn canonicalize_existing(path: &Path, display: &str) -> Result<PathBuf> {
    path.canonicalize().map_err(|e| map_io(e, display))
}

fn map_io(err: std::io::Error, display: &str) -> FileSystemError {
    match err.kind() {
        ErrorKind::NotFound | ErrorKind::NotADirectory => {
            FileSystemError::PathNotFound(display.to_string())
        }
        ErrorKind::PermissionDenied => FileSystemError::PermissionDenied(display.to_string()),
        _ => FileSystemError::Io(err),
    }
}
