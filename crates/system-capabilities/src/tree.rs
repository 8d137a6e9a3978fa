//! 目录树遍历。
//!
//! 深度优先列出目录下的条目，按名称精确匹配过滤忽略项，并把 walkdir 的
//! 扁平先序序列组装成嵌套结构。单个条目的 stat 失败、权限不足或符号链接
//! 循环只会跳过该条目，不会中断整次遍历；列举失败的目录保留已读到的子条目。
//!
//! 未设置 `max_depth` 时没有深度与数量上限，整棵树会在内存中完整构建。

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::filesystem::{FileSystemError, Result, canonicalize_existing};

/// 默认忽略的名称。
pub const DEFAULT_IGNORE: &[&str] = &["node_modules", ".git"];

/// 条目类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

/// 目录树中的一个节点。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// 基本名称，不含分隔符。
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// 相对根目录的路径，始终使用 `/` 分隔。
    pub path: String,
    /// 仅目录存在；文件序列化时不输出该字段。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeEntry>>,
}

impl TreeEntry {
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
            path: path.into(),
            children: None,
        }
    }

    pub fn dir(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Dir,
            path: path.into(),
            children: Some(Vec::new()),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// 按名称精确匹配的忽略集合。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreSet {
    names: HashSet<String>,
}

impl IgnoreSet {
    /// 空集合，不忽略任何名称。
    pub fn empty() -> Self {
        Self {
            names: HashSet::new(),
        }
    }

    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// 在默认集合基础上追加名称。
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        set.names.extend(extra.into_iter().map(Into::into));
        set
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for IgnoreSet {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORE.iter().copied())
    }
}

/// 遍历选项。
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// 相对被遍历目录的最大深度，`None` 表示不限。
    /// 位于上限处的目录以空 `children` 输出。
    pub max_depth: Option<usize>,
    /// 是否跟随符号链接。跟随时循环会被检测并跳过；
    /// 不跟随时链接本身作为 `file` 叶子输出。
    /// 无论哪种模式，目标落在根目录之外或悬空的链接都会被跳过。
    pub follow_links: bool,
    pub ignore: IgnoreSet,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            follow_links: true,
            ignore: IgnoreSet::default(),
        }
    }
}

/// 目录树遍历器，所有输出路径都相对于 `root`。
#[derive(Debug, Clone)]
pub struct TreeWalker {
    root: PathBuf,
    options: WalkOptions,
}

impl TreeWalker {
    /// `root` 应当已经是规范化的绝对路径。
    pub fn new(root: PathBuf, options: WalkOptions) -> Self {
        Self { root, options }
    }

    /// 遍历 `directory`，返回其子条目组成的嵌套序列。
    ///
    /// `directory` 必须存在、是目录且位于根目录之内；相对路径按根目录解析。
    /// 兄弟条目的顺序即底层目录列举的顺序，不做排序。
    /// 解析到根目录之外（或无法解析）的符号链接会被跳过，不会进入其目标。
    pub fn walk(&self, directory: &Path) -> Result<Vec<TreeEntry>> {
        let directory = self.resolve_directory(directory)?;
        info!(path = %directory.display(), "Walking directory tree");

        let mut walker = WalkDir::new(&directory).follow_links(self.options.follow_links);
        if let Some(max_depth) = self.options.max_depth {
            walker = walker.max_depth(max_depth);
        }

        let ignore = &self.options.ignore;
        let mut iter = walker.into_iter().filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            !ignore.contains(&entry.file_name().to_string_lossy())
        });

        let mut builder = TreeBuilder::default();
        let mut skipped = 0usize;

        while let Some(item) = iter.next() {
            let entry = match item {
                Ok(entry) => entry,
                Err(err) => {
                    skipped += 1;
                    warn!(
                        path = ?err.path(),
                        loop_ancestor = ?err.loop_ancestor(),
                        error = %err,
                        "skipping unreadable entry"
                    );
                    continue;
                }
            };

            let depth = entry.depth();
            if depth == 0 {
                continue;
            }

            let is_dir = entry.file_type().is_dir();

            if entry.path_is_symlink() && !self.resolves_inside_root(entry.path()) {
                skipped += 1;
                warn!(path = %entry.path().display(), "skipping symlink resolving outside root");
                if is_dir {
                    iter.skip_current_dir();
                }
                continue;
            }

            let Some(path) = self.relative_path(entry.path()) else {
                skipped += 1;
                warn!(path = %entry.path().display(), "skipping entry outside root");
                if is_dir {
                    iter.skip_current_dir();
                }
                continue;
            };
            let name = entry.file_name().to_string_lossy().to_string();

            let node = if is_dir {
                TreeEntry::dir(name, path)
            } else {
                TreeEntry::file(name, path)
            };
            builder.push(depth, node);
        }

        let top = builder.finish();

        debug!(
            path = %directory.display(),
            top_level = top.len(),
            skipped,
            "Directory tree walk finished"
        );
        Ok(top)
    }

    fn resolve_directory(&self, directory: &Path) -> Result<PathBuf> {
        let display = directory.display().to_string();
        let candidate = if directory.is_absolute() {
            directory.to_path_buf()
        } else {
            self.root.join(directory)
        };

        let canonical = canonicalize_existing(&candidate, &display)?;

        if !canonical.starts_with(&self.root) {
            return Err(FileSystemError::OutsideRoot(display));
        }

        if !canonical.is_dir() {
            return Err(FileSystemError::NotADirectory(display));
        }

        Ok(canonical)
    }

    /// 符号链接的最终目标是否仍在根目录之内；悬空链接视为不在。
    fn resolves_inside_root(&self, path: &Path) -> bool {
        path.canonicalize()
            .map(|target| target.starts_with(&self.root))
            .unwrap_or(false)
    }

    /// 相对根目录的 `/` 分隔路径；不是根目录严格后代时返回 `None`。
    fn relative_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts = relative
            .components()
            .map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?;

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }
}

/// 把 walkdir 的扁平先序序列组装成嵌套结构。
#[derive(Debug, Default)]
struct TreeBuilder {
    top: Vec<TreeEntry>,
    // open[i] 是深度为 i + 1、尚未闭合的目录
    open: Vec<TreeEntry>,
}

impl TreeBuilder {
    /// 加入深度为 `depth`（从 1 开始）的条目，先闭合所有不再是其祖先的目录。
    fn push(&mut self, depth: usize, entry: TreeEntry) {
        self.close_until(depth.saturating_sub(1));
        if entry.is_dir() {
            self.open.push(entry);
        } else {
            self.attach(entry);
        }
    }

    fn finish(mut self) -> Vec<TreeEntry> {
        self.close_until(0);
        self.top
    }

    fn attach(&mut self, entry: TreeEntry) {
        match self.open.last_mut() {
            Some(parent) => parent.children.get_or_insert_with(Vec::new).push(entry),
            None => self.top.push(entry),
        }
    }

    fn close_until(&mut self, keep: usize) {
        while self.open.len() > keep {
            if let Some(done) = self.open.pop() {
                self.attach(done);
            }
        }
    }
}
