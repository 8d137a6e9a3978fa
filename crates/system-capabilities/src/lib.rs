//! System Capabilities - 文件系统检视能力模块。
//!
//! 该 crate 提供以固定根目录为界的只读文件系统能力：目录树遍历、
//! 单文件读取以及一个不会真正执行命令的终端桩，供 server 集成为 API 路由。

pub mod filesystem;
pub mod terminal;
pub mod tree;

pub use filesystem::{FileSystemCapabilities, FileSystemError, Result};
pub use terminal::TerminalStub;
pub use tree::{DEFAULT_IGNORE, EntryKind, IgnoreSet, TreeEntry, TreeWalker, WalkOptions};
