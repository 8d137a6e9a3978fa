//! 统一的应用状态。

use system_capabilities::{FileSystemCapabilities, TerminalStub};

/// 统一的应用状态，所有请求共享且只读。
#[derive(Debug, Clone)]
pub struct AppState {
    /// 以根目录为界的文件系统能力。
    pub filesystem: FileSystemCapabilities,
    /// 终端桩，`pwd` 输出根目录。
    pub terminal: TerminalStub,
}

impl AppState {
    /// 创建新的应用状态。
    pub fn new(filesystem: FileSystemCapabilities) -> Self {
        let terminal = TerminalStub::new(filesystem.root());
        Self {
            filesystem,
            terminal,
        }
    }
}
