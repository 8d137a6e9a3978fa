//! 终端桩。
//!
//! 只对少数命令返回固定文本，**从不**真正执行任何命令。
//! 若要支持真实执行，需要另行设计沙箱与隔离，不应在此处扩展。

use std::path::Path;

use tracing::debug;

/// `ls` 的固定输出。
pub const CANNED_LS_OUTPUT: &str = "index.ts\npackage.json\nignore.ts\ntest";

/// `whoami` 的固定输出。
pub const CANNED_USER: &str = "user";

#[derive(Debug, Clone)]
pub struct TerminalStub {
    cwd: String,
}

impl TerminalStub {
    /// `root` 作为 `pwd` 的输出。
    pub fn new(root: &Path) -> Self {
        Self {
            cwd: root.display().to_string(),
        }
    }

    /// 返回 `command` 对应的固定输出；命令按字面精确匹配。
    pub fn execute(&self, command: &str) -> String {
        debug!(command = %command, "terminal stub invoked");
        match command {
            "pwd" => self.cwd.clone(),
            "ls" => CANNED_LS_OUTPUT.to_string(),
            "whoami" => CANNED_USER.to_string(),
            other => format!("Command '{other}' executed successfully"),
        }
    }
}
