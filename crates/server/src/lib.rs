//! fs-agent server: 以 HTTP 暴露本地文件系统的只读检视接口。

pub mod api;
pub mod config;
