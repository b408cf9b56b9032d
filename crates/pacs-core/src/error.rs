//! 错误定义模块

use thiserror::Error;

/// PACS工作列表统一错误类型
#[derive(Error, Debug)]
pub enum PacsError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("验证错误: {0}")]
    Validation(String),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("剪贴板错误: {0}")]
    Clipboard(String),

    #[error("导航错误: {0}")]
    Navigation(String),

    #[error("更新服务错误: {0}")]
    Update(String),

    #[error("资源未找到: {0}")]
    NotFound(String),
}

/// PACS工作列表统一结果类型
pub type Result<T> = std::result::Result<T, PacsError>;
