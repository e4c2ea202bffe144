//! 错误定义模块

use thiserror::Error;

/// 诊断系统统一错误类型
#[derive(Error, Debug)]
pub enum DermaError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("校验错误: {0}")]
    Validation(String),

    #[error("网关错误: {0}")]
    Gateway(String),

    #[error("网络错误: {0}")]
    Network(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("系统内部错误: {0}")]
    Internal(String),
}

/// 诊断系统统一结果类型
pub type Result<T> = std::result::Result<T, DermaError>;
