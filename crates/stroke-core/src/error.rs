//! 错误定义模块

use thiserror::Error;

/// 预测客户端统一错误类型
#[derive(Error, Debug)]
pub enum StrokeError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("验证错误: {0}")]
    Validation(String),

    #[error("网络错误: {0}")]
    Network(String),

    #[error("HTTP错误 {status}: {message}")]
    Http { status: u16, message: String },

    #[error("响应解析错误: {0}")]
    Decode(String),

    #[error("请求超时: {0}")]
    Timeout(String),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("无效状态转换: 从 {from} 到 {event}")]
    InvalidStateTransition { from: String, event: String },

    #[error("系统内部错误: {0}")]
    Internal(String),
}

impl StrokeError {
    /// 返回HTTP状态码（仅在服务端给出响应时存在）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            StrokeError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 是否为表单验证失败
    pub fn is_validation(&self) -> bool {
        matches!(self, StrokeError::Validation(_))
    }
}

/// 预测客户端统一结果类型
pub type Result<T> = std::result::Result<T, StrokeError>;
