//! 统一错误处理模块
//!
//! 定义内容拦截器各组件共享的错误类型，使用 thiserror 提供良好的错误信息。
//! 规则组匹配核心本身不产生错误，这里的错误只来自配置与定义文件的读取。

use thiserror::Error;

/// 系统错误类型
#[derive(Debug, Error)]
pub enum BlockerError {
    // ==================== 配置错误 ====================
    #[error("配置加载失败: {0}")]
    Config(#[from] config::ConfigError),

    // ==================== 文件错误 ====================
    #[error("文件读取失败: {path} - {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),

    // ==================== 验证错误 ====================
    #[error("无效的参数: {field} - {message}")]
    InvalidArgument { field: String, message: String },
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, BlockerError>;

impl BlockerError {
    /// 包装带路径信息的 IO 错误
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Io { .. } => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
        }
    }
}
