use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 题库相关错误
    #[error("题库错误: {0}")]
    Bank(#[from] BankError),
    /// 文档存储错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// 题库相关错误
#[derive(Debug, Error)]
pub enum BankError {
    /// 拉取题库资源失败
    #[error("无法获取题库资源 ({location}): {source}")]
    FetchFailed {
        location: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 文档存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 目标文档不存在
    #[error("文档不存在: {collection}/{id}")]
    NotFound { collection: String, id: String },
    /// 写入失败
    #[error("存储写入失败: {0}")]
    WriteFailed(String),
    /// 读取失败
    #[error("存储读取失败: {0}")]
    ReadFailed(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 正则表达式不合法
    #[error("正则表达式不合法 ({pattern}): {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建配置正则错误
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        AppError::Config(ConfigError::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.to_string(),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
