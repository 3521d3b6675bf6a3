//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("不支持的配置格式: {path}")]
    UnsupportedFormat { path: String },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

impl ConfigError {
    /// 创建解析错误
    pub fn parse_error(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::ParseError {
            source: Box::new(source),
        }
    }

    /// 创建验证错误
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }
}

/// 依赖注入错误类型
///
/// `key` 字段保存绑定键的显示形式，例如 `Symbol(example)`。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    #[error("对象只能绑定一次: {key}")]
    DuplicateBinding { key: String },

    #[error("{key} 从未绑定，无法移除")]
    UnboundOnRemove { key: String },

    #[error("{key} 从未绑定，无法重新绑定")]
    UnboundOnRebind { key: String },

    #[error("没有任何绑定指向 {key}")]
    UnresolvableKey { key: String },

    #[error("{key} 已声明但未配置提供者")]
    UnconfiguredBinding { key: String },

    #[error("无法为 {key} 绑定空值")]
    InvalidConstantValue { key: String },

    #[error("类型不匹配: {key} 的值不是 {expected}")]
    TypeMismatch { key: String, expected: &'static str },
}

impl DependencyError {
    /// 获取出错的绑定键
    pub fn key(&self) -> &str {
        match self {
            Self::DuplicateBinding { key }
            | Self::UnboundOnRemove { key }
            | Self::UnboundOnRebind { key }
            | Self::UnresolvableKey { key }
            | Self::UnconfiguredBinding { key }
            | Self::InvalidConstantValue { key }
            | Self::TypeMismatch { key, .. } => key,
        }
    }
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("日志初始化失败: {message}")]
    LoggingInitFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
