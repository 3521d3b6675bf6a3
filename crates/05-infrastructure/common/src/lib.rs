//! # Infrastructure Common
//!
//! 这个 crate 提供了 IoC 容器工作区的公共类型。
//!
//! ## 核心组件
//!
//! - [`DependencyError`] - 依赖注入错误
//! - [`ConfigError`] - 配置加载错误
//! - [`Lifetime`] - 绑定生命周期
//! - [`LoggingConfig`] - 日志配置

pub mod errors;
pub mod lifecycle;
pub mod logging;

pub use errors::*;
pub use lifecycle::*;
pub use logging::*;
