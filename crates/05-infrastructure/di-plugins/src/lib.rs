//! # 容器插件
//!
//! 实现 [`di_abstractions::ResolutionHook`] 的插件。
//!
//! - [`SubscribePlugin`] - 把消费者订阅到解析出的依赖
//! - [`SubscribePluginConfig`] - 可从 TOML/JSON 加载的插件配置

pub mod config;
pub mod subscribe;

pub use config::{ListenerConfig, SubscribePluginConfig};
pub use subscribe::SubscribePlugin;
