//! 订阅插件配置
//!
//! 支持从 TOML、JSON 字符串或文件加载：
//!
//! ```toml
//! subscribe_to = ["subscribe"]
//!
//! [[listeners]]
//! trigger = "force_update"
//! unsubscribe = "on_unmount"
//! ```

use infrastructure_common::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// 消费者侧方法名配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerConfig {
    /// 作为监听回调的方法名
    pub trigger: String,
    /// 需要挂接取消订阅的方法名
    pub unsubscribe: String,
}

impl ListenerConfig {
    /// 创建监听方法与取消订阅方法的配对
    pub fn new(trigger: impl Into<String>, unsubscribe: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            unsubscribe: unsubscribe.into(),
        }
    }
}

/// 订阅插件配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscribePluginConfig {
    /// 依赖侧候选订阅方法名，按顺序调用
    pub subscribe_to: Vec<String>,
    /// 消费者侧候选方法名，按优先级探测
    pub listeners: Vec<ListenerConfig>,
}

impl SubscribePluginConfig {
    pub fn new<I, S>(subscribe_to: I, listeners: Vec<ListenerConfig>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subscribe_to: subscribe_to.into_iter().map(Into::into).collect(),
            listeners,
        }
    }

    /// 从 TOML 字符串加载
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::parse_error)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 字符串加载
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(content).map_err(ConfigError::parse_error)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载，按扩展名选择格式
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        debug!("加载订阅插件配置: {}", path.display());
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }

    /// 校验方法名非空
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(index) = self.subscribe_to.iter().position(|name| name.trim().is_empty()) {
            return Err(ConfigError::validation_error(format!(
                "subscribe_to[{index}] 不能为空"
            )));
        }

        for (index, listener) in self.listeners.iter().enumerate() {
            if listener.trigger.trim().is_empty() || listener.unsubscribe.trim().is_empty() {
                return Err(ConfigError::validation_error(format!(
                    "listeners[{index}] 的方法名不能为空"
                )));
            }
        }

        Ok(())
    }
}
