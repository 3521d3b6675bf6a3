//! 组件生命周期定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 绑定的生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    /// 瞬时模式 - 每次解析都创建新实例
    #[default]
    Transient,
    /// 单例模式 - 每个发起解析的容器只创建一个实例
    Singleton,
}

impl Lifetime {
    /// 是否为单例
    pub fn is_singleton(self) -> bool {
        matches!(self, Self::Singleton)
    }
}

impl From<bool> for Lifetime {
    fn from(singleton: bool) -> Self {
        if singleton {
            Self::Singleton
        } else {
            Self::Transient
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transient => write!(f, "transient"),
            Self::Singleton => write!(f, "singleton"),
        }
    }
}
