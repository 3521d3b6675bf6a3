//! 绑定键
//!
//! 绑定键是按身份比较的不透明令牌：相同描述创建的两个键互不相等，
//! 除非通过 [`BindingKey::for_name`] 从全局驻留表获取。

use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use uuid::Uuid;

/// 全局驻留的绑定键
static INTERNED_KEYS: Lazy<DashMap<String, BindingKey>> = Lazy::new(DashMap::new);

/// 绑定键
#[derive(Clone)]
pub struct BindingKey {
    id: Uuid,
    description: Arc<str>,
}

impl BindingKey {
    /// 创建新的唯一绑定键
    pub fn new(description: impl AsRef<str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: Arc::from(description.as_ref()),
        }
    }

    /// 获取全局驻留的绑定键，同一描述总是返回相等的键
    pub fn for_name(description: impl AsRef<str>) -> Self {
        let description = description.as_ref();
        if let Some(key) = INTERNED_KEYS.get(description) {
            return key.value().clone();
        }
        INTERNED_KEYS
            .entry(description.to_string())
            .or_insert_with(|| Self::new(description))
            .value()
            .clone()
    }

    /// 键的描述
    pub fn description(&self) -> &str {
        &self.description
    }

    /// 键的唯一标识
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl PartialEq for BindingKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BindingKey {}

impl Hash for BindingKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description)
    }
}

impl fmt::Debug for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingKey")
            .field("description", &self.description)
            .field("id", &self.id)
            .finish()
    }
}
