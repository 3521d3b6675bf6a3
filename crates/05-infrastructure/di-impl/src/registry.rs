//! 绑定注册表
//!
//! 注册表保存 `BindingKey -> 绑定描述符句柄` 的有序映射。描述符通过
//! `Rc<RefCell<_>>` 共享，绑定器与注册表修改的是同一条记录；
//! 克隆注册表（快照）只复制句柄。

use crate::container::Container;
use di_abstractions::BindingKey;
use infrastructure_common::{DependencyError, DependencyResult, Lifetime};
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// 容器产出的实例
pub(crate) type Instance = Rc<dyn Any>;

/// 实例生产函数，参数为发起解析的容器
pub(crate) type Producer = Rc<dyn Fn(&Container) -> Instance>;

/// 绑定描述符句柄
pub(crate) type DescriptorHandle = Rc<RefCell<BindingDescriptor>>;

/// 提供者类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// 已声明但未配置
    Unset,
    /// 可构造类型
    Constructible,
    /// 工厂函数
    Factory,
    /// 常量值
    Constant,
}

/// 提供者
#[derive(Clone)]
pub(crate) enum Provider {
    Unset,
    Constructible {
        type_name: &'static str,
        produce: Producer,
    },
    Factory(Producer),
    Constant(Instance),
}

impl Provider {
    pub(crate) fn kind(&self) -> ProviderKind {
        match self {
            Self::Unset => ProviderKind::Unset,
            Self::Constructible { .. } => ProviderKind::Constructible,
            Self::Factory(_) => ProviderKind::Factory,
            Self::Constant(_) => ProviderKind::Constant,
        }
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(f, "Unset"),
            Self::Constructible { type_name, .. } => {
                f.debug_tuple("Constructible").field(type_name).finish()
            }
            Self::Factory(_) => write!(f, "Factory(<function>)"),
            Self::Constant(_) => write!(f, "Constant(<value>)"),
        }
    }
}

/// 绑定描述符
#[derive(Debug, Clone)]
pub(crate) struct BindingDescriptor {
    pub(crate) provider: Provider,
    pub(crate) singleton: bool,
}

impl BindingDescriptor {
    fn unset() -> Self {
        Self {
            provider: Provider::Unset,
            singleton: false,
        }
    }

    pub(crate) fn lifetime(&self) -> Lifetime {
        Lifetime::from(self.singleton)
    }
}

/// 有序绑定注册表
#[derive(Clone, Default)]
pub(crate) struct Registry {
    entries: HashMap<BindingKey, DescriptorHandle>,
    order: Vec<BindingKey>,
}

impl Registry {
    /// 为键保留一个未配置的描述符
    pub(crate) fn reserve(&mut self, key: &BindingKey) -> DependencyResult<DescriptorHandle> {
        if self.entries.contains_key(key) {
            return Err(DependencyError::DuplicateBinding {
                key: key.to_string(),
            });
        }

        let descriptor = Rc::new(RefCell::new(BindingDescriptor::unset()));
        self.entries.insert(key.clone(), descriptor.clone());
        self.order.push(key.clone());
        Ok(descriptor)
    }

    pub(crate) fn get(&self, key: &BindingKey) -> Option<DescriptorHandle> {
        self.entries.get(key).cloned()
    }

    pub(crate) fn contains(&self, key: &BindingKey) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn remove(&mut self, key: &BindingKey) -> Option<DescriptorHandle> {
        let removed = self.entries.remove(key)?;
        self.order.retain(|existing| existing != key);
        Some(removed)
    }

    /// 按插入顺序返回所有键
    pub(crate) fn keys(&self) -> Vec<BindingKey> {
        self.order.clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.order.iter().map(ToString::to_string)).finish()
    }
}
