//! IoC 容器
//!
//! 容器由注册表、单例缓存、快照栈和可选的父容器句柄组成。
//!
//! 解析时先查本容器的注册表，未命中则沿父容器链向上查找；找到描述符后，
//! 生产函数总是收到最初调用 `get` 的容器，单例缓存也总是读写该容器。
//! 因此同一个父容器中的单例绑定，从不同容器解析会得到各自独立的实例。
//!
//! 容器基于 `Rc`/`RefCell`，不是 `Send`/`Sync`。

use crate::binder::Binder;
use crate::registry::{Instance, Provider, ProviderKind, Registry};
use di_abstractions::BindingKey;
use infrastructure_common::{DependencyError, DependencyResult, Lifetime};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};
use uuid::Uuid;

struct ContainerInner {
    id: Uuid,
    registry: RefCell<Registry>,
    snapshots: RefCell<Vec<Registry>>,
    cache: RefCell<HashMap<BindingKey, Instance>>,
    parent: RefCell<Option<Container>>,
}

/// IoC 容器句柄
///
/// 克隆句柄不会复制容器，两个句柄指向同一实例时相等。
#[derive(Clone)]
pub struct Container {
    inner: Rc<ContainerInner>,
}

impl Container {
    /// 创建空容器
    pub fn new() -> Self {
        let container = Self {
            inner: Rc::new(ContainerInner {
                id: Uuid::new_v4(),
                registry: RefCell::new(Registry::default()),
                snapshots: RefCell::new(Vec::new()),
                cache: RefCell::new(HashMap::new()),
                parent: RefCell::new(None),
            }),
        };
        trace!(container = %container.id(), "创建容器");
        container
    }

    /// 容器标识，用于日志
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// 是否为同一个容器实例
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// 创建不持有所有权的句柄
    ///
    /// 被缓存的单例若保存强句柄，会与容器的缓存形成引用环，容器永远不会释放。
    /// 需要保存注入容器的实例应保存 [`WeakContainer`]。
    pub fn downgrade(&self) -> WeakContainer {
        WeakContainer {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// 声明绑定
    pub fn bind<T: 'static>(&self, key: &BindingKey) -> DependencyResult<Binder<T>> {
        let descriptor = self.inner.registry.borrow_mut().reserve(key)?;
        debug!(container = %self.id(), key = %key, "声明绑定");
        Ok(Binder::new(key.clone(), descriptor))
    }

    /// 移除后重新声明绑定
    pub fn rebind<T: 'static>(&self, key: &BindingKey) -> DependencyResult<Binder<T>> {
        self.remove(key).map_err(|err| match err {
            DependencyError::UnboundOnRemove { key } => DependencyError::UnboundOnRebind { key },
            other => other,
        })?;
        self.bind(key)
    }

    /// 移除绑定及本容器中的缓存实例
    pub fn remove(&self, key: &BindingKey) -> DependencyResult<&Self> {
        if self.inner.registry.borrow_mut().remove(key).is_none() {
            return Err(DependencyError::UnboundOnRemove {
                key: key.to_string(),
            });
        }

        self.inner.cache.borrow_mut().remove(key);
        debug!(container = %self.id(), key = %key, "移除绑定");
        Ok(self)
    }

    /// 解析绑定
    pub fn get<T: 'static>(&self, key: &BindingKey) -> DependencyResult<Rc<T>> {
        self.resolve(key, self)?
            .downcast::<T>()
            .map_err(|_| DependencyError::TypeMismatch {
                key: key.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    fn resolve(&self, key: &BindingKey, origin: &Container) -> DependencyResult<Instance> {
        let descriptor = self.inner.registry.borrow().get(key);
        let Some(descriptor) = descriptor else {
            return match self.get_parent() {
                Some(parent) => {
                    trace!(container = %self.id(), parent = %parent.id(), key = %key, "委托父容器解析");
                    parent.resolve(key, origin)
                }
                None => Err(DependencyError::UnresolvableKey {
                    key: key.to_string(),
                }),
            };
        };

        let (provider, singleton) = {
            let descriptor = descriptor.borrow();
            (descriptor.provider.clone(), descriptor.singleton)
        };

        let produce = match provider {
            Provider::Unset => {
                return Err(DependencyError::UnconfiguredBinding {
                    key: key.to_string(),
                })
            }
            Provider::Constant(value) => return Ok(value),
            Provider::Constructible { produce, .. } | Provider::Factory(produce) => produce,
        };

        if !singleton {
            trace!(container = %origin.id(), key = %key, "创建瞬时实例");
            return Ok(produce(origin));
        }

        if let Some(cached) = origin.cached(key) {
            trace!(container = %origin.id(), key = %key, "命中单例缓存");
            return Ok(cached);
        }

        trace!(container = %origin.id(), key = %key, "创建单例实例");
        let instance = produce(origin);
        origin
            .inner
            .cache
            .borrow_mut()
            .insert(key.clone(), instance.clone());
        Ok(instance)
    }

    fn cached(&self, key: &BindingKey) -> Option<Instance> {
        self.inner.cache.borrow().get(key).cloned()
    }

    /// 保存当前注册表的浅拷贝
    pub fn snapshot(&self) -> &Self {
        let copy = self.inner.registry.borrow().clone();
        let mut snapshots = self.inner.snapshots.borrow_mut();
        snapshots.push(copy);
        debug!(container = %self.id(), depth = snapshots.len(), "保存注册表快照");
        self
    }

    /// 恢复最近一次快照，快照栈为空时保持当前注册表
    ///
    /// 单例缓存不受影响。
    pub fn restore(&self) -> &Self {
        let snapshot = self.inner.snapshots.borrow_mut().pop();
        match snapshot {
            Some(registry) => {
                *self.inner.registry.borrow_mut() = registry;
                debug!(container = %self.id(), depth = self.snapshot_depth(), "恢复注册表快照");
            }
            None => debug!(container = %self.id(), "快照栈为空，保留当前注册表"),
        }
        self
    }

    /// 快照栈深度
    pub fn snapshot_depth(&self) -> usize {
        self.inner.snapshots.borrow().len()
    }

    /// 创建子容器
    pub fn create_child(&self) -> Container {
        let child = Container::new();
        *child.inner.parent.borrow_mut() = Some(self.clone());
        debug!(container = %self.id(), child = %child.id(), "创建子容器");
        child
    }

    /// 创建父容器，并把当前容器的父容器替换为它
    pub fn create_parent(&self) -> Container {
        let parent = Container::new();
        *self.inner.parent.borrow_mut() = Some(parent.clone());
        debug!(container = %self.id(), parent = %parent.id(), "创建父容器");
        parent
    }

    /// 当前父容器
    pub fn get_parent(&self) -> Option<Container> {
        self.inner.parent.borrow().clone()
    }

    /// 断开与父容器的链接
    pub fn remove_parent(&self) -> &Self {
        self.inner.parent.borrow_mut().take();
        debug!(container = %self.id(), "断开父容器");
        self
    }

    /// 本容器是否声明了该键，不查父容器
    pub fn is_bound(&self, key: &BindingKey) -> bool {
        self.inner.registry.borrow().contains(key)
    }

    /// 本容器声明的所有键，按声明顺序
    pub fn bound_keys(&self) -> Vec<BindingKey> {
        self.inner.registry.borrow().keys()
    }

    /// 本容器中该键的提供者类型，不查父容器
    pub fn provider_kind(&self, key: &BindingKey) -> Option<ProviderKind> {
        let descriptor = self.inner.registry.borrow().get(key)?;
        let kind = descriptor.borrow().provider.kind();
        Some(kind)
    }

    /// 本容器中该键的生命周期，不查父容器
    pub fn lifetime_of(&self, key: &BindingKey) -> Option<Lifetime> {
        let descriptor = self.inner.registry.borrow().get(key)?;
        let lifetime = descriptor.borrow().lifetime();
        Some(lifetime)
    }

    /// 本容器是否缓存了该键的单例实例
    pub fn is_cached(&self, key: &BindingKey) -> bool {
        self.inner.cache.borrow().contains_key(key)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Container {}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("id", &self.inner.id)
            .field("registry", &*self.inner.registry.borrow())
            .field("snapshots", &self.snapshot_depth())
            .field("cached", &self.inner.cache.borrow().len())
            .field("parent", &self.get_parent().map(|parent| parent.id()))
            .finish()
    }
}

/// 不持有所有权的容器句柄
#[derive(Clone)]
pub struct WeakContainer {
    inner: Weak<ContainerInner>,
}

impl WeakContainer {
    /// 容器仍存活时返回强句柄
    pub fn upgrade(&self) -> Option<Container> {
        self.inner.upgrade().map(|inner| Container { inner })
    }
}

impl fmt::Debug for WeakContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakContainer")
            .field("id", &self.upgrade().map(|container| container.id()))
            .finish()
    }
}
