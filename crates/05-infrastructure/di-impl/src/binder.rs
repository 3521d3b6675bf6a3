//! 流式绑定 API
//!
//! `container.bind::<T>(&key)?.to_factory(..).in_singleton_scope()`

use crate::container::Container;
use crate::registry::{DescriptorHandle, Instance, Producer, Provider};
use di_abstractions::BindingKey;
use infrastructure_common::{DependencyError, DependencyResult};
use std::marker::PhantomData;
use std::rc::Rc;
use tracing::debug;

/// 可构造类型
///
/// 容器构造实例时传入发起解析的容器。实例需要保存容器时保存
/// [`Container::downgrade`] 得到的弱句柄，强句柄会让单例与容器互相持有。
///
/// ```rust
/// use di_impl::{Container, Injectable, WeakContainer};
///
/// struct Service {
///     container: WeakContainer,
/// }
///
/// impl Injectable for Service {
///     fn inject(container: &Container) -> Self {
///         Self {
///             container: container.downgrade(),
///         }
///     }
/// }
/// ```
pub trait Injectable: Sized + 'static {
    /// 使用发起解析的容器构造实例
    fn inject(container: &Container) -> Self;
}

/// 绑定器，持有注册表中描述符的句柄
#[must_use = "绑定器不配置提供者时，解析该键会失败"]
pub struct Binder<T> {
    key: BindingKey,
    descriptor: DescriptorHandle,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> Binder<T> {
    pub(crate) fn new(key: BindingKey, descriptor: DescriptorHandle) -> Self {
        Self {
            key,
            descriptor,
            _marker: PhantomData,
        }
    }

    /// 绑定到可构造类型 `C`
    pub fn to<C>(self) -> BindingOptions<T>
    where
        C: Injectable,
        T: From<C>,
    {
        let produce: Producer =
            Rc::new(|container: &Container| -> Instance { Rc::new(T::from(C::inject(container))) });
        let type_name = std::any::type_name::<C>();
        debug!(key = %self.key, type_name, "绑定到可构造类型");

        self.set_provider(Provider::Constructible { type_name, produce })
    }

    /// 绑定到工厂函数
    pub fn to_factory<F>(self, factory: F) -> BindingOptions<T>
    where
        F: Fn(&Container) -> T + 'static,
    {
        let produce: Producer =
            Rc::new(move |container: &Container| -> Instance { Rc::new(factory(container)) });
        debug!(key = %self.key, "绑定到工厂函数");

        self.set_provider(Provider::Factory(produce))
    }

    /// 绑定到常量值
    ///
    /// 传入 `None` 返回 [`DependencyError::InvalidConstantValue`]，描述符保持未配置。
    pub fn to_value(self, value: impl Into<Option<T>>) -> DependencyResult<()> {
        let Some(value) = value.into() else {
            return Err(DependencyError::InvalidConstantValue {
                key: self.key.to_string(),
            });
        };

        debug!(key = %self.key, "绑定到常量值");
        self.descriptor.borrow_mut().provider = Provider::Constant(Rc::new(value));
        Ok(())
    }

    fn set_provider(self, provider: Provider) -> BindingOptions<T> {
        self.descriptor.borrow_mut().provider = provider;
        BindingOptions {
            key: self.key,
            descriptor: self.descriptor,
            _marker: PhantomData,
        }
    }
}

/// 作用域设置
pub struct BindingOptions<T> {
    key: BindingKey,
    descriptor: DescriptorHandle,
    _marker: PhantomData<fn() -> T>,
}

impl<T> BindingOptions<T> {
    /// 切换为单例作用域，原地修改同一描述符
    pub fn in_singleton_scope(self) {
        debug!(key = %self.key, "切换为单例作用域");
        self.descriptor.borrow_mut().singleton = true;
    }
}
