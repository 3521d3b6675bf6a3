//! # 依赖注入具体实现
//!
//! 提供 IoC 容器、流式绑定器和绑定注册表实现。
//!
//! 单例实例如需保存注入的容器，应保存 [`WeakContainer`]。
//!
//! ```rust
//! use di_abstractions::BindingKey;
//! use di_impl::{Container, Injectable, WeakContainer};
//!
//! struct Greeter {
//!     container: WeakContainer,
//! }
//!
//! impl Injectable for Greeter {
//!     fn inject(container: &Container) -> Self {
//!         Self {
//!             container: container.downgrade(),
//!         }
//!     }
//! }
//!
//! let container = Container::new();
//! let greeting = BindingKey::new("greeting");
//! let greeter = BindingKey::new("greeter");
//! container
//!     .bind::<String>(&greeting)?
//!     .to_factory(|_| "hello world".to_string())
//!     .in_singleton_scope();
//! container.bind::<Greeter>(&greeter)?.to::<Greeter>().in_singleton_scope();
//!
//! let child = container.create_child();
//! assert_eq!(*child.get::<String>(&greeting)?, "hello world");
//! let resolved = child.get::<Greeter>(&greeter)?;
//! assert!(resolved.container.upgrade().is_some_and(|owner| owner.ptr_eq(&child)));
//! # Ok::<(), infrastructure_common::DependencyError>(())
//! ```

pub mod binder;
pub mod container;
mod registry;

pub use binder::{Binder, BindingOptions, Injectable};
pub use container::{Container, WeakContainer};
pub use registry::ProviderKind;
