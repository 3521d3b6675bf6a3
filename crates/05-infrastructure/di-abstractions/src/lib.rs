//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义绑定键与解析钩子的核心接口。
//!
//! ## 核心接口
//!
//! - [`BindingKey`] - 按身份比较的绑定键
//! - [`ResolutionHook`] - 解析完成后的插件钩子
//! - [`Capabilities`] - 对象能力探测
//! - [`InjectFlags`] - 依赖声明处的标记

pub mod hook;
pub mod key;

pub use hook::*;
pub use key::*;
