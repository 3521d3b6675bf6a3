//! 解析钩子抽象接口
//!
//! 外部装饰层在解析出依赖之后调用 [`ResolutionHook`]，把消费者、
//! 依赖值、绑定键和声明标记交给插件做后续接线。钩子总是静默失败。
//!
//! 对象的能力通过 [`Capabilities`] 探测，基本类型不暴露任何能力。

use crate::key::BindingKey;
use std::fmt;
use std::rc::Rc;

/// 监听回调
pub type Listener = Rc<dyn Fn()>;

/// 取消订阅回调
pub type Unsubscribe = Rc<dyn Fn()>;

/// 依赖声明处附带的标记
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InjectFlag {
    /// 将消费者订阅到依赖
    Subscribe,
    /// 不在消费者上缓存依赖
    NoCache,
    /// 其他装饰层自定义标记
    Custom(String),
}

/// 标记集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectFlags {
    flags: Vec<InjectFlag>,
}

impl InjectFlags {
    /// 创建空标记集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加标记
    pub fn with(mut self, flag: InjectFlag) -> Self {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
        self
    }

    /// 是否包含标记
    pub fn contains(&self, flag: &InjectFlag) -> bool {
        self.flags.contains(flag)
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InjectFlag> {
        self.flags.iter()
    }
}

impl FromIterator<InjectFlag> for InjectFlags {
    fn from_iter<I: IntoIterator<Item = InjectFlag>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}

/// 订阅方法的调用结果
pub enum SubscribeOutcome {
    /// 依赖上没有该名称的订阅方法
    Missing,
    /// 已调用订阅方法，可能返回取消订阅回调
    Subscribed(Option<Unsubscribe>),
}

impl fmt::Debug for SubscribeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "Missing"),
            Self::Subscribed(unsubscribe) => f
                .debug_tuple("Subscribed")
                .field(&unsubscribe.as_ref().map(|_| "<function>"))
                .finish(),
        }
    }
}

/// 消费者侧能力：按名称暴露监听方法与取消订阅方法
pub trait Subscriber {
    /// 探测名为 `name` 的监听方法
    fn listener(&self, name: &str) -> Option<Listener>;

    /// 读取名为 `name` 的当前可调用方法
    fn method(&self, name: &str) -> Option<Unsubscribe>;

    /// 在 `name` 下安装可调用方法，覆盖已有方法
    fn install(&self, name: &str, method: Unsubscribe);
}

/// 依赖侧能力：按名称暴露订阅方法
pub trait Subscribable {
    /// 调用名为 `name` 的订阅方法
    fn subscribe(&self, name: &str, listener: Listener) -> SubscribeOutcome;
}

/// 能力探测
///
/// 默认不暴露任何能力。
pub trait Capabilities {
    fn as_subscriber(&self) -> Option<&dyn Subscriber> {
        None
    }

    fn as_subscribable(&self) -> Option<&dyn Subscribable> {
        None
    }
}

macro_rules! impl_no_capabilities {
    ($($ty:ty),* $(,)?) => {
        $(impl Capabilities for $ty {})*
    };
}

impl_no_capabilities!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String, &str, (),
);

/// 按优先级探测的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate<T> {
    /// 在第 `priority` 个候选名称处找到
    Found { priority: usize, value: T },
    /// 所有候选名称均未命中
    NotFound,
}

impl<T> Candidate<T> {
    /// 依次探测候选名称，返回第一个命中的结果
    pub fn probe<'a, I, F>(names: I, mut probe: F) -> Self
    where
        I: IntoIterator<Item = &'a str>,
        F: FnMut(&'a str) -> Option<T>,
    {
        names
            .into_iter()
            .enumerate()
            .find_map(|(priority, name)| probe(name).map(|value| Self::Found { priority, value }))
            .unwrap_or(Self::NotFound)
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

/// 解析钩子
pub trait ResolutionHook {
    /// 依赖解析完成后调用
    fn on_resolved(
        &self,
        consumer: Option<&dyn Capabilities>,
        dependency: Option<&dyn Capabilities>,
        key: &BindingKey,
        flags: &InjectFlags,
    );
}

impl<F> ResolutionHook for F
where
    F: Fn(Option<&dyn Capabilities>, Option<&dyn Capabilities>, &BindingKey, &InjectFlags),
{
    fn on_resolved(
        &self,
        consumer: Option<&dyn Capabilities>,
        dependency: Option<&dyn Capabilities>,
        key: &BindingKey,
        flags: &InjectFlags,
    ) {
        self(consumer, dependency, key, flags)
    }
}

/// 钩子链，按注册顺序依次调用
#[derive(Default)]
pub struct ResolutionHooks {
    hooks: Vec<Box<dyn ResolutionHook>>,
}

impl ResolutionHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册钩子
    pub fn register<H: ResolutionHook + 'static>(&mut self, hook: H) -> &mut Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// 通知所有钩子
    pub fn notify(
        &self,
        consumer: Option<&dyn Capabilities>,
        dependency: Option<&dyn Capabilities>,
        key: &BindingKey,
        flags: &InjectFlags,
    ) {
        for hook in &self.hooks {
            hook.on_resolved(consumer, dependency, key, flags);
        }
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl fmt::Debug for ResolutionHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionHooks")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
