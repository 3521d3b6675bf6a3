//! 订阅插件
//!
//! 依赖声明带有 [`InjectFlag::Subscribe`] 且不带 [`InjectFlag::NoCache`] 时，
//! 把消费者的监听方法订阅到依赖上，并把返回的取消订阅回调挂接到消费者的
//! 取消订阅方法。任一前置条件不满足都静默跳过。

use crate::config::{ListenerConfig, SubscribePluginConfig};
use di_abstractions::{
    BindingKey, Candidate, Capabilities, InjectFlag, InjectFlags, ResolutionHook,
    SubscribeOutcome, Unsubscribe,
};
use infrastructure_common::ConfigResult;
use std::rc::Rc;
use tracing::trace;

/// 订阅插件
#[derive(Debug, Clone)]
pub struct SubscribePlugin {
    subscribe_to: Vec<String>,
    listeners: Vec<ListenerConfig>,
}

impl SubscribePlugin {
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

    /// 从配置创建，配置先经过校验
    pub fn from_config(config: SubscribePluginConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            subscribe_to: config.subscribe_to,
            listeners: config.listeners,
        })
    }

    /// 执行接线，返回 `None` 表示某个前置条件不满足
    fn wire(
        &self,
        consumer: Option<&dyn Capabilities>,
        dependency: Option<&dyn Capabilities>,
        flags: &InjectFlags,
    ) -> Option<()> {
        let subscriber = consumer?.as_subscriber()?;
        let subscribable = dependency?.as_subscribable()?;

        if !flags.contains(&InjectFlag::Subscribe) || flags.contains(&InjectFlag::NoCache) {
            return None;
        }

        let triggers = self.listeners.iter().map(|config| config.trigger.as_str());
        let (listener, unsubscribe_with) =
            match Candidate::probe(triggers, |trigger| subscriber.listener(trigger)) {
                Candidate::Found { priority, value } => {
                    (value, self.listeners[priority].unsubscribe.as_str())
                }
                Candidate::NotFound => return None,
            };

        // 每个存在的订阅方法都会被调用，保留最后一次调用的返回值
        let mut unsubscribe = None;
        for name in &self.subscribe_to {
            if let SubscribeOutcome::Subscribed(returned) = subscribable.subscribe(name, listener.clone()) {
                unsubscribe = returned;
            }
        }
        let unsubscribe = unsubscribe?;

        let installed = match subscriber.method(unsubscribe_with) {
            Some(existing) => {
                let chained: Unsubscribe = Rc::new(move || {
                    existing();
                    unsubscribe();
                });
                chained
            }
            None => unsubscribe,
        };
        subscriber.install(unsubscribe_with, installed);
        Some(())
    }
}

impl ResolutionHook for SubscribePlugin {
    fn on_resolved(
        &self,
        consumer: Option<&dyn Capabilities>,
        dependency: Option<&dyn Capabilities>,
        key: &BindingKey,
        flags: &InjectFlags,
    ) {
        match self.wire(consumer, dependency, flags) {
            Some(()) => trace!(key = %key, "已挂接订阅"),
            None => trace!(key = %key, "跳过订阅挂接"),
        }
    }
}
