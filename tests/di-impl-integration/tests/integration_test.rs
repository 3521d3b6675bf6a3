//! Centralized integration tests for the IoC container
use di_abstractions::BindingKey;
use di_impl::{Container, Injectable, ProviderKind, WeakContainer};
use infrastructure_common::{DependencyError, Lifetime};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("trace")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// 计数工厂
fn counting_factory(prefix: &'static str) -> (Rc<Cell<u32>>, impl Fn(&Container) -> String) {
    let count = Rc::new(Cell::new(0));
    let counter = count.clone();
    let factory = move |_: &Container| {
        counter.set(counter.get() + 1);
        format!("{prefix} {}", counter.get())
    };
    (count, factory)
}

/// 测试服务
trait Greeter {
    fn greet(&self) -> String;
}

struct EnglishGreeter {
    container: WeakContainer,
}

impl Greeter for EnglishGreeter {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

impl Injectable for EnglishGreeter {
    fn inject(container: &Container) -> Self {
        Self {
            container: container.downgrade(),
        }
    }
}

impl From<EnglishGreeter> for Box<dyn Greeter> {
    fn from(greeter: EnglishGreeter) -> Self {
        Box::new(greeter)
    }
}

#[test]
fn test_transient_factory_scenario() {
    init_test_logger();
    let container = Container::new();
    let key = BindingKey::for_name("integration-transient");
    let (count, factory) = counting_factory("hello");
    container.bind::<String>(&key).unwrap().to_factory(factory);

    let values: Vec<String> = (0..3)
        .map(|_| container.get::<String>(&key).unwrap().as_str().to_owned())
        .collect();
    assert_eq!(values, ["hello 1", "hello 2", "hello 3"]);
    assert_eq!(count.get(), 3);
}

#[test]
fn test_singleton_factory_scenario() {
    init_test_logger();
    let container = Container::new();
    let key = BindingKey::new("singleton");
    let (count, factory) = counting_factory("hello");
    container
        .bind::<String>(&key)
        .unwrap()
        .to_factory(factory)
        .in_singleton_scope();

    for _ in 0..3 {
        assert_eq!(*container.get::<String>(&key).unwrap(), "hello 1");
    }
    assert_eq!(count.get(), 1);
}

#[test]
fn test_child_scenario_with_parent_singleton() {
    init_test_logger();
    let parent = Container::new();
    let child = parent.create_child();
    let key = BindingKey::new("parent");
    let (count, factory) = counting_factory("Binding from parent container");
    parent
        .bind::<String>(&key)
        .unwrap()
        .to_factory(factory)
        .in_singleton_scope();

    let child_first = child.get::<String>(&key).unwrap();
    let child_second = child.get::<String>(&key).unwrap();
    let parent_first = parent.get::<String>(&key).unwrap();
    let parent_second = parent.get::<String>(&key).unwrap();

    assert!(Rc::ptr_eq(&child_first, &child_second));
    assert!(!Rc::ptr_eq(&child_first, &parent_first));
    assert!(Rc::ptr_eq(&parent_first, &parent_second));
    assert_eq!(count.get(), 2);
}

#[test]
fn test_two_children_cache_independently() {
    init_test_logger();
    let parent = Container::new();
    let left = parent.create_child();
    let right = parent.create_child();
    let grandchild = left.create_child();
    let key = BindingKey::new("shared");
    let (count, factory) = counting_factory("instance");
    parent
        .bind::<String>(&key)
        .unwrap()
        .to_factory(factory)
        .in_singleton_scope();

    assert_eq!(*left.get::<String>(&key).unwrap(), "instance 1");
    assert_eq!(*right.get::<String>(&key).unwrap(), "instance 2");
    assert_eq!(*grandchild.get::<String>(&key).unwrap(), "instance 3");
    assert_eq!(*left.get::<String>(&key).unwrap(), "instance 1");
    assert_eq!(count.get(), 3);
    assert!(!parent.is_cached(&key));
}

#[test]
fn test_child_binding_shadows_parent() {
    init_test_logger();
    let parent = Container::new();
    let child = parent.create_child();
    let key = BindingKey::new("shadowed");
    let counter = Rc::new(Cell::new(0));

    let parent_counter = counter.clone();
    parent.bind::<String>(&key).unwrap().to_factory(move |_| {
        parent_counter.set(parent_counter.get() + 1);
        format!("Binding from parent container {}", parent_counter.get())
    });
    let child_counter = counter.clone();
    child.bind::<String>(&key).unwrap().to_factory(move |_| {
        child_counter.set(child_counter.get() + 1);
        format!("Binding from child container {}", child_counter.get())
    });

    assert_eq!(*child.get::<String>(&key).unwrap(), "Binding from child container 1");
    assert_eq!(*child.get::<String>(&key).unwrap(), "Binding from child container 2");
    assert_eq!(*parent.get::<String>(&key).unwrap(), "Binding from parent container 3");
}

#[test]
fn test_constructible_from_parent_sees_child_container() {
    init_test_logger();
    let parent = Container::new();
    let child = parent.create_child();
    let greeter_key = BindingKey::new("greeter");
    let concrete_key = BindingKey::new("english-greeter");
    parent
        .bind::<Box<dyn Greeter>>(&greeter_key)
        .unwrap()
        .to::<EnglishGreeter>();
    parent
        .bind::<EnglishGreeter>(&concrete_key)
        .unwrap()
        .to::<EnglishGreeter>();

    let greeter = child.get::<Box<dyn Greeter>>(&greeter_key).unwrap();
    assert_eq!(greeter.greet(), "hello");
    assert_eq!(
        parent.provider_kind(&greeter_key),
        Some(ProviderKind::Constructible)
    );

    let concrete = child.get::<EnglishGreeter>(&concrete_key).unwrap();
    let owner = concrete.container.upgrade().unwrap();
    assert!(owner.ptr_eq(&child));
    assert!(!owner.ptr_eq(&parent));
}

#[test]
fn test_constant_from_parent() {
    init_test_logger();
    let parent = Container::new();
    let child = parent.create_child();
    let key = BindingKey::new("constant");
    parent
        .bind::<String>(&key)
        .unwrap()
        .to_value("Binding from parent container".to_string())
        .unwrap();

    assert_eq!(*child.get::<String>(&key).unwrap(), "Binding from parent container");
    assert_eq!(parent.lifetime_of(&key), Some(Lifetime::Transient));
}

#[test]
fn test_unlinked_child_no_longer_delegates() {
    init_test_logger();
    let parent = Container::new();
    let child = parent.create_child();
    let key = BindingKey::new("linked");
    parent.bind::<u8>(&key).unwrap().to_value(1).unwrap();
    assert_eq!(*child.get::<u8>(&key).unwrap(), 1);

    child.remove_parent();
    assert!(matches!(
        child.get::<u8>(&key),
        Err(DependencyError::UnresolvableKey { .. })
    ));
}

#[test]
fn test_create_parent_links_caller() {
    init_test_logger();
    let container = Container::new();
    let parent = container.create_parent();
    let key = BindingKey::new("from-created-parent");
    parent.bind::<i32>(&key).unwrap().to_value(-1).unwrap();

    assert_eq!(container.get_parent(), Some(parent));
    assert_eq!(*container.get::<i32>(&key).unwrap(), -1);
}

#[test]
fn test_unconfigured_binding_in_parent_is_distinct_error() {
    init_test_logger();
    let parent = Container::new();
    let child = parent.create_child();
    let key = BindingKey::new("reserved");
    let _ = parent.bind::<String>(&key).unwrap();

    let err = child.get::<String>(&key).unwrap_err();
    assert_eq!(
        err,
        DependencyError::UnconfiguredBinding {
            key: "Symbol(reserved)".to_string()
        }
    );
    assert!(matches!(
        child.remove(&key),
        Err(DependencyError::UnboundOnRemove { .. })
    ));
    assert!(matches!(
        child.rebind::<String>(&key),
        Err(DependencyError::UnboundOnRebind { .. })
    ));
}

#[test]
fn test_parent_singleton_holding_weak_handle_is_freed() {
    init_test_logger();
    let key = BindingKey::new("greeter-singleton");
    let handle = {
        let parent = Container::new();
        let child = parent.create_child();
        parent
            .bind::<EnglishGreeter>(&key)
            .unwrap()
            .to::<EnglishGreeter>()
            .in_singleton_scope();
        parent.get::<EnglishGreeter>(&key).unwrap();
        child.get::<EnglishGreeter>(&key).unwrap();
        parent.downgrade()
    };

    assert!(handle.upgrade().is_none());
}

#[test]
fn test_snapshot_then_mutations_then_restore() {
    init_test_logger();
    let container = Container::new();
    let kept = BindingKey::new("kept");
    let added = BindingKey::new("added");
    container.bind::<u32>(&kept).unwrap().to_value(1).unwrap();
    let before = container.bound_keys();

    container.snapshot();
    container.bind::<u32>(&added).unwrap().to_value(2).unwrap();
    container.snapshot();
    container.remove(&kept).unwrap();
    container.snapshot();
    container.rebind::<u32>(&added).unwrap().to_value(3).unwrap();

    container.restore().restore().restore();
    assert_eq!(container.bound_keys(), before);
    assert_eq!(*container.get::<u32>(&kept).unwrap(), 1);

    container.restore();
    assert_eq!(container.bound_keys(), before);
}
