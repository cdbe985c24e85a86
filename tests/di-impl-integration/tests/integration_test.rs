//! 依赖注入容器的集中集成测试

use di_abstractions::{
    Component, DependsOn, ElementOptions, Elements, Group, Injectable, Injection, Instance, Selectors, TargetFn,
};
use di_impl::Container;
use infrastructure_common::{
    ComponentOptions, ContainerOptions, DependencyError, InjectionMode, Lifetime, ResolutionFailure,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// 测试组件
#[derive(Debug)]
struct Greeter {
    name: Arc<String>,
}

impl Injectable for Greeter {
    fn inject(deps: &Injection<'_>) -> Result<Self, DependencyError> {
        Ok(Self {
            name: deps.get::<String>("name")?,
        })
    }
}

impl Greeter {
    fn greet(&self) -> String {
        format!("你好, {}", self.name)
    }
}

fn product(deps: &Injection<'_>) -> Result<i32, DependencyError> {
    Ok(*deps.get::<i32>("left")? * *deps.get::<i32>("right")?)
}

/// 解析 `next` 并忽略结果
fn forward(next: &'static str) -> Component {
    Component::function(move |deps: &Injection<'_>| {
        deps.instance(next)?;
        Ok(())
    })
    .depends_on(next)
}

fn counting(counter: &Arc<AtomicUsize>) -> Component {
    let counter = Arc::clone(counter);
    Component::function(move |_deps: &Injection<'_>| Ok(counter.fetch_add(1, Ordering::SeqCst)))
}

fn proxy_container() -> Container {
    Container::new(ContainerOptions::new().with_injection_mode(InjectionMode::Proxy))
}

#[test]
fn test_result_does_not_depend_on_sibling_order() -> anyhow::Result<()> {
    let container = Container::default();
    container.register(
        &Elements::new()
            .with("left", Component::value(6_i32))
            .with("right", Component::value(7_i32))
            .with("lr", Component::function(product).depends_on(["left", "right"]))
            .with("rl", Component::function(product).depends_on(["right", "left"])),
    )?;

    assert_eq!(*container.get::<i32>("lr")?, 42);
    assert_eq!(*container.get::<i32>("rl")?, 42);
    Ok(())
}

#[test]
fn test_singleton_identity_and_transient_distinctness() -> anyhow::Result<()> {
    let container = Container::default();
    container.register(
        &Elements::new()
            .with(
                "single",
                Component::function(|_deps: &Injection<'_>| Ok(String::from("single"))).singleton(),
            )
            .with(
                "fresh",
                Component::function(|_deps: &Injection<'_>| Ok(String::from("fresh"))).transient(),
            ),
    )?;

    let first = container.get::<String>("single")?;
    let second = container.get::<String>("single")?;
    assert!(Arc::ptr_eq(&first, &second));

    let first = container.get::<String>("fresh")?;
    let second = container.get::<String>("fresh")?;
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_cyclic_dependency_reports_cycle_path() -> anyhow::Result<()> {
    let container = Container::default();
    container.register(
        &Elements::new()
            .with("A", forward("B"))
            .with("B", forward("C"))
            .with("C", forward("B")),
    )?;

    let err = container.resolve("A").unwrap_err();
    let resolution = err.as_resolution().expect("应为解析错误");
    assert_eq!(resolution.reason, ResolutionFailure::CyclicDependency);
    assert_eq!(resolution.trace_string(), "A -> B -> C -> B");
    assert!(err.to_string().contains("A -> B -> C -> B"));
    assert!(container.resolution_stack().is_empty());
    Ok(())
}

#[test]
fn test_missing_dependency_reports_resolution_path() -> anyhow::Result<()> {
    let container = Container::default();
    container.register(
        &Elements::new()
            .with("A", forward("B"))
            .with("B", forward("C"))
            .with("C", forward("ghost")),
    )?;

    let err = container.resolve("A").unwrap_err();
    let resolution = err.as_resolution().expect("应为解析错误");
    assert_eq!(resolution.reason, ResolutionFailure::NotRegistered);
    assert_eq!(resolution.path, "ghost");
    assert!(resolution.trace_string().contains("A -> B -> C"));
    assert!(container.resolution_stack().is_empty());

    container.register(&Elements::new().with("ghost", Component::value(())))?;
    container.resolve("A")?;
    assert!(container.resolution_stack().is_empty());
    Ok(())
}

#[test]
fn test_unregistered_top_level_path() {
    let container = Container::default();
    let err = container.resolve("nope").unwrap_err();
    let resolution = err.as_resolution().expect("应为解析错误");
    assert_eq!(resolution.trace, vec!["nope".to_string()]);
    assert_eq!(resolution.reason, ResolutionFailure::NotRegistered);
}

#[test]
fn test_undeclared_dependency_trace_includes_stack() -> anyhow::Result<()> {
    let container = Container::default();
    container.register(
        &Elements::new()
            .with("x", Component::value(1_i32))
            .with("a", Component::function(|deps: &Injection<'_>| Ok(*deps.get::<i32>("x")?)))
            .with("b", Component::function(|deps: &Injection<'_>| Ok(*deps.get::<i32>("x")?)))
            .with("top", forward("b")),
    )?;

    let err = container.resolve("a").unwrap_err();
    let resolution = err.as_resolution().expect("应为解析错误");
    assert_eq!(resolution.reason, ResolutionFailure::NotInjected);
    assert_eq!(resolution.path, "x");
    assert_eq!(resolution.trace_string(), "a -> x");

    let err = container.resolve("top").unwrap_err();
    let resolution = err.as_resolution().expect("应为解析错误");
    assert_eq!(resolution.trace_string(), "top -> b -> x");
    assert!(err.to_string().contains("top -> b -> x"));
    assert!(container.resolution_stack().is_empty());
    Ok(())
}

#[test]
fn test_group_options_inheritance() -> anyhow::Result<()> {
    let created = Arc::new(AtomicUsize::new(0));
    let container = Container::default();
    container.register(
        &Elements::new().with(
            "outer",
            Group::default()
                .with("inner", Group::default().with("leaf", counting(&created)).transient())
                .with("direct", counting(&created))
                .singleton(),
        ),
    )?;

    let lifetime = |path: &str| container.registration(path).map(|r| r.lifetime);
    assert_eq!(lifetime("outer.inner.leaf"), Some(Lifetime::Transient));
    assert_eq!(lifetime("outer.direct"), Some(Lifetime::Singleton));

    assert_ne!(*container.get::<usize>("outer.inner.leaf")?, *container.get::<usize>("outer.inner.leaf")?);
    assert_eq!(*container.get::<usize>("outer.direct")?, *container.get::<usize>("outer.direct")?);
    Ok(())
}

#[test]
fn test_group_options_reach_two_levels_down() -> anyhow::Result<()> {
    let created = Arc::new(AtomicUsize::new(0));
    let container = Container::default();
    container.register(
        &Elements::new().with(
            "outer",
            Group::default()
                .with("inner", Group::default().with("leaf", counting(&created)))
                .singleton(),
        ),
    )?;

    let leaf = container.registration("outer.inner.leaf").expect("leaf 应已注册");
    assert_eq!(leaf.lifetime, Lifetime::Singleton);

    let first = container.resolve("outer.inner.leaf")?;
    let second = container.resolve("outer.inner.leaf")?;
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(created.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn test_container_defaults_and_call_options() -> anyhow::Result<()> {
    let container = Container::new(ContainerOptions::new().with_lifetime(Lifetime::Singleton));
    container
        .register(&Elements::new().with("by_default", Component::value(1_i32)))?
        .register_with(
            &Elements::new()
                .with("by_call", Component::value(2_i32))
                .with("by_component", Component::value(3_i32).singleton()),
            &ComponentOptions::new().with_lifetime(Lifetime::Transient),
        )?;

    let lifetime = |path: &str| container.registration(path).map(|r| r.lifetime);
    assert_eq!(lifetime("by_default"), Some(Lifetime::Singleton));
    assert_eq!(lifetime("by_call"), Some(Lifetime::Transient));
    assert_eq!(lifetime("by_component"), Some(Lifetime::Singleton));
    Ok(())
}

#[test]
fn test_selector_callback_runs_once() -> anyhow::Result<()> {
    let calls = Arc::new(AtomicUsize::new(0));
    let saw_self = Arc::new(AtomicBool::new(false));
    let (counter, self_flag) = (Arc::clone(&calls), Arc::clone(&saw_self));

    let container = Container::default();
    container.register(
        &Elements::new()
            .with(
                "numbers",
                Group::default()
                    .with("first", Component::value(100_i32))
                    .with("second", Component::value(128_i32)),
            )
            .with(
                "sum",
                Component::function(|deps: &Injection<'_>| {
                    Ok(*deps.get::<i32>("numbers.first")? + *deps.get::<i32>("numbers.second")?)
                })
                .depends_on(DependsOn::select(move |selectors: &Selectors| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    if selectors.get("sum").is_some() {
                        self_flag.store(true, Ordering::SeqCst);
                    }
                    selectors.select_all(["numbers.first", "numbers.second"])
                })),
            ),
    )?;

    assert_eq!(*container.get::<i32>("sum")?, 228);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!saw_self.load(Ordering::SeqCst));
    Ok(())
}

#[test]
fn test_selector_callback_must_return_paths() -> anyhow::Result<()> {
    let container = Container::default();
    container.register(
        &Elements::new()
            .with("x", Component::value(1_i32))
            .with(
                "nested",
                Component::function(|_deps: &Injection<'_>| Ok(()))
                    .depends_on(DependsOn::select(|_selectors: &Selectors| {
                        DependsOn::select(|selectors: &Selectors| selectors.select("x"))
                    })),
            )
            .with(
                "nothing",
                Component::function(|_deps: &Injection<'_>| Ok(()))
                    .depends_on(DependsOn::select(|selectors: &Selectors| selectors.select("missing"))),
            )
            .with(
                "blank",
                Component::function(|_deps: &Injection<'_>| Ok(()))
                    .depends_on(DependsOn::select(|_selectors: &Selectors| DependsOn::from(["x", ""]))),
            ),
    )?;

    let err = container.resolve("nested").unwrap_err();
    assert_eq!(err.as_type_error().map(|e| e.given.as_str()), Some("Function"));
    assert!(container.resolve("nothing").unwrap_err().is_type_error());
    assert!(container.resolve("blank").unwrap_err().is_type_error());
    assert!(container.resolution_stack().is_empty());
    Ok(())
}

#[test]
fn test_selected_unknown_path_is_reported_by_name() -> anyhow::Result<()> {
    let container = Container::default();
    container.register(
        &Elements::new().with("x", Component::value(1_i32)).with(
            "picky",
            Component::function(|deps: &Injection<'_>| Ok(*deps.get::<i32>("x")?))
                .depends_on(DependsOn::select(|selectors: &Selectors| selectors.select_all(["x", "missing"]))),
        ),
    )?;

    let err = container.resolve("picky").unwrap_err();
    let resolution = err.as_resolution().expect("应为解析错误");
    assert_eq!(resolution.path, "missing");
    assert_eq!(resolution.reason, ResolutionFailure::NotRegistered);
    assert_eq!(resolution.trace_string(), "picky -> missing");
    Ok(())
}

#[test]
fn test_dotted_dependencies_are_nested() -> anyhow::Result<()> {
    let container = Container::default();
    container.register(
        &Elements::new()
            .with(
                "ops",
                Group::default()
                    .with("login", Component::value("login"))
                    .with("logout", Component::value("logout")),
            )
            .with(
                "router",
                Component::function(|deps: &Injection<'_>| {
                    let tree = deps.tree().expect("显式模式下应为依赖树");
                    let ops = tree.group("ops").expect("ops 应为分组");
                    Ok(ops.keys().map(str::to_string).collect::<Vec<_>>())
                })
                .depends_on(["ops.login", "ops.logout"]),
            ),
    )?;

    let keys = container.get::<Vec<String>>("router")?;
    assert_eq!(*keys, vec!["login".to_string(), "logout".to_string()]);
    Ok(())
}

#[test]
fn test_same_prefix_merge_is_last_applied_wins() -> anyhow::Result<()> {
    let container = Container::default();
    let describe = |deps: &Injection<'_>| -> Result<&'static str, DependencyError> {
        let tree = deps.tree().expect("显式模式下应为依赖树");
        Ok(match tree.instance("a") {
            Some(_) => "instance",
            None => "group",
        })
    };
    container.register(
        &Elements::new()
            .with("a", Component::value(1_i32))
            .with("a.b", Component::value(2_i32))
            .with("group_last", Component::function(describe).depends_on(["a", "a.b"]))
            .with("instance_last", Component::function(describe).depends_on(["a.b", "a"])),
    )?;

    assert_eq!(*container.get::<&str>("group_last")?, "group");
    assert_eq!(*container.get::<&str>("instance_last")?, "instance");
    Ok(())
}

#[test]
fn test_class_component_is_injected() -> anyhow::Result<()> {
    let container = Container::default();
    container.register(
        &Elements::new()
            .with("name", Component::value(String::from("ADSP")))
            .with("greeter", Component::class::<Greeter>().depends_on("name").singleton()),
    )?;

    let greeter = container.get::<Greeter>("greeter")?;
    assert_eq!(greeter.greet(), "你好, ADSP");
    Ok(())
}

#[test]
fn test_value_component_ignores_dependencies() -> anyhow::Result<()> {
    let container = Container::default();
    container.register(
        &Elements::new()
            .with("fixed", Component::value(5_i32).depends_on("ghost"))
            .with(
                "factory",
                Component::function(|_deps: &Injection<'_>| Ok(9_i32)).as_value(),
            ),
    )?;

    assert_eq!(*container.get::<i32>("fixed")?, 5);
    let factory = container.get::<TargetFn>("factory")?;
    let produced: Instance = factory(&Injection::Empty)?;
    assert_eq!(produced.downcast_ref::<i32>(), Some(&9));
    Ok(())
}

#[test]
fn test_component_failure_propagates() -> anyhow::Result<()> {
    let container = Container::default();
    container.register(
        &Elements::new()
            .with(
                "broken",
                Component::function(|_deps: &Injection<'_>| -> Result<i32, DependencyError> {
                    Err(DependencyError::creation_failed("broken", "连接被拒绝"))
                })
                .singleton(),
            )
            .with("user", forward("broken")),
    )?;

    let err = container.resolve("user").unwrap_err();
    assert!(matches!(err, DependencyError::ComponentCreationFailed { ref path, .. } if path == "broken"));
    assert!(!container.is_cached("broken"));
    assert!(container.resolution_stack().is_empty());
    Ok(())
}

#[test]
fn test_proxy_mode_resolves_on_demand() -> anyhow::Result<()> {
    let touched = Arc::new(AtomicUsize::new(0));
    let container = proxy_container();
    container.register(
        &Elements::new()
            .with("base", Component::value(40_i32))
            .with("unused", counting(&touched))
            .with(
                "ops",
                Group::default()
                    .with("login", Component::value("login"))
                    .with("logout", Component::value("logout")),
            )
            .with(
                "consumer",
                Component::function(|deps: &Injection<'_>| {
                    let base = deps.get::<i32>("base")?;
                    let ops = deps.lookup("ops")?.into_group("ops")?;
                    let login = ops.get::<&str>("login")?;
                    Ok(format!("{base}:{login}"))
                }),
            ),
    )?;

    assert_eq!(container.get::<String>("consumer")?.as_str(), "40:login");
    assert_eq!(touched.load(Ordering::SeqCst), 0);
    Ok(())
}

#[test]
fn test_proxy_mode_probe_failure() -> anyhow::Result<()> {
    let container = proxy_container();
    container.register(
        &Elements::new()
            .with("ops", Group::default().with("login", Component::value("login")))
            .with(
                "prober",
                Component::function(|deps: &Injection<'_>| deps.get::<i32>("ops.ghost").map(|value| *value)),
            ),
    )?;

    let err = container.resolve("prober").unwrap_err();
    let resolution = err.as_resolution().expect("应为解析错误");
    assert_eq!(resolution.reason, ResolutionFailure::NoMatch);
    assert_eq!(resolution.path, "ops.ghost");
    assert_eq!(resolution.trace_string(), "prober -> ops.ghost");
    assert!(container.resolution_stack().is_empty());
    Ok(())
}

#[test]
fn test_proxy_mode_detects_cycles() -> anyhow::Result<()> {
    let container = proxy_container();
    let lookup = |next: &'static str| {
        Component::function(move |deps: &Injection<'_>| {
            deps.instance(next)?;
            Ok(())
        })
    };
    container.register(&Elements::new().with("ping", lookup("pong")).with("pong", lookup("ping")))?;

    let err = container.resolve("ping").unwrap_err();
    let resolution = err.as_resolution().expect("应为解析错误");
    assert_eq!(resolution.reason, ResolutionFailure::CyclicDependency);
    assert_eq!(resolution.trace_string(), "ping -> pong -> ping");
    Ok(())
}

#[test]
fn test_container_lookup_outside_resolution() -> anyhow::Result<()> {
    let container = Container::default();
    container.register(
        &Elements::new()
            .with("base", Component::value(40_i32))
            .with("ops", Group::default().with("logout", Component::value("logout"))),
    )?;

    let lookup = container.lookup();
    assert_eq!(*lookup.get::<i32>("base")?, 40);
    assert_eq!(*lookup.group("ops")?.get::<&str>("logout")?, "logout");
    assert!(lookup.get::<i32>("missing").unwrap_err().is_resolution_error());
    Ok(())
}

#[test]
fn test_singleton_shared_across_threads() -> anyhow::Result<()> {
    let container = Arc::new(Container::default());
    container.register(
        &Elements::new().with(
            "shared",
            Component::function(|_deps: &Injection<'_>| Ok(String::from("shared"))).singleton(),
        ),
    )?;

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let container = Arc::clone(&container);
            std::thread::spawn(move || container.resolve("shared"))
        })
        .collect();
    let instances = handles
        .into_iter()
        .map(|handle| handle.join().expect("解析线程异常退出"))
        .collect::<Result<Vec<_>, _>>()?;

    assert!(instances.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    Ok(())
}
