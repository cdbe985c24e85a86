//! 解析策略
//!
//! 容器按 [`InjectionMode`] 选择一种策略，把注册记录物化为实例。生命周期缓存与
//! 解析栈由容器负责，策略只负责收集依赖并调用组件目标。

use crate::container::Container;
use crate::proxy::ProxyLookup;
use di_abstractions::{DependencyTree, DependsOn, Injection, Instance, Registration};
use infrastructure_common::{DependencyError, InjectionMode, TypeError};
use std::fmt;

/// 解析策略
pub trait ResolveStrategy: Send + Sync + fmt::Debug {
    /// 策略对应的注入模式
    fn mode(&self) -> InjectionMode;

    /// 收集依赖并调用组件目标
    fn materialize(&self, registration: &Registration, container: &Container) -> Result<Instance, DependencyError>;
}

/// 根据注入模式创建解析策略
pub fn resolver_for(mode: InjectionMode) -> Box<dyn ResolveStrategy> {
    match mode {
        InjectionMode::Classic => Box::new(ClassicResolver),
        InjectionMode::Proxy => Box::new(ProxyResolver),
    }
}

/// 显式依赖策略
///
/// 先解析 `dependencies` 声明的全部路径，再把结果折叠成 [`DependencyTree`] 交给组件目标。
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicResolver;

impl ClassicResolver {
    /// 把依赖声明规范化为路径列表，`None` 表示不注入任何依赖
    pub fn dependency_paths(
        &self,
        registration: &Registration,
        container: &Container,
    ) -> Result<Option<Vec<String>>, TypeError> {
        match &registration.dependencies {
            DependsOn::Select(selector) => {
                let selectors = container.selectors_excluding(&registration.path);
                let selected = selector(&selectors);
                match selected {
                    DependsOn::Select(_) | DependsOn::Empty => Err(TypeError::new(
                        "Container::resolve",
                        format!("{}.dependsOn", registration.path),
                        "String | Array<String>",
                        selected.kind(),
                    )),
                    other => normalize(&registration.path, &other),
                }
            }
            other => normalize(&registration.path, other),
        }
    }
}

fn normalize(path: &str, depends_on: &DependsOn) -> Result<Option<Vec<String>>, TypeError> {
    let param = || format!("{path}.dependsOn");
    match depends_on {
        DependsOn::Empty => Ok(None),
        DependsOn::Single(dependency) if dependency.is_empty() => {
            Err(TypeError::new("Container::resolve", param(), "非空字符串", "\"\""))
        }
        DependsOn::Single(dependency) => Ok(Some(vec![dependency.clone()])),
        DependsOn::Many(dependencies) => {
            if let Some(index) = dependencies.iter().position(String::is_empty) {
                return Err(TypeError::new(
                    "Container::resolve",
                    format!("{}[{index}]", param()),
                    "非空字符串",
                    "\"\"",
                ));
            }
            Ok((!dependencies.is_empty()).then(|| dependencies.clone()))
        }
        DependsOn::Select(_) => Err(TypeError::new(
            "Container::resolve",
            param(),
            "String | Array<String>",
            depends_on.kind(),
        )),
    }
}

impl ResolveStrategy for ClassicResolver {
    fn mode(&self) -> InjectionMode {
        InjectionMode::Classic
    }

    fn materialize(&self, registration: &Registration, container: &Container) -> Result<Instance, DependencyError> {
        if registration.is_value() {
            return registration.invoke(&Injection::Empty);
        }

        let Some(paths) = self.dependency_paths(registration, container)? else {
            return registration.invoke(&Injection::Empty);
        };

        let mut tree = DependencyTree::new();
        for path in &paths {
            let instance = container.resolve(path)?;
            tree.insert(path, instance);
        }
        registration.invoke(&Injection::Resolved(tree))
    }
}

/// 惰性查找策略
///
/// 组件目标收到一个作用于整个注册表的 [`ProxyLookup`]，访问到的路径才会被解析。
#[derive(Debug, Clone, Copy, Default)]
pub struct ProxyResolver;

impl ResolveStrategy for ProxyResolver {
    fn mode(&self) -> InjectionMode {
        InjectionMode::Proxy
    }

    fn materialize(&self, registration: &Registration, container: &Container) -> Result<Instance, DependencyError> {
        if registration.is_value() {
            return registration.invoke(&Injection::Empty);
        }

        let lookup = ProxyLookup::new(container, None);
        registration.invoke(&Injection::Lookup(&lookup))
    }
}
