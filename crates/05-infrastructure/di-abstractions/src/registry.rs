//! 注册记录
//!
//! 组件树在注册时被展开成扁平的注册记录，解析引擎只操作注册记录。

use crate::dependency::DependsOn;
use crate::element::{Component, ElementOptions};
use crate::factory::{Instance, Target, TargetFn};
use crate::resolver::Injection;
use infrastructure_common::{
    join_path, ComponentOptions, DependencyError, Lifetime, ResolveAs, TypeError,
};
use std::fmt;
use std::sync::Arc;

/// 注册记录
///
/// 创建后不可变。`target` 已按解析方式包装成统一的调用约定。
#[derive(Clone)]
pub struct Registration {
    /// 组件在所属分组中的名称
    pub id: String,
    /// 所属分组路径，顶层组件为 `None`
    pub group_id: Option<String>,
    /// 完整点分路径
    pub path: String,
    /// 解析方式
    pub resolve_as: ResolveAs,
    /// 生命周期
    pub lifetime: Lifetime,
    /// 依赖声明
    pub dependencies: DependsOn,
    target: TargetFn,
}

impl Registration {
    /// 根据组件与合并后的有效选项创建注册记录
    pub fn from_component(
        id: &str,
        group_id: Option<&str>,
        component: &Component,
        effective: &ComponentOptions,
    ) -> Result<Self, TypeError> {
        let path = join_path(group_id, id);
        let target = component.target();
        let resolve_as = effective.resolve_as.unwrap_or(if target.is_callable() {
            ResolveAs::Function
        } else {
            ResolveAs::Value
        });
        let lifetime = effective.lifetime.unwrap_or_default();

        let target = prepare_target(&path, target, resolve_as)?;

        Ok(Self {
            id: id.to_string(),
            group_id: group_id.map(str::to_string),
            path,
            resolve_as,
            lifetime,
            dependencies: component.dependencies().clone(),
            target,
        })
    }

    /// 以组件自身选项创建注册记录，不继承任何外层选项
    pub fn standalone(path: &str, component: &Component) -> Result<Self, TypeError> {
        Self::from_component(path, None, component, component.options())
    }

    /// 值组件不需要收集依赖
    pub fn is_value(&self) -> bool {
        self.resolve_as == ResolveAs::Value
    }

    /// 调用组件目标
    pub fn invoke(&self, deps: &Injection<'_>) -> Result<Instance, DependencyError> {
        (self.target)(deps)
    }
}

fn prepare_target(path: &str, target: &Target, resolve_as: ResolveAs) -> Result<TargetFn, TypeError> {
    if resolve_as.requires_callable() && !target.is_callable() {
        return Err(TypeError::new(
            "Container::register",
            path,
            format!("{resolve_as} 需要可调用目标"),
            target.kind(),
        ));
    }

    let prepared: TargetFn = match (target, resolve_as) {
        (Target::Callable(function), ResolveAs::Value) => {
            let function = Arc::clone(function);
            Arc::new(move |_deps: &Injection<'_>| -> Result<Instance, DependencyError> {
                Ok(Arc::new(Arc::clone(&function)))
            })
        }
        (Target::Callable(function), _) => Arc::clone(function),
        (Target::Value(value), _) => {
            let value = Arc::clone(value);
            Arc::new(move |_deps: &Injection<'_>| -> Result<Instance, DependencyError> {
                Ok(Arc::clone(&value))
            })
        }
    };
    Ok(prepared)
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.id)
            .field("group_id", &self.group_id)
            .field("path", &self.path)
            .field("resolve_as", &self.resolve_as)
            .field("lifetime", &self.lifetime)
            .field("dependencies", &self.dependencies)
            .field("target", &"<function>")
            .finish()
    }
}
