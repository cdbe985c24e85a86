//! 组件选项与容器选项

use crate::lifecycle::{InjectionMode, Lifetime, ResolveAs};
use serde::{Deserialize, Serialize};

/// 组件选项
///
/// 每个字段都可以缺省。缺省的字段在注册时从外层（分组、注册调用、容器默认值）继承。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ComponentOptions {
    /// 解析方式
    #[serde(alias = "resolveAs", skip_serializing_if = "Option::is_none")]
    pub resolve_as: Option<ResolveAs>,
    /// 生命周期
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifetime: Option<Lifetime>,
}

impl ComponentOptions {
    /// 创建空选项
    pub const fn new() -> Self {
        Self {
            resolve_as: None,
            lifetime: None,
        }
    }

    /// 设置生命周期
    #[must_use]
    pub const fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    /// 设置解析方式
    #[must_use]
    pub const fn with_resolve_as(mut self, resolve_as: ResolveAs) -> Self {
        self.resolve_as = Some(resolve_as);
        self
    }

    /// 是否没有设置任何选项
    pub const fn is_empty(&self) -> bool {
        self.resolve_as.is_none() && self.lifetime.is_none()
    }

    /// 以 `overrides` 覆盖当前选项，`overrides` 中设置的字段优先
    #[must_use]
    pub fn merge(&self, overrides: &Self) -> Self {
        Self {
            resolve_as: overrides.resolve_as.or(self.resolve_as),
            lifetime: overrides.lifetime.or(self.lifetime),
        }
    }
}

/// 容器选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerOptions {
    /// 依赖注入策略
    #[serde(alias = "injectionMode")]
    pub injection_mode: InjectionMode,
    /// 所有组件的默认选项，优先级最低
    #[serde(flatten)]
    pub defaults: ComponentOptions,
}

impl ContainerOptions {
    /// 创建默认容器选项
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置依赖注入策略
    #[must_use]
    pub const fn with_injection_mode(mut self, injection_mode: InjectionMode) -> Self {
        self.injection_mode = injection_mode;
        self
    }

    /// 设置组件默认生命周期
    #[must_use]
    pub const fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.defaults.lifetime = Some(lifetime);
        self
    }

    /// 设置组件默认解析方式
    #[must_use]
    pub const fn with_resolve_as(mut self, resolve_as: ResolveAs) -> Self {
        self.defaults.resolve_as = Some(resolve_as);
        self
    }
}
