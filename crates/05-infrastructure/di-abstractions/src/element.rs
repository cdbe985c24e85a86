//! 容器元素：组件与分组
//!
//! 元素是声明式的数据。构建方法消费旧值并返回新值，已经交给容器的元素不会被修改。

use crate::dependency::DependsOn;
use crate::factory::{Injectable, Instance, Target};
use crate::resolver::Injection;
use infrastructure_common::{ComponentOptions, DependencyError, Lifetime, ResolveAs};
use std::any::Any;

/// 组件与分组共用的选项构建方法
pub trait ElementOptions: Sized {
    /// 当前显式设置的选项
    fn options(&self) -> &ComponentOptions;

    /// 以新选项替换
    #[must_use]
    fn with_options(self, options: ComponentOptions) -> Self;

    /// 设置生命周期
    #[must_use]
    fn with_lifetime(self, lifetime: Lifetime) -> Self {
        let options = self.options().with_lifetime(lifetime);
        self.with_options(options)
    }

    /// 设置解析方式
    #[must_use]
    fn with_resolve_as(self, resolve_as: ResolveAs) -> Self {
        let options = self.options().with_resolve_as(resolve_as);
        self.with_options(options)
    }

    /// 单例生命周期
    #[must_use]
    fn singleton(self) -> Self {
        self.with_lifetime(Lifetime::Singleton)
    }

    /// 瞬时生命周期
    #[must_use]
    fn transient(self) -> Self {
        self.with_lifetime(Lifetime::Transient)
    }

    /// 以函数方式解析
    #[must_use]
    fn as_function(self) -> Self {
        self.with_resolve_as(ResolveAs::Function)
    }

    /// 以类型构造方式解析
    #[must_use]
    fn as_class(self) -> Self {
        self.with_resolve_as(ResolveAs::Class)
    }

    /// 以值方式解析
    #[must_use]
    fn as_value(self) -> Self {
        self.with_resolve_as(ResolveAs::Value)
    }
}

/// 组件
#[derive(Debug, Clone)]
pub struct Component {
    target: Target,
    options: ComponentOptions,
    depends_on: DependsOn,
}

impl Component {
    /// 从目标创建组件，解析方式留给外层继承
    pub fn new(target: Target) -> Self {
        Self {
            target,
            options: ComponentOptions::new(),
            depends_on: DependsOn::Empty,
        }
    }

    /// 函数组件
    pub fn function<F, T>(factory: F) -> Self
    where
        F: Fn(&Injection<'_>) -> Result<T, DependencyError> + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        Self::new(Target::callable(factory)).as_function()
    }

    /// 类型组件，通过 [`Injectable::inject`] 构造
    pub fn class<T: Injectable>() -> Self {
        Self::new(Target::injectable::<T>()).as_class()
    }

    /// 值组件
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Self::new(Target::value(value)).as_value()
    }

    /// 共享实例组件
    pub fn shared(instance: Instance) -> Self {
        Self::new(Target::shared(instance)).as_value()
    }

    /// 声明依赖
    #[must_use]
    pub fn depends_on(mut self, depends_on: impl Into<DependsOn>) -> Self {
        self.depends_on = depends_on.into();
        self
    }

    /// 组件目标
    pub const fn target(&self) -> &Target {
        &self.target
    }

    /// 依赖声明
    pub const fn dependencies(&self) -> &DependsOn {
        &self.depends_on
    }
}

impl ElementOptions for Component {
    fn options(&self) -> &ComponentOptions {
        &self.options
    }

    fn with_options(mut self, options: ComponentOptions) -> Self {
        self.options = options;
        self
    }
}

/// 有序的名称到元素映射
///
/// 插入已存在的名称会原地替换旧元素。
#[derive(Debug, Clone, Default)]
pub struct Elements {
    entries: Vec<(String, Element)>,
}

impl Elements {
    /// 创建空映射
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加元素
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, element: impl Into<Element>) -> Self {
        self.insert(name, element);
        self
    }

    /// 插入元素，返回被替换的旧元素
    pub fn insert(&mut self, name: impl Into<String>, element: impl Into<Element>) -> Option<Element> {
        let name = name.into();
        let element = element.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, element)),
            None => {
                self.entries.push((name, element));
                None
            }
        }
    }

    /// 按名称取得元素
    pub fn get(&self, name: &str) -> Option<&Element> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, element)| element)
    }

    /// 按插入顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Element)> {
        self.entries.iter().map(|(name, element)| (name.as_str(), element))
    }

    /// 元素数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S, E> FromIterator<(S, E)> for Elements
where
    S: Into<String>,
    E: Into<Element>,
{
    fn from_iter<I: IntoIterator<Item = (S, E)>>(iter: I) -> Self {
        let mut elements = Self::new();
        for (name, element) in iter {
            elements.insert(name, element);
        }
        elements
    }
}

/// 分组
///
/// 分组选项不会在创建时合并到子元素，合并发生在注册时，同一个分组可以放进多个容器。
#[derive(Debug, Clone, Default)]
pub struct Group {
    elements: Elements,
    options: ComponentOptions,
}

impl Group {
    /// 从元素映射创建分组
    pub fn new(elements: Elements) -> Self {
        Self {
            elements,
            options: ComponentOptions::new(),
        }
    }

    /// 添加元素
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, element: impl Into<Element>) -> Self {
        self.elements.insert(name, element);
        self
    }

    /// 子元素
    pub const fn elements(&self) -> &Elements {
        &self.elements
    }
}

impl ElementOptions for Group {
    fn options(&self) -> &ComponentOptions {
        &self.options
    }

    fn with_options(mut self, options: ComponentOptions) -> Self {
        self.options = options;
        self
    }
}

/// 容器元素
#[derive(Debug, Clone)]
pub enum Element {
    /// 组件
    Component(Component),
    /// 分组
    Group(Group),
}

impl Element {
    /// 作为组件
    pub const fn as_component(&self) -> Option<&Component> {
        match self {
            Self::Component(component) => Some(component),
            Self::Group(_) => None,
        }
    }

    /// 作为分组
    pub const fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(group) => Some(group),
            Self::Component(_) => None,
        }
    }
}

impl From<Component> for Element {
    fn from(component: Component) -> Self {
        Self::Component(component)
    }
}

impl From<Group> for Element {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

impl From<Elements> for Element {
    fn from(elements: Elements) -> Self {
        Self::Group(Group::new(elements))
    }
}
