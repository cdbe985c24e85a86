//! 组件目标
//!
//! 组件目标可以是可调用的工厂，也可以是直接保存的值。

use crate::resolver::Injection;
use infrastructure_common::{DependencyError, TypeError};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 解析得到的组件实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 可调用目标，参数为注入的依赖
pub type TargetFn =
    Arc<dyn Fn(&Injection<'_>) -> Result<Instance, DependencyError> + Send + Sync>;

/// 可通过依赖注入构造的类型
///
/// 以 [`ResolveAs::Class`](infrastructure_common::ResolveAs::Class) 注册的组件通过此 trait 构造。
pub trait Injectable: Any + Send + Sync + Sized {
    /// 使用注入的依赖构造实例
    fn inject(deps: &Injection<'_>) -> Result<Self, DependencyError>;
}

/// 组件目标
#[derive(Clone)]
pub enum Target {
    /// 可调用目标
    Callable(TargetFn),
    /// 值目标
    Value(Instance),
}

impl Target {
    /// 从工厂函数创建目标
    pub fn callable<F, T>(factory: F) -> Self
    where
        F: Fn(&Injection<'_>) -> Result<T, DependencyError> + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        Self::Callable(Arc::new(move |deps: &Injection<'_>| {
            factory(deps).map(|value| Arc::new(value) as Instance)
        }))
    }

    /// 从可注入类型创建目标
    pub fn injectable<T: Injectable>() -> Self {
        Self::Callable(Arc::new(|deps: &Injection<'_>| {
            T::inject(deps).map(|value| Arc::new(value) as Instance)
        }))
    }

    /// 从值创建目标
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Self::Value(Arc::new(value))
    }

    /// 从已共享的实例创建目标，解析结果与该实例指向同一对象
    pub fn shared(instance: Instance) -> Self {
        Self::Value(instance)
    }

    /// 是否为可调用目标
    pub const fn is_callable(&self) -> bool {
        matches!(self, Self::Callable(_))
    }

    /// 目标种类名称，用于诊断信息
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Callable(_) => "Function",
            Self::Value(_) => "Value",
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callable(_) => f.write_str("Target::Callable(<function>)"),
            Self::Value(_) => f.write_str("Target::Value(<instance>)"),
        }
    }
}

/// 将实例向下转型为具体类型
pub fn downcast<T: Any + Send + Sync>(instance: Instance, path: &str) -> Result<Arc<T>, DependencyError> {
    instance.downcast::<T>().map_err(|_| {
        TypeError::new(
            "Injection::get",
            path,
            std::any::type_name::<T>(),
            "其他类型的实例",
        )
        .into()
    })
}
