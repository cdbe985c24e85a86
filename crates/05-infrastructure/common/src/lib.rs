//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn ADSP 依赖注入容器的公共类型。
//!
//! ## 核心类型
//!
//! - [`Lifetime`] - 组件生命周期
//! - [`ResolveAs`] - 组件目标的解析方式
//! - [`InjectionMode`] - 容器的依赖注入策略
//! - [`ComponentOptions`] / [`ContainerOptions`] - 组件与容器选项
//! - [`DependencyError`] - 注册与解析过程中的错误
//!
//! ## 设计原则
//!
//! - 注册期可检测的问题在注册期报告
//! - 只有解析期才能确定的问题（回调返回值、缺失或循环依赖）在解析期报告
//! - 所有错误都携带足够的诊断信息

pub mod configuration;
pub mod errors;
pub mod lifecycle;

pub use configuration::*;
pub use errors::*;
pub use lifecycle::*;

/// 路径分隔符，点分路径是唯一的寻址方式
pub const PATH_SEPARATOR: char = '.';

/// 拼接父路径与名称
pub fn join_path(parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(parent) if !parent.is_empty() => format!("{parent}{PATH_SEPARATOR}{name}"),
        _ => name.to_string(),
    }
}
