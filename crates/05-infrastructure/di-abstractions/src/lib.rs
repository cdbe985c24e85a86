//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义组件描述、注册记录和依赖查找的核心类型。
//!
//! ## 核心类型
//!
//! - [`Component`] / [`Group`] / [`Elements`] - 声明式组件树
//! - [`DependsOn`] / [`Selectors`] - 组件的依赖声明
//! - [`Registration`] - 解析引擎操作的扁平注册记录
//! - [`Injection`] / [`DependencyTree`] / [`DependencyLookup`] - 注入给组件目标的依赖参数
//! - [`Target`] / [`Injectable`] - 组件目标与可构造类型

pub mod dependency;
pub mod element;
pub mod factory;
pub mod registry;
pub mod resolver;

pub use dependency::*;
pub use element::*;
pub use factory::*;
pub use registry::*;
pub use resolver::*;
