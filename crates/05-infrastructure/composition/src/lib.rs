//! # 基础设施组合层
//!
//! 负责把配置、日志与依赖注入容器组合成可直接使用的容器实例。
//!
//! ## 主要功能
//!
//! - **容器构建器**: 使用构建者模式组装容器
//! - **分层配置**: 配置文件、环境变量与显式选项按顺序覆盖
//! - **日志初始化**: 按需初始化 `tracing` 订阅者
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use di_abstractions::{Component, ElementOptions, Elements};
//! use infrastructure_composition::{ContainerBuilder, LoggingConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let container = ContainerBuilder::new()
//!         .add_config_file("config/container.toml")?
//!         .add_config_env_vars("ADSP_DI")
//!         .with_logging(LoggingConfig::development())
//!         .register(Elements::new().with("name", Component::value("adsp").singleton()))
//!         .build()?;
//!
//!     let name = container.get::<&str>("name")?;
//!     println!("应用名称: {name}");
//!     Ok(())
//! }
//! ```

pub mod builder;

// 重新导出主要类型
pub use builder::{ContainerBuilder, LoggingConfig, CONTAINER_SECTION};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
