//! # 依赖注入具体实现
//!
//! 提供注册器、两种依赖注入策略的解析器以及依赖注入容器。
//!
//! ```
//! use di_abstractions::{Component, ElementOptions, Elements, Injection};
//! use di_impl::Container;
//!
//! let container = Container::default();
//! container
//!     .register(
//!         &Elements::new()
//!             .with("port", Component::value(8080_u16))
//!             .with(
//!                 "address",
//!                 Component::function(|deps: &Injection<'_>| {
//!                     Ok(format!("127.0.0.1:{}", deps.get::<u16>("port")?))
//!                 })
//!                 .depends_on("port")
//!                 .singleton(),
//!             ),
//!     )
//!     .unwrap();
//!
//! let address = container.get::<String>("address").unwrap();
//! assert_eq!(address.as_str(), "127.0.0.1:8080");
//! ```

pub mod container;
pub mod proxy;
pub mod registrar;
pub mod resolver;

pub use container::Container;
pub use proxy::ProxyLookup;
pub use registrar::flatten;
pub use resolver::{resolver_for, ClassicResolver, ProxyResolver, ResolveStrategy};
