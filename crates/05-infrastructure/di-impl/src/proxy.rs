//! 代理模式下的惰性依赖查找

use crate::container::Container;
use di_abstractions::{DependencyLookup, Resolved};
use infrastructure_common::{join_path, DependencyError, ResolutionError, ResolutionFailure};
use std::any::Any;
use std::sync::Arc;
use tracing::debug;

/// 惰性依赖查找器
///
/// 作用域为 `None` 时覆盖整个注册表；命中分组前缀时返回作用域收窄到该分组的新查找器。
#[derive(Debug, Clone)]
pub struct ProxyLookup<'c> {
    container: &'c Container,
    scope: Option<String>,
}

impl<'c> ProxyLookup<'c> {
    /// 创建查找器
    pub const fn new(container: &'c Container, scope: Option<String>) -> Self {
        Self { container, scope }
    }

    /// 当前作用域
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// 解析组件并转型为具体类型
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>, DependencyError> {
        (self as &dyn DependencyLookup).get(key)
    }

    /// 取得作用域收窄到分组的查找器
    pub fn group(&self, key: &str) -> Result<Box<dyn DependencyLookup + '_>, DependencyError> {
        self.resolve_by_path_or_group(key)?.into_group(key)
    }
}

impl DependencyLookup for ProxyLookup<'_> {
    fn resolve_by_path_or_group(&self, key: &str) -> Result<Resolved<'_>, DependencyError> {
        let path = join_path(self.scope.as_deref(), key);

        if self.container.is_registered(&path) {
            return self.container.resolve(&path).map(Resolved::Instance);
        }

        if self.container.has_group(&path) {
            debug!(group = %path, "按分组前缀收窄查找作用域");
            return Ok(Resolved::Group(Box::new(ProxyLookup::new(self.container, Some(path)))));
        }

        Err(ResolutionError::new(path, &self.container.resolution_stack(), ResolutionFailure::NoMatch).into())
    }
}
