//! 依赖查找与注入参数
//!
//! 组件目标收到的依赖参数有两种来源：显式模式下预先解析好的 [`DependencyTree`]，
//! 以及代理模式下按需解析的 [`DependencyLookup`]。两者通过同一个查找接口访问。

use crate::factory::{downcast, Instance};
use infrastructure_common::{
    DependencyError, ResolutionError, ResolutionFailure, TypeError, PATH_SEPARATOR,
};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 依赖查找接口
///
/// `key` 是相对于当前作用域的点分路径。命中组件时返回实例，命中分组前缀时返回作用域
/// 收窄到该分组的查找器。
pub trait DependencyLookup {
    /// 按路径或分组查找
    fn resolve_by_path_or_group(&self, key: &str) -> Result<Resolved<'_>, DependencyError>;
}

impl<'a> dyn DependencyLookup + 'a {
    /// 查找组件实例并转型为具体类型
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>, DependencyError> {
        let instance = self.resolve_by_path_or_group(key)?.into_instance(key)?;
        downcast(instance, key)
    }
}

/// 查找结果
pub enum Resolved<'a> {
    /// 组件实例
    Instance(Instance),
    /// 作用域收窄到分组的查找器
    Group(Box<dyn DependencyLookup + 'a>),
}

impl<'a> Resolved<'a> {
    /// 取出组件实例，命中分组时为类型错误
    pub fn into_instance(self, key: &str) -> Result<Instance, DependencyError> {
        match self {
            Self::Instance(instance) => Ok(instance),
            Self::Group(_) => Err(TypeError::new("DependencyLookup", key, "组件实例", "分组").into()),
        }
    }

    /// 取出分组查找器，命中组件时为类型错误
    pub fn into_group(self, key: &str) -> Result<Box<dyn DependencyLookup + 'a>, DependencyError> {
        match self {
            Self::Group(group) => Ok(group),
            Self::Instance(_) => Err(TypeError::new("DependencyLookup", key, "分组", "组件实例").into()),
        }
    }

    /// 是否命中分组
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }
}

impl fmt::Debug for Resolved<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(_) => f.write_str("Resolved::Instance(<instance>)"),
            Self::Group(_) => f.write_str("Resolved::Group(<lookup>)"),
        }
    }
}

/// 依赖树节点
#[derive(Clone)]
pub enum DependencyNode {
    /// 已解析的实例
    Instance(Instance),
    /// 嵌套分组
    Group(DependencyTree),
}

/// 依赖树
///
/// 依赖路径按 `.` 拆分后折叠成嵌套结构，`"db.pool"` 以 `{ db: { pool: 实例 } }` 的形式出现。
/// 同一前缀的形态冲突时以后插入的为准。
#[derive(Clone, Default)]
pub struct DependencyTree {
    nodes: BTreeMap<String, DependencyNode>,
}

impl DependencyTree {
    /// 创建空依赖树
    pub fn new() -> Self {
        Self::default()
    }

    /// 在点分路径处插入实例
    pub fn insert(&mut self, path: &str, instance: Instance) {
        match path.split_once(PATH_SEPARATOR) {
            Some((head, rest)) => {
                let mut group = match self.nodes.remove(head) {
                    Some(DependencyNode::Group(tree)) => tree,
                    Some(DependencyNode::Instance(_)) => {
                        debug!(key = head, "依赖实例被同名分组覆盖");
                        Self::default()
                    }
                    None => Self::default(),
                };
                group.insert(rest, instance);
                self.nodes.insert(head.to_string(), DependencyNode::Group(group));
            }
            None => {
                let previous = self
                    .nodes
                    .insert(path.to_string(), DependencyNode::Instance(instance));
                if let Some(DependencyNode::Group(_)) = previous {
                    debug!(key = path, "依赖分组被同名实例覆盖");
                }
            }
        }
    }

    /// 按点分路径取得节点
    pub fn node(&self, path: &str) -> Option<&DependencyNode> {
        match path.split_once(PATH_SEPARATOR) {
            Some((head, rest)) => match self.nodes.get(head)? {
                DependencyNode::Group(tree) => tree.node(rest),
                DependencyNode::Instance(_) => None,
            },
            None => self.nodes.get(path),
        }
    }

    /// 按点分路径取得实例
    pub fn instance(&self, path: &str) -> Option<&Instance> {
        match self.node(path)? {
            DependencyNode::Instance(instance) => Some(instance),
            DependencyNode::Group(_) => None,
        }
    }

    /// 按点分路径取得分组
    pub fn group(&self, path: &str) -> Option<&Self> {
        match self.node(path)? {
            DependencyNode::Group(tree) => Some(tree),
            DependencyNode::Instance(_) => None,
        }
    }

    /// 按点分路径取得实例并转型为具体类型
    pub fn get<T: Any + Send + Sync>(&self, path: &str) -> Result<Arc<T>, DependencyError> {
        let instance = self.instance(path).cloned().ok_or_else(|| not_injected(path))?;
        downcast(instance, path)
    }

    /// 是否包含点分路径
    pub fn contains(&self, path: &str) -> bool {
        self.node(path).is_some()
    }

    /// 顶层名称
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// 顶层节点数
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl fmt::Debug for DependencyTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, node) in &self.nodes {
            match node {
                DependencyNode::Instance(_) => map.entry(key, &"<instance>"),
                DependencyNode::Group(tree) => map.entry(key, tree),
            };
        }
        map.finish()
    }
}

impl DependencyLookup for DependencyTree {
    fn resolve_by_path_or_group(&self, key: &str) -> Result<Resolved<'_>, DependencyError> {
        match self.node(key) {
            Some(DependencyNode::Instance(instance)) => Ok(Resolved::Instance(Arc::clone(instance))),
            Some(DependencyNode::Group(tree)) => Ok(Resolved::Group(Box::new(tree.clone()))),
            None => Err(not_injected(key)),
        }
    }
}

fn not_injected(path: &str) -> DependencyError {
    ResolutionError::new(path, &[], ResolutionFailure::NotInjected).into()
}

/// 注入给组件目标的依赖参数
pub enum Injection<'a> {
    /// 没有依赖
    Empty,
    /// 显式模式下预先解析好的依赖
    Resolved(DependencyTree),
    /// 代理模式下按需解析的查找器
    Lookup(&'a dyn DependencyLookup),
}

impl Injection<'_> {
    /// 按路径或分组查找
    pub fn lookup(&self, key: &str) -> Result<Resolved<'_>, DependencyError> {
        match self {
            Self::Empty => Err(not_injected(key)),
            Self::Resolved(tree) => tree.resolve_by_path_or_group(key),
            Self::Lookup(lookup) => lookup.resolve_by_path_or_group(key),
        }
    }

    /// 按路径取得实例
    pub fn instance(&self, path: &str) -> Result<Instance, DependencyError> {
        self.lookup(path)?.into_instance(path)
    }

    /// 按路径取得实例并转型为具体类型
    pub fn get<T: Any + Send + Sync>(&self, path: &str) -> Result<Arc<T>, DependencyError> {
        downcast(self.instance(path)?, path)
    }

    /// 显式模式下的依赖树
    pub const fn tree(&self) -> Option<&DependencyTree> {
        match self {
            Self::Resolved(tree) => Some(tree),
            _ => None,
        }
    }

    /// 是否没有注入任何依赖
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Resolved(tree) => tree.is_empty(),
            Self::Lookup(_) => false,
        }
    }
}

impl fmt::Debug for Injection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Injection::Empty"),
            Self::Resolved(tree) => f.debug_tuple("Injection::Resolved").field(tree).finish(),
            Self::Lookup(_) => f.write_str("Injection::Lookup(<lookup>)"),
        }
    }
}
