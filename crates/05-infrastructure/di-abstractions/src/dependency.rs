//! 依赖声明与选择器

use infrastructure_common::PATH_SEPARATOR;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// 依赖选择回调
pub type SelectorFn = Arc<dyn Fn(&Selectors) -> DependsOn + Send + Sync>;

/// 组件的依赖声明
///
/// `Select` 回调要等到所有注册完成后才能求值，因此在解析时才调用。
#[derive(Clone, Default)]
pub enum DependsOn {
    /// 无依赖
    #[default]
    Empty,
    /// 单个依赖路径
    Single(String),
    /// 多个依赖路径
    Many(Vec<String>),
    /// 由回调从选择器中挑选依赖
    Select(SelectorFn),
}

impl DependsOn {
    /// 从回调创建依赖声明
    pub fn select<F>(selector: F) -> Self
    where
        F: Fn(&Selectors) -> Self + Send + Sync + 'static,
    {
        Self::Select(Arc::new(selector))
    }

    /// 从多个路径创建依赖声明
    pub fn many<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Many(paths.into_iter().map(Into::into).collect())
    }

    /// 是否未声明依赖
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// 声明形态名称，用于诊断信息
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Single(_) => "String",
            Self::Many(_) => "Array",
            Self::Select(_) => "Function",
        }
    }
}

impl fmt::Debug for DependsOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Single(path) => f.debug_tuple("Single").field(path).finish(),
            Self::Many(paths) => f.debug_tuple("Many").field(paths).finish(),
            Self::Select(_) => f.write_str("Select(<callback>)"),
        }
    }
}

impl From<&str> for DependsOn {
    fn from(path: &str) -> Self {
        Self::Single(path.to_string())
    }
}

impl From<String> for DependsOn {
    fn from(path: String) -> Self {
        Self::Single(path)
    }
}

impl From<Vec<String>> for DependsOn {
    fn from(paths: Vec<String>) -> Self {
        Self::Many(paths)
    }
}

impl From<Vec<&str>> for DependsOn {
    fn from(paths: Vec<&str>) -> Self {
        Self::many(paths)
    }
}

impl From<&[&str]> for DependsOn {
    fn from(paths: &[&str]) -> Self {
        Self::many(paths.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for DependsOn {
    fn from(paths: [&str; N]) -> Self {
        Self::many(paths)
    }
}

/// 选择器节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// 已注册组件的完整路径
    Path(String),
    /// 分组下的选择器
    Group(Selectors),
}

/// 选择器
///
/// 覆盖当前所有已注册路径（发起解析的组件除外），按点分路径逐层嵌套，
/// 叶子节点的值是完整路径，例如 `a.b.c` 可以通过 `get("a.b.c")` 取得。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selectors {
    entries: BTreeMap<String, Selector>,
}

impl Selectors {
    /// 从路径列表构建选择器
    ///
    /// 同一前缀既是叶子又是分组时，后插入的形态覆盖先插入的形态。
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selectors = Self::default();
        for path in paths {
            let path = path.as_ref();
            selectors.insert(path, path);
        }
        selectors
    }

    fn insert(&mut self, relative: &str, full: &str) {
        match relative.split_once(PATH_SEPARATOR) {
            Some((head, rest)) => {
                let entry = self
                    .entries
                    .entry(head.to_string())
                    .or_insert_with(|| Selector::Group(Self::default()));
                if let Selector::Path(_) = *entry {
                    *entry = Selector::Group(Self::default());
                }
                if let Selector::Group(group) = entry {
                    group.insert(rest, full);
                }
            }
            None => {
                self.entries
                    .insert(relative.to_string(), Selector::Path(full.to_string()));
            }
        }
    }

    /// 按点分路径取得选择器节点
    pub fn get(&self, path: &str) -> Option<&Selector> {
        match path.split_once(PATH_SEPARATOR) {
            Some((head, rest)) => match self.entries.get(head)? {
                Selector::Group(group) => group.get(rest),
                Selector::Path(_) => None,
            },
            None => self.entries.get(path),
        }
    }

    /// 按点分路径取得已注册组件的完整路径
    pub fn path(&self, path: &str) -> Option<&str> {
        match self.get(path)? {
            Selector::Path(full) => Some(full),
            Selector::Group(_) => None,
        }
    }

    /// 选择单个依赖
    ///
    /// 路径不存在或指向分组时返回 [`DependsOn::Empty`]，回调返回它会被视为类型错误。
    pub fn select(&self, path: &str) -> DependsOn {
        self.path(path)
            .map_or(DependsOn::Empty, |full| DependsOn::Single(full.to_string()))
    }

    /// 选择多个依赖
    ///
    /// 找不到的路径按原名保留，解析时报告为未注册。
    pub fn select_all<I, S>(&self, paths: I) -> DependsOn
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        DependsOn::many(
            paths
                .into_iter()
                .map(|path| {
                    let path = path.as_ref();
                    self.path(path).unwrap_or(path).to_string()
                }),
        )
    }

    /// 所有叶子路径
    pub fn paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_paths(&mut paths);
        paths
    }

    fn collect_paths(&self, paths: &mut Vec<String>) {
        for selector in self.entries.values() {
            match selector {
                Selector::Path(full) => paths.push(full.clone()),
                Selector::Group(group) => group.collect_paths(paths),
            }
        }
    }

    /// 顶层名称
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// 是否没有任何选择器
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
