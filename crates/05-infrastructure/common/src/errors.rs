//! 错误类型定义

use std::fmt;
use thiserror::Error;

/// 解析路径的分隔符
pub const TRACE_SEPARATOR: &str = " -> ";

/// 类型/校验错误
///
/// 注册时或 `dependsOn` 回调求值时发现的非法输入，携带出错的值与期望的形态。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{description}: 无效的值 \"{given}\" 传入 \"{param}\"，期望: ({expected})")]
pub struct TypeError {
    /// 出错的操作
    pub description: String,
    /// 出错的参数
    pub param: String,
    /// 期望的形态
    pub expected: String,
    /// 实际给出的值
    pub given: String,
}

impl TypeError {
    /// 创建新的类型错误
    pub fn new(
        description: impl Into<String>,
        param: impl Into<String>,
        expected: impl Into<String>,
        given: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            param: param.into(),
            expected: expected.into(),
            given: given.into(),
        }
    }
}

/// 解析失败的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionFailure {
    /// 路径未注册
    NotRegistered,
    /// 路径已在解析栈中
    CyclicDependency,
    /// 惰性查找既没有匹配组件也没有匹配分组
    NoMatch,
    /// 访问了未声明的依赖
    NotInjected,
}

impl fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::NotRegistered => "组件未注册",
            Self::CyclicDependency => "检测到循环依赖",
            Self::NoMatch => "没有匹配的组件或分组",
            Self::NotInjected => "依赖未声明，未被注入",
        };
        f.write_str(message)
    }
}

/// 解析错误
///
/// `trace` 是失败前访问过的路径，最后一项是失败的路径本身。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("无法解析 '{path}'。{reason}\n\n解析路径: {}", .trace.join(TRACE_SEPARATOR))]
pub struct ResolutionError {
    /// 失败的路径
    pub path: String,
    /// 失败原因
    pub reason: ResolutionFailure,
    /// 完整解析路径
    pub trace: Vec<String>,
}

impl ResolutionError {
    /// 根据当前解析栈创建解析错误
    pub fn new(path: impl Into<String>, stack: &[String], reason: ResolutionFailure) -> Self {
        let path = path.into();
        let mut trace = stack.to_vec();
        trace.push(path.clone());
        Self {
            path,
            reason,
            trace,
        }
    }

    /// 把解析栈补到路径前面
    ///
    /// 依赖树之类不知道解析栈的地方只能给出失败路径本身，由容器在返回前补全。
    #[must_use]
    pub fn within(mut self, stack: &[String]) -> Self {
        if self.trace.len() == 1 {
            let mut trace = stack.to_vec();
            trace.append(&mut self.trace);
            self.trace = trace;
        }
        self
    }

    /// 以 `a -> b -> c` 形式渲染解析路径
    pub fn trace_string(&self) -> String {
        self.trace.join(TRACE_SEPARATOR)
    }
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("类型错误: {0}")]
    Type(#[from] TypeError),

    #[error("解析错误: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("组件创建失败: {path}, 原因: {source}")]
    ComponentCreationFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl DependencyError {
    /// 组件目标自身报告的创建失败
    pub fn creation_failed(
        path: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ComponentCreationFailed {
            path: path.into(),
            source: source.into(),
        }
    }

    /// 是否为类型错误
    pub const fn is_type_error(&self) -> bool {
        matches!(self, Self::Type(_))
    }

    /// 是否为解析错误
    pub const fn is_resolution_error(&self) -> bool {
        matches!(self, Self::Resolution(_))
    }

    /// 取出解析错误
    pub const fn as_resolution(&self) -> Option<&ResolutionError> {
        match self {
            Self::Resolution(err) => Some(err),
            _ => None,
        }
    }

    /// 取出类型错误
    pub const fn as_type_error(&self) -> Option<&TypeError> {
        match self {
            Self::Type(err) => Some(err),
            _ => None,
        }
    }
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
