//! 组件生命周期、解析方式与注入模式

use crate::errors::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 组件生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Lifetime {
    /// 瞬时模式 - 每次解析都创建新实例
    #[default]
    #[serde(alias = "transient")]
    Transient,
    /// 单例模式 - 首次解析后缓存，容器内唯一
    #[serde(alias = "singleton")]
    Singleton,
}

impl Lifetime {
    /// 全部取值
    pub const ALL: [Self; 2] = [Self::Transient, Self::Singleton];

    /// 规范名称
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transient => "TRANSIENT",
            Self::Singleton => "SINGLETON",
        }
    }
}

/// 组件目标的解析方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolveAs {
    /// 以依赖参数调用工厂函数
    #[default]
    #[serde(alias = "function")]
    Function,
    /// 以依赖参数构造类型实例
    #[serde(alias = "class")]
    Class,
    /// 直接返回保存的值，忽略依赖
    #[serde(alias = "value")]
    Value,
}

impl ResolveAs {
    /// 全部取值
    pub const ALL: [Self; 3] = [Self::Function, Self::Class, Self::Value];

    /// 规范名称
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "FUNCTION",
            Self::Class => "CLASS",
            Self::Value => "VALUE",
        }
    }

    /// 是否要求可调用目标
    pub const fn requires_callable(self) -> bool {
        matches!(self, Self::Function | Self::Class)
    }
}

/// 容器级依赖注入策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InjectionMode {
    /// 显式声明依赖，解析前全部准备好
    #[default]
    #[serde(alias = "classic")]
    Classic,
    /// 惰性查找，访问时才解析
    #[serde(alias = "proxy")]
    Proxy,
}

impl InjectionMode {
    /// 全部取值
    pub const ALL: [Self; 2] = [Self::Classic, Self::Proxy];

    /// 规范名称
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "CLASSIC",
            Self::Proxy => "PROXY",
        }
    }
}

macro_rules! impl_enum_text {
    ($ty:ty, $param:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = TypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .into_iter()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| {
                        let expected = <$ty>::ALL
                            .iter()
                            .map(|candidate| candidate.as_str())
                            .collect::<Vec<_>>()
                            .join(" | ");
                        TypeError::new(concat!(stringify!($ty), "::from_str"), $param, expected, s)
                    })
            }
        }
    };
}

impl_enum_text!(Lifetime, "lifetime");
impl_enum_text!(ResolveAs, "resolveAs");
impl_enum_text!(InjectionMode, "injectionMode");
