//! 依赖注入容器

use crate::proxy::ProxyLookup;
use crate::registrar;
use crate::resolver::{resolver_for, ResolveStrategy};
use di_abstractions::{downcast, Elements, Instance, Registration, Selectors};
use infrastructure_common::{
    ComponentOptions, ContainerOptions, DependencyError, DependencyResult, Lifetime,
    ResolutionError, ResolutionFailure, PATH_SEPARATOR,
};
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 依赖注入容器
///
/// 容器拥有全部状态：注册表、单例缓存和解析栈。注册与解析通过可重入的入口锁串行化，
/// 同一线程在解析过程中可以继续解析依赖；调用组件目标和依赖选择回调时不持有内部状态锁。
pub struct Container {
    id: Uuid,
    options: ContainerOptions,
    resolver: Box<dyn ResolveStrategy>,
    registrations: RwLock<BTreeMap<String, Arc<Registration>>>,
    cache: Mutex<HashMap<String, Instance>>,
    resolution_stack: Mutex<Vec<String>>,
    entry: ReentrantMutex<()>,
}

impl Container {
    /// 创建新的容器
    pub fn new(options: ContainerOptions) -> Self {
        let id = Uuid::new_v4();
        info!(container = %id, injection_mode = %options.injection_mode, "创建依赖注入容器");
        Self {
            id,
            resolver: resolver_for(options.injection_mode),
            options,
            registrations: RwLock::new(BTreeMap::new()),
            cache: Mutex::new(HashMap::new()),
            resolution_stack: Mutex::new(Vec::new()),
            entry: ReentrantMutex::new(()),
        }
    }

    /// 注册组件树
    pub fn register(&self, elements: &Elements) -> DependencyResult<&Self> {
        self.register_with(elements, &ComponentOptions::new())
    }

    /// 以本次调用的选项注册组件树
    ///
    /// `options` 优先于容器默认选项，低于分组和组件自身的选项。
    /// 任何元素非法时整批注册失败，注册表保持不变。
    pub fn register_with(&self, elements: &Elements, options: &ComponentOptions) -> DependencyResult<&Self> {
        let _entry = self.entry.lock();

        let base = self.options.defaults.merge(options);
        let flattened = registrar::flatten(elements, &base)?;
        let count = flattened.len();

        let mut registrations = self.registrations.write();
        let cache = self.cache.lock();
        for registration in flattened {
            if cache.contains_key(&registration.path) {
                warn!(
                    container = %self.id,
                    path = %registration.path,
                    "覆盖已缓存单例的注册记录，缓存的实例保持不变"
                );
            }
            debug!(
                path = %registration.path,
                lifetime = %registration.lifetime,
                resolve_as = %registration.resolve_as,
                "注册组件"
            );
            registrations.insert(registration.path.clone(), Arc::new(registration));
        }

        info!(container = %self.id, count, total = registrations.len(), "注册组件完成");
        Ok(self)
    }

    /// 按路径解析组件
    pub fn resolve(&self, path: &str) -> DependencyResult<Instance> {
        let _entry = self.entry.lock();

        let registration = self.registrations.read().get(path).cloned();
        match registration {
            Some(registration) => self.resolve_entered(&registration),
            None => {
                debug!(container = %self.id, path, "组件未注册");
                Err(ResolutionError::new(path, &self.resolution_stack(), ResolutionFailure::NotRegistered).into())
            }
        }
    }

    /// 直接解析注册记录
    ///
    /// 注册记录不必属于当前容器，它的依赖仍从当前容器解析，单例缓存以路径为键。
    pub fn resolve_registration(&self, registration: &Registration) -> DependencyResult<Instance> {
        let _entry = self.entry.lock();
        self.resolve_entered(registration)
    }

    /// 解析组件并转型为具体类型
    pub fn get<T: Any + Send + Sync>(&self, path: &str) -> DependencyResult<Arc<T>> {
        downcast(self.resolve(path)?, path)
    }

    fn resolve_entered(&self, registration: &Registration) -> DependencyResult<Instance> {
        let path = registration.path.as_str();
        let _frame = self.enter(path)?;

        match registration.lifetime {
            Lifetime::Transient => {
                debug!(container = %self.id, path, "解析瞬时组件");
                self.materialize(registration)
            }
            Lifetime::Singleton => {
                let cached = self.cache.lock().get(path).cloned();
                if let Some(instance) = cached {
                    debug!(container = %self.id, path, "命中单例缓存");
                    return Ok(instance);
                }

                debug!(container = %self.id, path, "创建单例组件");
                let instance = self.materialize(registration)?;
                let instance = Arc::clone(
                    self.cache
                        .lock()
                        .entry(path.to_string())
                        .or_insert(instance),
                );
                Ok(instance)
            }
        }
    }

    /// 调用组件目标，必须在当前组件的栈帧内调用
    ///
    /// 依赖树只知道失败的依赖名，这里补上解析栈，错误链从根组件开始。
    fn materialize(&self, registration: &Registration) -> DependencyResult<Instance> {
        self.resolver
            .materialize(registration, self)
            .map_err(|e| match e {
                DependencyError::Resolution(e) => {
                    DependencyError::Resolution(e.within(&self.resolution_stack()))
                }
                other => other,
            })
    }

    fn enter(&self, path: &str) -> DependencyResult<ResolutionFrame<'_>> {
        let mut stack = self.resolution_stack.lock();
        if stack.iter().any(|visited| visited == path) {
            warn!(container = %self.id, path, "检测到循环依赖");
            return Err(ResolutionError::new(path, &stack, ResolutionFailure::CyclicDependency).into());
        }
        stack.push(path.to_string());
        Ok(ResolutionFrame {
            stack: &self.resolution_stack,
        })
    }

    /// 除 `exclude` 外所有已注册路径的选择器
    pub(crate) fn selectors_excluding(&self, exclude: &str) -> Selectors {
        Selectors::from_paths(self.registrations.read().keys().filter(|path| path.as_str() != exclude))
    }

    /// 是否存在以 `prefix.` 开头的注册路径
    pub(crate) fn has_group(&self, prefix: &str) -> bool {
        let prefix = format!("{prefix}{PATH_SEPARATOR}");
        self.registrations
            .read()
            .range(prefix.clone()..)
            .next()
            .is_some_and(|(path, _)| path.starts_with(&prefix))
    }

    /// 当前解析栈的快照
    pub fn resolution_stack(&self) -> Vec<String> {
        self.resolution_stack.lock().clone()
    }

    /// 所有注册记录的快照
    pub fn registrations(&self) -> BTreeMap<String, Arc<Registration>> {
        self.registrations.read().clone()
    }

    /// 按路径取得注册记录
    pub fn registration(&self, path: &str) -> Option<Arc<Registration>> {
        self.registrations.read().get(path).cloned()
    }

    /// 路径是否已注册
    pub fn is_registered(&self, path: &str) -> bool {
        self.registrations.read().contains_key(path)
    }

    /// 路径是否已有缓存的单例
    pub fn is_cached(&self, path: &str) -> bool {
        self.cache.lock().contains_key(path)
    }

    /// 容器选项
    pub const fn options(&self) -> &ContainerOptions {
        &self.options
    }

    /// 容器标识，用于日志关联
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// 作用于整个注册表的惰性查找器
    pub const fn lookup(&self) -> ProxyLookup<'_> {
        ProxyLookup::new(self, None)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new(ContainerOptions::default())
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("id", &self.id)
            .field("options", &self.options)
            .field("resolver", &self.resolver)
            .field("registrations", &self.registrations.read().len())
            .field("cached", &self.cache.lock().len())
            .finish_non_exhaustive()
    }
}

/// 解析栈帧，离开作用域时弹出，失败路径同样生效
struct ResolutionFrame<'a> {
    stack: &'a Mutex<Vec<String>>,
}

impl Drop for ResolutionFrame<'_> {
    fn drop(&mut self) {
        self.stack.lock().pop();
    }
}
