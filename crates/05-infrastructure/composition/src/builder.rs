//! 容器构建器

use di_abstractions::Elements;
use di_impl::Container;
use infrastructure_common::{
    ComponentOptions, ConfigError, ContainerOptions, InfrastructureError, InfrastructureResult,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// 容器选项所在的配置节
pub const CONTAINER_SECTION: &str = "container";

/// 容器构建器
///
/// 容器选项按以下顺序逐层覆盖：配置文件（按添加顺序）、环境变量、显式选项。
pub struct ContainerBuilder {
    /// 配置文件列表
    config_files: Vec<PathBuf>,
    /// 环境变量前缀
    env_prefix: Option<String>,
    /// 显式容器选项
    options: Option<ContainerOptions>,
    /// 构建后立即注册的组件批次
    batches: Vec<(Elements, ComponentOptions)>,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl ContainerBuilder {
    /// 创建新的容器构建器
    pub fn new() -> Self {
        Self {
            config_files: Vec::new(),
            env_prefix: None,
            options: None,
            batches: Vec::new(),
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 添加配置文件，格式由扩展名决定（toml / json / yaml）
    pub fn add_config_file<P: AsRef<Path>>(mut self, path: P) -> InfrastructureResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        info!("添加配置文件: {}", path.display());
        self.config_files.push(path.to_path_buf());
        Ok(self)
    }

    /// 添加环境变量配置源
    ///
    /// 前缀与键之间以 `_` 分隔，层级之间以 `__` 分隔，例如
    /// `ADSP_DI_CONTAINER__INJECTION_MODE=proxy`。
    pub fn add_config_env_vars<S: Into<String>>(mut self, prefix: S) -> Self {
        let prefix = prefix.into();
        info!("添加环境变量配置源，前缀: {}", prefix);
        self.env_prefix = Some(prefix);
        self
    }

    /// 设置显式容器选项，覆盖所有配置源
    pub fn with_options(mut self, options: ContainerOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// 构建后注册组件树
    pub fn register(self, elements: Elements) -> Self {
        self.register_with(elements, ComponentOptions::new())
    }

    /// 构建后以指定选项注册组件树
    pub fn register_with(mut self, elements: Elements, options: ComponentOptions) -> Self {
        debug!("添加组件批次，元素数量: {}", elements.len());
        self.batches.push((elements, options));
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true;
        self
    }

    /// 从配置源加载容器选项
    ///
    /// 所有配置源都没有 `container` 配置节时使用默认选项。
    pub fn load_options(&self) -> InfrastructureResult<ContainerOptions> {
        if let Some(options) = self.options {
            debug!("使用显式容器选项");
            return Ok(options);
        }

        let mut builder = config::Config::builder();
        for path in &self.config_files {
            builder = builder.add_source(config::File::from(path.as_path()));
        }
        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        let settings = builder.build().map_err(|e| ConfigError::ParseError {
            source: Box::new(e),
        })?;

        match settings.get::<ContainerOptions>(CONTAINER_SECTION) {
            Ok(options) => {
                debug!("加载容器选项: {:?}", options);
                Ok(options)
            }
            Err(config::ConfigError::NotFound(_)) => {
                debug!("未找到 {} 配置节，使用默认容器选项", CONTAINER_SECTION);
                Ok(ContainerOptions::default())
            }
            Err(e) => Err(ConfigError::ParseError {
                source: Box::new(e),
            }
            .into()),
        }
    }

    /// 构建容器
    pub fn build(self) -> InfrastructureResult<Container> {
        info!("开始构建依赖注入容器");

        // 只有在明确配置了日志时才初始化日志，避免在测试环境中重复初始化
        if self.logging_enabled {
            self.initialize_logging()?;
        }

        let options = self.load_options()?;
        let container = Container::new(options);

        for (elements, options) in &self.batches {
            container.register_with(elements, options)?;
        }

        info!(
            "依赖注入容器构建完成: {}，注入模式: {}，注册数量: {}",
            container.id(),
            options.injection_mode,
            container.registrations().len()
        );
        Ok(container)
    }

    /// 初始化日志系统
    fn initialize_logging(&self) -> InfrastructureResult<()> {
        let filter = match &self.logging_config.directives {
            Some(directives) => {
                EnvFilter::try_new(directives).map_err(|e| InfrastructureError::BootstrapFailed {
                    message: format!("日志过滤规则无效: {}", e),
                })?
            }
            None => EnvFilter::default().add_directive(LevelFilter::from_level(self.logging_config.level).into()),
        };

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(self.logging_config.show_target)
            .with_thread_ids(self.logging_config.show_thread_ids)
            .with_file(self.logging_config.show_file)
            .with_line_number(self.logging_config.show_line_number);

        if self.logging_config.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .map_err(|e| InfrastructureError::BootstrapFailed {
            message: format!("日志初始化失败: {}", e),
        })?;

        info!("日志系统初始化完成");
        Ok(())
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别，未设置过滤规则时生效
    pub level: tracing::Level,
    /// 过滤规则，例如 `di_impl=debug,info`
    pub directives: Option<String>,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            directives: None,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 开发环境：输出容器内部的解析过程
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            directives: Some("di_impl=debug,di_abstractions=debug,info".to_string()),
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 生产环境
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            directives: None,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 设置过滤规则
    pub fn with_directives(mut self, directives: impl Into<String>) -> Self {
        self.directives = Some(directives.into());
        self
    }
}
