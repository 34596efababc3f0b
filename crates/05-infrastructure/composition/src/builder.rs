//! 容器门面构建器

use crate::facade::Di;
use config_abstractions::OptionSource;
use config_impl::{
    BuildOptionsResolver, ConfigCollector, DefaultOptionSource, EnvironmentOptionSource,
    ExplicitOptionSource, DEFAULT_CONFIG_KEY,
};
use di_abstractions::{Definition, DefinitionMap, FactoryRegistry, Resolver};
use infrastructure_common::ConfigSection;
use std::path::PathBuf;
use tracing::debug;

/// 容器门面构建器
///
/// 使用建造者模式配置定义收集、工厂注册表和构建选项来源。
pub struct DiBuilder {
    /// 定义收集器
    collector: ConfigCollector,
    /// 清单额外元数据中的定义文件键
    config_key: String,
    /// 命名工厂
    factories: FactoryRegistry,
    /// 显式构建选项，优先于其他来源
    explicit_options: Option<ConfigSection>,
    /// 自定义选项来源，位于显式配置之后、环境变量之前
    option_sources: Vec<Box<dyn OptionSource>>,
    /// 是否读取环境变量
    use_environment: bool,
    /// 每次构建都追加的定义，覆盖收集到的定义
    definitions: DefinitionMap,
}

impl DiBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            collector: ConfigCollector::new(),
            config_key: DEFAULT_CONFIG_KEY.to_string(),
            factories: FactoryRegistry::new(),
            explicit_options: None,
            option_sources: Vec::new(),
            use_environment: true,
            definitions: DefinitionMap::new(),
        }
    }

    /// 替换定义收集器
    pub fn with_collector(mut self, collector: ConfigCollector) -> Self {
        self.collector = collector;
        self
    }

    /// 设置应用根目录
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.collector = self.collector.with_base_path(path);
        self
    }

    /// 设置定义文件键，默认为 `diConfigFilePath`
    pub fn with_config_key(mut self, key: impl Into<String>) -> Self {
        self.config_key = key.into();
        self
    }

    /// 合并命名工厂
    pub fn with_factories(mut self, factories: FactoryRegistry) -> Self {
        self.factories.extend(factories);
        self
    }

    /// 注册单个命名工厂
    pub fn register_factory<T, F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        self.factories.register(name, factory);
        self
    }

    /// 设置显式构建选项（`useAutoWiring`、`compileTo` 等）
    pub fn with_options(mut self, options: ConfigSection) -> Self {
        self.explicit_options = Some(options);
        self
    }

    /// 添加自定义选项来源
    pub fn with_option_source<S: OptionSource + 'static>(mut self, source: S) -> Self {
        self.option_sources.push(Box::new(source));
        self
    }

    /// 不读取进程环境变量
    pub fn without_environment(mut self) -> Self {
        self.use_environment = false;
        self
    }

    /// 追加在代码中提供的定义
    pub fn with_definitions(mut self, definitions: DefinitionMap) -> Self {
        self.definitions.merge(definitions);
        self
    }

    /// 追加单个定义
    pub fn define(mut self, name: impl Into<String>, definition: Definition) -> Self {
        self.definitions.insert(name, definition);
        self
    }

    fn options_resolver(
        explicit: Option<ConfigSection>,
        sources: Vec<Box<dyn OptionSource>>,
        use_environment: bool,
    ) -> BuildOptionsResolver {
        let mut resolver = BuildOptionsResolver::new();
        if let Some(section) = explicit {
            resolver = resolver.with_source(ExplicitOptionSource::new(section));
        }
        for source in sources {
            resolver = resolver.with_boxed_source(source);
        }
        if use_environment {
            resolver = resolver.with_source(EnvironmentOptionSource::new());
        }
        resolver.with_source(DefaultOptionSource)
    }

    /// 构建门面；容器在第一次访问时才构建
    pub fn build(self) -> Di {
        let options = Self::options_resolver(
            self.explicit_options,
            self.option_sources,
            self.use_environment,
        );
        debug!(
            "创建容器门面: 键 {}, 选项来源 {:?}, {} 个工厂",
            self.config_key,
            options.source_names(),
            self.factories.len()
        );
        Di::from_parts(
            self.collector,
            self.config_key,
            self.factories,
            options,
            self.definitions,
        )
    }
}

impl Default for DiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DiBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiBuilder")
            .field("collector", &self.collector)
            .field("config_key", &self.config_key)
            .field("factories", &self.factories)
            .field("explicit_options", &self.explicit_options)
            .field(
                "option_sources",
                &self.option_sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("use_environment", &self.use_environment)
            .field("definitions", &self.definitions.len())
            .finish()
    }
}
