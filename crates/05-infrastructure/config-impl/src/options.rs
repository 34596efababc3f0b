//! 构建选项来源实现

use config_abstractions::{BuildOptionKey, BuildOptions, OptionSource, OptionValue};
use infrastructure_common::{ConfigError, ConfigSection};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// 显式配置来源
#[derive(Debug, Clone, Default)]
pub struct ExplicitOptionSource {
    section: ConfigSection,
}

impl ExplicitOptionSource {
    pub fn new(section: ConfigSection) -> Self {
        Self { section }
    }
}

impl OptionSource for ExplicitOptionSource {
    fn name(&self) -> &str {
        "explicit"
    }

    fn lookup(&self, key: BuildOptionKey) -> Result<Option<OptionValue>, ConfigError> {
        if key.is_path() {
            Ok(self
                .section
                .get_path(key.config_key())?
                .map(|path| OptionValue::Path(Some(path))))
        } else {
            Ok(self.section.get_bool(key.config_key())?.map(OptionValue::Flag))
        }
    }
}

/// 环境变量来源
///
/// 布尔选项只有字面量 `"true"` 为真；路径选项为空字符串时视为未设置。
#[derive(Debug, Clone, Default)]
pub struct EnvironmentOptionSource {
    env_vars: HashMap<String, String>,
}

impl EnvironmentOptionSource {
    /// 读取当前进程的环境变量快照
    pub fn new() -> Self {
        let env_vars: HashMap<String, String> = BuildOptionKey::ALL
            .iter()
            .filter_map(|key| {
                std::env::var(key.env_var())
                    .ok()
                    .map(|value| (key.env_var().to_string(), value))
            })
            .collect();

        debug!("加载了 {} 个容器构建环境变量", env_vars.len());
        Self { env_vars }
    }

    /// 使用给定的变量表
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            env_vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl OptionSource for EnvironmentOptionSource {
    fn name(&self) -> &str {
        "environment"
    }

    fn lookup(&self, key: BuildOptionKey) -> Result<Option<OptionValue>, ConfigError> {
        let Some(value) = self.env_vars.get(key.env_var()) else {
            return Ok(None);
        };

        if key.is_path() {
            if value.is_empty() {
                return Ok(None);
            }
            Ok(Some(OptionValue::Path(Some(PathBuf::from(value)))))
        } else {
            Ok(Some(OptionValue::Flag(value == "true")))
        }
    }
}

/// 默认值来源：布尔选项为 false，路径选项为空
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultOptionSource;

impl OptionSource for DefaultOptionSource {
    fn name(&self) -> &str {
        "default"
    }

    fn lookup(&self, key: BuildOptionKey) -> Result<Option<OptionValue>, ConfigError> {
        if key.is_path() {
            Ok(Some(OptionValue::Path(None)))
        } else {
            Ok(Some(OptionValue::Flag(false)))
        }
    }
}

/// 构建选项解析器
///
/// 来源按添加顺序求值，每个选项取第一个给出值的来源。
#[derive(Default)]
pub struct BuildOptionsResolver {
    sources: Vec<Box<dyn OptionSource>>,
}

impl BuildOptionsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 标准来源链：显式配置 → 环境变量 → 默认值
    pub fn standard(explicit: Option<ConfigSection>) -> Self {
        let mut resolver = Self::new();
        if let Some(section) = explicit {
            resolver = resolver.with_source(ExplicitOptionSource::new(section));
        }
        resolver
            .with_source(EnvironmentOptionSource::new())
            .with_source(DefaultOptionSource)
    }

    pub fn with_source<S: OptionSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn with_boxed_source(mut self, source: Box<dyn OptionSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn resolve(&self) -> Result<BuildOptions, ConfigError> {
        let mut options = BuildOptions::default();
        for key in BuildOptionKey::ALL {
            for source in &self.sources {
                if let Some(value) = source.lookup(key)? {
                    debug!("选项 {} 来自 {}: {:?}", key.config_key(), source.name(), value);
                    options.set(key, value)?;
                    break;
                }
            }
        }
        Ok(options)
    }
}

impl std::fmt::Debug for BuildOptionsResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildOptionsResolver")
            .field("sources", &self.source_names())
            .finish()
    }
}
