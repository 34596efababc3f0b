//! 编译输出与代理清单
//!
//! 启用编译时，构建器把合并后的定义表写成 `CompiledContainer.json`；
//! 启用代理写出时，把延迟解析的共享工厂定义写成 `proxies.json`。
//! 未配置输出目录时两者都被静默跳过。

use chrono::{DateTime, Utc};
use di_abstractions::{ContainerConfig, Definition, DefinitionMap, FactoryRef};
use infrastructure_common::DependencyError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 编译输出文件名
pub const COMPILED_FILE_NAME: &str = "CompiledContainer.json";

/// 代理清单文件名
pub const PROXIES_FILE_NAME: &str = "proxies.json";

/// 编译后的单个定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CompiledDefinition {
    Value {
        value: Value,
    },
    Alias {
        target: String,
    },
    Factory {
        /// 代码中直接提供的工厂函数没有名称
        factory: Option<String>,
        shared: bool,
    },
}

impl From<&Definition> for CompiledDefinition {
    fn from(definition: &Definition) -> Self {
        match definition {
            Definition::Value(value) => Self::Value {
                value: value.clone(),
            },
            Definition::Alias(target) => Self::Alias {
                target: target.clone(),
            },
            Definition::Factory { factory, shared } => Self::Factory {
                factory: match factory {
                    FactoryRef::Named(name) => Some(name.clone()),
                    FactoryRef::Func(_) => None,
                },
                shared: *shared,
            },
        }
    }
}

/// 编译后的容器描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledContainer {
    pub compiled_at: DateTime<Utc>,
    pub use_autowiring: bool,
    pub use_annotations: bool,
    pub definitions: BTreeMap<String, CompiledDefinition>,
}

impl CompiledContainer {
    pub fn new(definitions: &DefinitionMap, config: &ContainerConfig) -> Self {
        Self {
            compiled_at: Utc::now(),
            use_autowiring: config.use_autowiring,
            use_annotations: config.use_annotations,
            definitions: definitions
                .iter()
                .map(|(name, definition)| (name.clone(), CompiledDefinition::from(definition)))
                .collect(),
        }
    }
}

/// 延迟代理清单
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyManifest {
    pub generated_at: DateTime<Utc>,
    /// 共享工厂定义名称，按名称排序
    pub proxies: Vec<String>,
}

impl ProxyManifest {
    pub fn new(definitions: &DefinitionMap) -> Self {
        Self {
            generated_at: Utc::now(),
            proxies: definitions
                .iter()
                .filter(|(_, definition)| matches!(definition, Definition::Factory { shared: true, .. }))
                .map(|(name, _)| name.clone())
                .collect(),
        }
    }
}

/// 按配置写出编译结果，返回写入的文件路径
pub(crate) fn write_compiled(
    config: &ContainerConfig,
    definitions: &DefinitionMap,
) -> Result<Option<PathBuf>, DependencyError> {
    if !config.enable_compilation {
        return Ok(None);
    }
    let Some(dir) = config.compilation_target() else {
        debug!("已启用编译但未配置输出目录，跳过编译");
        return Ok(None);
    };

    let path = dir.join(COMPILED_FILE_NAME);
    write_json(&path, &CompiledContainer::new(definitions, config))?;
    info!("容器定义已编译到: {}", path.display());
    Ok(Some(path))
}

/// 按配置写出代理清单，返回写入的文件路径
pub(crate) fn write_proxies(
    config: &ContainerConfig,
    definitions: &DefinitionMap,
) -> Result<Option<PathBuf>, DependencyError> {
    if !config.enable_writing_proxies {
        return Ok(None);
    }
    let Some(dir) = config.proxies_target() else {
        debug!("已启用代理写出但未配置输出目录，跳过代理写出");
        return Ok(None);
    };

    let manifest = ProxyManifest::new(definitions);
    let path = dir.join(PROXIES_FILE_NAME);
    write_json(&path, &manifest)?;
    info!("写出 {} 个延迟代理: {}", manifest.proxies.len(), path.display());
    Ok(Some(path))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), DependencyError> {
    let to_error = |source: Box<dyn std::error::Error + Send + Sync>| DependencyError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| to_error(Box::new(e)))?;
    }
    let content = serde_json::to_string_pretty(value).map_err(|e| to_error(Box::new(e)))?;
    std::fs::write(path, content).map_err(|e| to_error(Box::new(e)))
}
