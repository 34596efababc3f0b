//! 容器构建器实现

use crate::container::{DiContainerImpl, Entry};
use crate::output;
use di_abstractions::{
    ContainerBuilder, ContainerConfig, Definition, DefinitionMap, FactoryRef, FactoryRegistry,
};
use infrastructure_common::DependencyError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info};

/// 容器构建器实现
///
/// 构建是整体的：任何一个定义无法解析为条目时都不会产生容器。
#[derive(Debug, Default)]
pub struct DiContainerBuilder {
    config: ContainerConfig,
    definitions: DefinitionMap,
    factories: FactoryRegistry,
}

impl DiContainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn compile_entries(&self) -> Result<HashMap<String, Entry>, DependencyError> {
        let mut entries = HashMap::with_capacity(self.definitions.len());

        for (name, definition) in self.definitions.iter() {
            let entry = match definition {
                Definition::Value(value) => Entry::Value(Arc::new(value.clone())),
                Definition::Alias(target) => Entry::Alias(target.clone()),
                Definition::Factory {
                    factory: FactoryRef::Func(func),
                    shared,
                } => Entry::Factory {
                    func: Arc::clone(func),
                    shared: *shared,
                },
                Definition::Factory {
                    factory: FactoryRef::Named(factory),
                    shared,
                } => {
                    let func = self.factories.get(factory).ok_or_else(|| {
                        DependencyError::UnknownFactory {
                            name: name.clone(),
                            factory: factory.clone(),
                        }
                    })?;
                    Entry::Factory {
                        func: Arc::clone(func),
                        shared: *shared,
                    }
                }
            };
            entries.insert(name.clone(), entry);
        }

        if self.config.use_autowiring {
            for name in self.factories.names() {
                if entries.contains_key(name) {
                    continue;
                }
                if let Some(func) = self.factories.get(name) {
                    debug!("自动装配工厂: {}", name);
                    entries.insert(
                        name.to_string(),
                        Entry::Factory {
                            func: Arc::clone(func),
                            shared: true,
                        },
                    );
                }
            }
        }

        Ok(entries)
    }

    fn log_options(&self) {
        if self.config.use_annotations {
            info!("已启用注解选项，本容器不执行注解扫描");
        }
        if self.config.ignore_phpdoc_errors {
            debug!("已启用忽略文档注释错误选项");
        }
        debug!("容器配置: {:?}", self.config);
    }
}

/// 检查全部别名：目标必须存在且别名链不能成环
fn validate_aliases(entries: &HashMap<String, Entry>) -> Result<(), DependencyError> {
    let mut aliases: Vec<&str> = entries
        .iter()
        .filter(|(_, entry)| matches!(entry, Entry::Alias(_)))
        .map(|(name, _)| name.as_str())
        .collect();
    aliases.sort_unstable();

    for start in aliases {
        let mut chain = vec![start];
        let mut current = start;

        while let Some(Entry::Alias(target)) = entries.get(current) {
            if !entries.contains_key(target) {
                return Err(DependencyError::DanglingAlias {
                    alias: current.to_string(),
                    target: target.clone(),
                });
            }
            if chain.contains(&target.as_str()) {
                chain.push(target.as_str());
                return Err(DependencyError::CircularDependency {
                    dependency_chain: chain.join(" -> "),
                });
            }
            chain.push(target.as_str());
            current = target.as_str();
        }
    }

    Ok(())
}

impl ContainerBuilder for DiContainerBuilder {
    type Container = DiContainerImpl;

    fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    fn add_definitions(mut self, definitions: DefinitionMap) -> Self {
        self.definitions.merge(definitions);
        self
    }

    fn with_factories(mut self, factories: FactoryRegistry) -> Self {
        self.factories.extend(factories);
        self
    }

    fn build(self) -> Result<Self::Container, DependencyError> {
        info!(
            "开始构建容器: {} 个定义, {} 个工厂",
            self.definitions.len(),
            self.factories.len()
        );
        self.log_options();

        let entries = self
            .compile_entries()
            .and_then(|entries| validate_aliases(&entries).map(|_| entries))
            .map_err(|e| {
                error!("容器定义无效: {}", e);
                e
            })?;

        output::write_compiled(&self.config, &self.definitions)?;
        output::write_proxies(&self.config, &self.definitions)?;

        info!("构建容器完成，共 {} 个可解析条目", entries.len());
        Ok(DiContainerImpl::new(self.definitions, entries, self.config))
    }
}
