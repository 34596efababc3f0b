//! 容器实现

use di_abstractions::{
    ContainerConfig, DefinitionMap, DiContainer, FactoryFn, Instance, ResolveContext, Resolver,
};
use infrastructure_common::DependencyError;
use dashmap::DashMap;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// 构建后的条目，命名工厂已经替换为工厂函数
#[derive(Clone)]
pub(crate) enum Entry {
    Value(Arc<Value>),
    Factory { func: FactoryFn, shared: bool },
    Alias(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Shared,
    Fresh,
}

/// 具体的依赖注入容器实现
pub struct DiContainerImpl {
    definitions: DefinitionMap,
    entries: HashMap<String, Entry>,
    config: ContainerConfig,
    /// 共享实例，先写入者保留
    shared: DashMap<String, Instance>,
}

impl DiContainerImpl {
    pub(crate) fn new(
        definitions: DefinitionMap,
        entries: HashMap<String, Entry>,
        config: ContainerConfig,
    ) -> Self {
        Self {
            definitions,
            entries,
            config,
            shared: DashMap::new(),
        }
    }

    /// 可解析的全部名称（包括自动装配的工厂），按名称排序
    pub fn entry_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn scope(&self) -> ResolutionScope<'_> {
        ResolutionScope {
            container: self,
            context: RefCell::new(ResolveContext::new(self.config.max_resolution_depth)),
        }
    }

    fn resolve(&self, name: &str, mode: Mode, scope: &ResolutionScope<'_>) -> Result<Instance, DependencyError> {
        scope.context.borrow_mut().push_name(name)?;
        let result = self.resolve_entry(name, mode, scope);
        scope.context.borrow_mut().pop_name();
        result
    }

    fn resolve_entry(&self, name: &str, mode: Mode, scope: &ResolutionScope<'_>) -> Result<Instance, DependencyError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| DependencyError::ComponentNotRegistered {
                name: name.to_string(),
            })?;

        match entry {
            Entry::Value(value) => match mode {
                Mode::Shared => Ok(Arc::clone(value) as Instance),
                Mode::Fresh => Ok(Arc::new(value.as_ref().clone()) as Instance),
            },
            Entry::Alias(target) => {
                trace!("别名 {} -> {}", name, target);
                self.resolve(target, mode, scope)
            }
            Entry::Factory { func, shared } => {
                if mode == Mode::Fresh || !shared {
                    return self.invoke(name, func, scope);
                }

                if let Some(instance) = self.shared.get(name) {
                    return Ok(Arc::clone(instance.value()));
                }

                // 工厂调用期间不持有缓存锁，工厂可以再次解析其他共享定义
                let instance = self.invoke(name, func, scope)?;
                let stored = Arc::clone(self.shared.entry(name.to_string()).or_insert(instance).value());
                debug!("缓存共享实例: {}", name);
                Ok(stored)
            }
        }
    }

    fn invoke(&self, name: &str, func: &FactoryFn, scope: &ResolutionScope<'_>) -> Result<Instance, DependencyError> {
        func(scope).map_err(|error| match error.downcast::<DependencyError>() {
            Ok(
                error @ (DependencyError::CircularDependency { .. }
                | DependencyError::ResolutionDepthExceeded { .. }),
            ) => error,
            Ok(other) => DependencyError::ComponentCreationFailed {
                name: name.to_string(),
                source: Box::new(other),
            },
            Err(other) => DependencyError::ComponentCreationFailed {
                name: name.to_string(),
                source: other.into(),
            },
        })
    }
}

impl Resolver for DiContainerImpl {
    fn get(&self, name: &str) -> Result<Instance, DependencyError> {
        let scope = self.scope();
        self.resolve(name, Mode::Shared, &scope)
    }

    fn make(&self, name: &str) -> Result<Instance, DependencyError> {
        let scope = self.scope();
        self.resolve(name, Mode::Fresh, &scope)
    }

    fn has(&self, name: &str) -> Result<bool, DependencyError> {
        Ok(self.entries.contains_key(name))
    }
}

impl DiContainer for DiContainerImpl {
    fn definitions(&self) -> &DefinitionMap {
        &self.definitions
    }

    fn config(&self) -> &ContainerConfig {
        &self.config
    }

    fn shared_instance_count(&self) -> usize {
        self.shared.len()
    }
}

impl fmt::Debug for DiContainerImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiContainerImpl")
            .field("entries", &self.entry_names())
            .field("config", &self.config)
            .field("shared_instances", &self.shared.len())
            .finish()
    }
}

/// 单次顶层解析的作用域
///
/// 工厂通过它解析自身依赖，整个调用树共享同一条解析链。
struct ResolutionScope<'a> {
    container: &'a DiContainerImpl,
    context: RefCell<ResolveContext>,
}

impl Resolver for ResolutionScope<'_> {
    fn get(&self, name: &str) -> Result<Instance, DependencyError> {
        self.container.resolve(name, Mode::Shared, self)
    }

    fn make(&self, name: &str) -> Result<Instance, DependencyError> {
        self.container.resolve(name, Mode::Fresh, self)
    }

    fn has(&self, name: &str) -> Result<bool, DependencyError> {
        self.container.has(name)
    }
}
