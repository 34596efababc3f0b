//! 依赖注入容器门面
//!
//! 门面持有已构建的容器，第一次访问时构建，之后一直复用同一个容器，
//! 直到调用 [`Di::build`] 显式重建。对外只暴露 [`DiError`]。

use crate::builder::DiBuilder;
use config_impl::{BuildOptionsResolver, ConfigCollector};
use di_abstractions::{
    downcast, ContainerBuilder, DefinitionMap, DiContainer, FactoryRegistry, Instance, Resolver,
};
use di_impl::{DiContainerBuilder, DiContainerImpl};
use infrastructure_common::DiError;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, error, info};

/// 依赖注入容器门面
pub struct Di {
    collector: ConfigCollector,
    config_key: String,
    factories: FactoryRegistry,
    options: BuildOptionsResolver,
    definitions: DefinitionMap,
    /// 当前容器
    container: RwLock<Option<Arc<DiContainerImpl>>>,
    /// 同一时间只允许一个构建
    build_lock: Mutex<()>,
}

impl Di {
    /// 使用默认配置创建门面
    pub fn new() -> Self {
        DiBuilder::new().build()
    }

    pub fn builder() -> DiBuilder {
        DiBuilder::new()
    }

    pub(crate) fn from_parts(
        collector: ConfigCollector,
        config_key: String,
        factories: FactoryRegistry,
        options: BuildOptionsResolver,
        definitions: DefinitionMap,
    ) -> Self {
        Self {
            collector,
            config_key,
            factories,
            options,
            definitions,
            container: RwLock::new(None),
            build_lock: Mutex::new(()),
        }
    }

    /// 获取容器，必要时先构建
    ///
    /// 在没有调用 [`Di::build`] 的情况下，多次调用返回同一个容器。
    pub fn di_container(&self) -> Result<Arc<DiContainerImpl>, DiError> {
        if let Some(container) = self.current() {
            return Ok(container);
        }

        let _guard = self.build_lock.lock();
        if let Some(container) = self.current() {
            return Ok(container);
        }
        self.build_locked(DefinitionMap::new())
    }

    /// 强制重建容器
    ///
    /// `extra` 中的定义覆盖收集到的定义。失败时保留原来的容器。
    pub fn build(&self, extra: DefinitionMap) -> Result<(), DiError> {
        let _guard = self.build_lock.lock();
        self.build_locked(extra).map(|_| ())
    }

    /// 不追加定义的重建
    pub fn rebuild(&self) -> Result<(), DiError> {
        self.build(DefinitionMap::new())
    }

    /// 容器是否已经构建
    pub fn is_built(&self) -> bool {
        self.container.read().is_some()
    }

    /// 解析共享实例
    pub fn get(&self, name: &str) -> Result<Instance, DiError> {
        let container = self.di_container().map_err(DiError::get)?;
        container.get(name).map_err(DiError::get)
    }

    /// 构造新实例
    pub fn make(&self, name: &str) -> Result<Instance, DiError> {
        let container = self.di_container().map_err(DiError::make)?;
        container.make(name).map_err(DiError::make)
    }

    /// 检查定义是否存在，不会触发解析
    pub fn has(&self, name: &str) -> Result<bool, DiError> {
        let container = self.di_container().map_err(DiError::has)?;
        container.has(name).map_err(DiError::has)
    }

    /// 解析共享实例并向下转型
    pub fn get_as<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, DiError> {
        let instance = self.get(name)?;
        downcast(name, instance).map_err(DiError::get)
    }

    /// 构造新实例并向下转型
    pub fn make_as<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, DiError> {
        let instance = self.make(name)?;
        downcast(name, instance).map_err(DiError::make)
    }

    /// 定义文件键
    pub fn config_key(&self) -> &str {
        &self.config_key
    }

    fn current(&self) -> Option<Arc<DiContainerImpl>> {
        self.container.read().as_ref().map(Arc::clone)
    }

    fn build_locked(&self, extra: DefinitionMap) -> Result<Arc<DiContainerImpl>, DiError> {
        info!("开始构建依赖注入容器: 键 {}", self.config_key);

        let container = match self.construct(extra) {
            Ok(container) => Arc::new(container),
            Err(e) => {
                error!("依赖注入容器构建失败: {}", e.cause());
                return Err(e);
            }
        };

        *self.container.write() = Some(Arc::clone(&container));
        info!(
            "依赖注入容器构建完成: {} 个定义",
            container.definitions().len()
        );
        Ok(container)
    }

    fn construct(&self, extra: DefinitionMap) -> Result<DiContainerImpl, DiError> {
        let definitions = self.collector.collect(&self.config_key).map_err(DiError::build)?;
        let options = self.options.resolve().map_err(DiError::build)?;
        debug!("构建选项: {:?}", options);

        DiContainerBuilder::new()
            .with_config(options.to_container_config())
            .add_definitions(definitions)
            .add_definitions(self.definitions.clone())
            .add_definitions(extra)
            .with_factories(self.factories.clone())
            .build()
            .map_err(DiError::build)
    }
}

impl Default for Di {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Di {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Di")
            .field("collector", &self.collector)
            .field("config_key", &self.config_key)
            .field("factories", &self.factories)
            .field("options", &self.options)
            .field("built", &self.is_built())
            .finish()
    }
}
