//! 依赖注入容器抽象接口
//!
//! 提供依赖注入容器的核心抽象

use crate::definition::DefinitionMap;
use crate::factory::FactoryRegistry;
use crate::resolver::Resolver;
use infrastructure_common::DependencyError;
use std::path::PathBuf;

/// 依赖注入容器 trait
pub trait DiContainer: Resolver + Send + Sync {
    /// 容器中的全部定义
    fn definitions(&self) -> &DefinitionMap;

    /// 构建容器时使用的配置
    fn config(&self) -> &ContainerConfig;

    /// 当前已缓存的共享实例数量
    fn shared_instance_count(&self) -> usize;
}

/// 容器构建器 trait
pub trait ContainerBuilder: Send {
    /// 关联的容器类型
    type Container: DiContainer;

    /// 设置容器配置
    fn with_config(self, config: ContainerConfig) -> Self
    where
        Self: Sized;

    /// 添加定义，同名定义后添加者覆盖
    fn add_definitions(self, definitions: DefinitionMap) -> Self
    where
        Self: Sized;

    /// 添加命名工厂
    fn with_factories(self, factories: FactoryRegistry) -> Self
    where
        Self: Sized;

    /// 构建容器
    fn build(self) -> Result<Self::Container, DependencyError>;
}

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerConfig {
    /// 未定义的名称可以回退到同名的已注册工厂
    pub use_autowiring: bool,
    /// 注解扫描开关（仅记录，不扫描）
    pub use_annotations: bool,
    /// 忽略文档注释错误（仅记录）
    pub ignore_phpdoc_errors: bool,
    /// 是否写出编译后的定义表
    pub enable_compilation: bool,
    /// 编译输出目录
    pub compile_to: Option<PathBuf>,
    /// 是否写出延迟代理清单
    pub enable_writing_proxies: bool,
    /// 代理清单输出目录
    pub write_proxies_to: Option<PathBuf>,
    /// 最大解析深度
    pub max_resolution_depth: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            use_autowiring: false,
            use_annotations: false,
            ignore_phpdoc_errors: false,
            enable_compilation: false,
            compile_to: None,
            enable_writing_proxies: false,
            write_proxies_to: None,
            max_resolution_depth: 100,
        }
    }
}

impl ContainerConfig {
    /// 编译输出目录；未启用或未配置目录时返回 `None`
    pub fn compilation_target(&self) -> Option<&PathBuf> {
        self.compile_to.as_ref().filter(|_| self.enable_compilation)
    }

    /// 代理清单输出目录；未启用或未配置目录时返回 `None`
    pub fn proxies_target(&self) -> Option<&PathBuf> {
        self.write_proxies_to
            .as_ref()
            .filter(|_| self.enable_writing_proxies)
    }
}
