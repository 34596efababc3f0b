//! # 依赖注入具体实现
//!
//! 提供按名称解析的依赖注入容器、容器构建器以及编译输出写入。
//!
//! ## 主要组件
//!
//! - [`DiContainerImpl`] - 线程安全的容器，共享实例缓存在并发映射中
//! - [`DiContainerBuilder`] - 校验定义并构建容器，一次成功或整体失败
//! - [`CompiledContainer`] / [`ProxyManifest`] - 构建时可选写出的产物

pub mod builder;
pub mod container;
pub mod output;

pub use builder::DiContainerBuilder;
pub use container::DiContainerImpl;
pub use output::{CompiledContainer, CompiledDefinition, ProxyManifest, COMPILED_FILE_NAME, PROXIES_FILE_NAME};
