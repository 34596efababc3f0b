//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义依赖定义模型和按名称解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`Definition`] / [`DefinitionMap`] - 依赖定义与定义表
//! - [`Resolver`] - 按名称解析依赖
//! - [`DiContainer`] / [`ContainerBuilder`] - 容器与构建器
//! - [`FactoryRegistry`] - 命名工厂注册表

pub mod container;
pub mod definition;
pub mod factory;
pub mod resolver;

pub use container::*;
pub use definition::*;
pub use factory::*;
pub use resolver::*;
