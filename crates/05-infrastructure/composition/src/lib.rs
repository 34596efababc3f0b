//! # 基础设施组合层
//!
//! 将定义收集、构建选项解析和容器实现组合成对外的依赖注入门面。
//!
//! ## 主要功能
//!
//! - **容器门面**: [`Di`] 延迟构建并缓存容器，提供 `get` / `make` / `has`
//! - **门面构建器**: [`DiBuilder`] 配置应用根目录、定义文件键、工厂和构建选项
//! - **全局门面**: [`global`] / [`install_global`]
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_composition::Di;
//!
//! struct Logger;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let di = Di::builder()
//!         .with_base_path("/srv/app")
//!         .register_factory("app.logger", |_| Ok(Logger))
//!         .build();
//!
//!     if di.has("logger")? {
//!         let _logger = di.get_as::<Logger>("logger")?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod facade;
pub mod global;

pub use builder::DiBuilder;
pub use facade::Di;
pub use global::{global, install_global, reset_global};

// 重新导出常用类型
pub use di_abstractions::{Definition, DefinitionMap, FactoryRegistry, Instance, Resolver, ResolverExt};
pub use infrastructure_common::{set_app_base_path, DiError, DiOperation};
