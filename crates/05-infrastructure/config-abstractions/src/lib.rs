//! # Configuration Abstractions
//!
//! 定义收集抽象层：定义来源、包仓库以及构建选项来源。
//!
//! ## 核心接口
//!
//! - [`DefinitionSource`] - 定义来源
//! - [`PackageRepository`] - 已安装包枚举
//! - [`OptionSource`] - 构建选项来源

pub mod options;
pub mod package;
pub mod provider;

pub use options::*;
pub use package::*;
pub use provider::*;
