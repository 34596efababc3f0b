//! # Configuration Implementation
//!
//! 定义收集的具体实现：定义文件加载、清单与包列表读取、构建选项解析。
//!
//! ## 主要组件
//!
//! - [`ConfigCollector`] - 发现并合并应用与已安装包的定义
//! - [`FileDefinitionSource`] - JSON / TOML 定义文件来源
//! - [`InstalledJsonRepository`] - 包管理器的已安装包列表
//! - [`BuildOptionsResolver`] - 显式配置 → 环境变量 → 默认值

pub mod collector;
pub mod environment;
pub mod options;
pub mod providers;
pub mod repository;

pub use collector::*;
pub use environment::*;
pub use options::*;
pub use providers::*;
pub use repository::*;

#[cfg(test)]
mod tests;
