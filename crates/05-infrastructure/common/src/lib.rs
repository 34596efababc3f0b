//! # Infrastructure Common
//!
//! 依赖注入基础设施的公共错误类型与配置工具。
//!
//! ## 核心内容
//!
//! - [`ConfigError`] / [`DependencyError`] - 收集与解析阶段的错误
//! - [`DiError`] - 门面对外暴露的唯一错误类型
//! - [`ConfigSection`] - 扁平配置节
//! - [`set_app_base_path`] - 进程级应用根目录

pub mod configuration;
pub mod errors;

pub use configuration::*;
pub use errors::*;

use std::path::{Path, PathBuf};

/// 全局应用根目录
static GLOBAL_APP_BASE_PATH: once_cell::sync::Lazy<parking_lot::RwLock<Option<PathBuf>>> =
    once_cell::sync::Lazy::new(|| parking_lot::RwLock::new(None));

/// 获取全局应用根目录
pub fn app_base_path() -> Option<PathBuf> {
    GLOBAL_APP_BASE_PATH.read().clone()
}

/// 设置全局应用根目录
///
/// 设置后，未显式指定根目录的配置收集器优先使用此路径。
pub fn set_app_base_path(path: impl AsRef<Path>) {
    *GLOBAL_APP_BASE_PATH.write() = Some(path.as_ref().to_path_buf());
}

/// 清除全局应用根目录
pub fn clear_app_base_path() {
    *GLOBAL_APP_BASE_PATH.write() = None;
}
