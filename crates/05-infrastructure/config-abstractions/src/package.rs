//! 包描述与应用清单

use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// 已安装包描述
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDescriptor {
    /// 包名称
    pub name: String,
    /// 安装目录
    pub install_path: PathBuf,
    /// 额外元数据块
    pub extra: Map<String, Value>,
}

impl PackageDescriptor {
    pub fn new(name: impl Into<String>, install_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            install_path: install_path.into(),
            extra: Map::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// 额外元数据中的相对路径
    pub fn extra_path(&self, key: &str) -> Option<&str> {
        extra_path(&self.extra, key)
    }

    /// 额外元数据指向的文件，相对于安装目录
    pub fn resolve_extra_path(&self, key: &str) -> Option<PathBuf> {
        self.extra_path(key).map(|relative| self.install_path.join(relative))
    }
}

/// 应用清单
///
/// 只关心 `extra` 节，其余字段忽略。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppManifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl AppManifest {
    /// 额外元数据中的相对路径
    pub fn extra_path(&self, key: &str) -> Option<&str> {
        extra_path(&self.extra, key)
    }

    /// 额外元数据指向的文件，相对于应用根目录
    pub fn resolve_extra_path(&self, base_path: &Path, key: &str) -> Option<PathBuf> {
        self.extra_path(key).map(|relative| base_path.join(relative))
    }
}

fn extra_path<'a>(extra: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    extra
        .get(key)
        .and_then(Value::as_str)
        .filter(|path| !path.is_empty())
}
