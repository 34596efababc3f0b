//! 已安装包仓库实现

use config_abstractions::{PackageDescriptor, PackageRepository};
use infrastructure_common::ConfigError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

/// 包管理器本地仓库列表（installed.json）
///
/// 支持两种结构：包数组，或 `{"packages": [...]}`。
/// `install-path` 相对于列表文件所在目录；缺省为 `<vendor>/<name>`，
/// 其中 vendor 目录取列表文件目录的上一级。
#[derive(Debug, Clone)]
pub struct InstalledJsonRepository {
    listing_path: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstalledListing {
    Wrapped { packages: Vec<InstalledPackage> },
    Bare(Vec<InstalledPackage>),
}

#[derive(Debug, Deserialize)]
struct InstalledPackage {
    name: String,
    #[serde(default, rename = "install-path")]
    install_path: Option<String>,
    #[serde(default)]
    extra: Option<Value>,
}

impl InstalledJsonRepository {
    pub fn new(listing_path: impl Into<PathBuf>) -> Self {
        Self {
            listing_path: listing_path.into(),
        }
    }

    pub fn listing_path(&self) -> &Path {
        &self.listing_path
    }

    fn unavailable(&self, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> ConfigError {
        ConfigError::PackageRepositoryUnavailable {
            path: self.listing_path.clone(),
            source: source.into(),
        }
    }

    fn descriptor(&self, package: InstalledPackage) -> PackageDescriptor {
        let listing_dir = self
            .listing_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let install_path = match package.install_path {
            Some(relative) => normalize(&listing_dir.join(relative)),
            None => {
                let vendor_dir = listing_dir.parent().unwrap_or(&listing_dir);
                vendor_dir.join(&package.name)
            }
        };

        let extra = match package.extra {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        PackageDescriptor {
            name: package.name,
            install_path,
            extra,
        }
    }
}

impl PackageRepository for InstalledJsonRepository {
    fn packages(&self) -> Result<Vec<PackageDescriptor>, ConfigError> {
        let content = std::fs::read_to_string(&self.listing_path).map_err(|e| self.unavailable(e))?;
        let listing: InstalledListing =
            serde_json::from_str(&content).map_err(|e| self.unavailable(e))?;

        let packages = match listing {
            InstalledListing::Wrapped { packages } | InstalledListing::Bare(packages) => packages,
        };

        debug!(
            "从 {} 读取到 {} 个已安装包",
            self.listing_path.display(),
            packages.len()
        );

        Ok(packages.into_iter().map(|p| self.descriptor(p)).collect())
    }

    fn name(&self) -> &str {
        "InstalledJsonRepository"
    }
}

/// 内存包仓库，按给定顺序返回
#[derive(Debug, Clone, Default)]
pub struct StaticPackageRepository {
    packages: Vec<PackageDescriptor>,
}

impl StaticPackageRepository {
    pub fn new(packages: Vec<PackageDescriptor>) -> Self {
        Self { packages }
    }
}

impl PackageRepository for StaticPackageRepository {
    fn packages(&self) -> Result<Vec<PackageDescriptor>, ConfigError> {
        Ok(self.packages.clone())
    }

    fn name(&self) -> &str {
        "StaticPackageRepository"
    }
}

/// 折叠路径中的 `.` 与 `..`，不访问文件系统
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
