//! 定义收集器
//!
//! 从应用清单和已安装包的额外元数据中发现定义文件并合并。
//! 合并顺序：已安装包按包管理器报告的顺序，最后是应用自身，
//! 因此应用定义总是覆盖包提供的默认定义。

use crate::environment::{BasePathResolver, WorkingDirGuard};
use crate::providers::FileDefinitionSource;
use crate::repository::InstalledJsonRepository;
use config_abstractions::{AppManifest, DefinitionSource, PackageRepository};
use di_abstractions::DefinitionMap;
use infrastructure_common::ConfigError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 默认的额外元数据键
pub const DEFAULT_CONFIG_KEY: &str = "diConfigFilePath";

/// 解析根目录与收集期间持有，工作目录切换是进程级副作用
static COLLECTION_LOCK: once_cell::sync::Lazy<parking_lot::Mutex<()>> =
    once_cell::sync::Lazy::new(|| parking_lot::Mutex::new(()));

/// 清单布局
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLayout {
    /// 应用清单文件，相对于应用根目录
    pub manifest_file: PathBuf,
    /// 包管理器的已安装包列表，相对于应用根目录
    pub installed_listing: PathBuf,
}

impl Default for ManifestLayout {
    fn default() -> Self {
        Self {
            manifest_file: PathBuf::from("composer.json"),
            installed_listing: PathBuf::from("vendor/composer/installed.json"),
        }
    }
}

/// 定义收集器
#[derive(Clone, Default)]
pub struct ConfigCollector {
    base_path: BasePathResolver,
    layout: ManifestLayout,
    repository: Option<Arc<dyn PackageRepository>>,
}

impl std::fmt::Debug for ConfigCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigCollector")
            .field("base_path", &self.base_path)
            .field("layout", &self.layout)
            .field("repository", &self.repository.as_ref().map(|r| r.name().to_string()))
            .finish()
    }
}

impl ConfigCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用显式应用根目录
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = BasePathResolver::explicit(path);
        self
    }

    pub fn with_layout(mut self, layout: ManifestLayout) -> Self {
        self.layout = layout;
        self
    }

    /// 替换默认的 installed.json 包仓库
    pub fn with_repository<R: PackageRepository + 'static>(mut self, repository: R) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    /// 解析应用根目录
    pub fn base_path(&self) -> Result<PathBuf, ConfigError> {
        self.base_path.resolve()
    }

    /// 收集并合并全部定义
    pub fn collect(&self, key: &str) -> Result<DefinitionMap, ConfigError> {
        let _lock = COLLECTION_LOCK.lock();
        let base_path = self.base_path.resolve()?;
        let _working_dir = WorkingDirGuard::enter(&base_path)?;

        let sources = self.discover(&base_path, key)?;
        let mut merged = DefinitionMap::new();
        for source in &sources {
            merged.merge(source.contribute()?);
        }

        info!(
            "定义收集完成: 键 {}, {} 个来源, {} 个定义",
            key,
            sources.len(),
            merged.len()
        );
        Ok(merged)
    }

    /// 发现定义来源（按合并顺序），不加载文件内容
    pub fn sources(&self, key: &str) -> Result<Vec<FileDefinitionSource>, ConfigError> {
        let _lock = COLLECTION_LOCK.lock();
        let base_path = self.base_path.resolve()?;
        let _working_dir = WorkingDirGuard::enter(&base_path)?;
        self.discover(&base_path, key)
    }

    /// 读取应用清单；缺失或无法解析时按空清单处理
    pub fn read_manifest(&self, base_path: &Path) -> AppManifest {
        let manifest_path = base_path.join(&self.layout.manifest_file);
        let content = match std::fs::read_to_string(&manifest_path) {
            Ok(content) => content,
            Err(e) => {
                debug!("应用清单不可读: {}, 原因: {}", manifest_path.display(), e);
                return AppManifest::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("应用清单解析失败: {}, 原因: {}", manifest_path.display(), e);
            AppManifest::default()
        })
    }

    fn discover(&self, base_path: &Path, key: &str) -> Result<Vec<FileDefinitionSource>, ConfigError> {
        let manifest = self.read_manifest(base_path);
        let application = manifest
            .resolve_extra_path(base_path, key)
            .filter(|path| path.is_file())
            .map(FileDefinitionSource::application);

        let mut sources = Vec::new();
        for package in self.repository(base_path).packages()? {
            match package.resolve_extra_path(key).filter(|path| path.is_file()) {
                Some(path) => {
                    debug!("包 {} 提供定义文件: {}", package.name, path.display());
                    sources.push(FileDefinitionSource::package(package.name, path));
                }
                None => debug!("包 {} 未提供定义文件", package.name),
            }
        }

        match application {
            Some(source) => {
                debug!("应用定义文件: {}", source.file_path().display());
                sources.push(source);
            }
            None => debug!("应用清单未配置 extra.{}", key),
        }

        Ok(sources)
    }

    fn repository(&self, base_path: &Path) -> Arc<dyn PackageRepository> {
        match &self.repository {
            Some(repository) => Arc::clone(repository),
            None => Arc::new(InstalledJsonRepository::new(
                base_path.join(&self.layout.installed_listing),
            )),
        }
    }
}
