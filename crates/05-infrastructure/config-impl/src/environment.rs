//! 应用根目录解析与工作目录切换

use infrastructure_common::ConfigError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 从可执行文件位置向上回溯的层数（`<root>/target/<profile>/<exe>`）
pub const EXECUTABLE_DEPTH: usize = 3;

/// 应用根目录解析器
///
/// 依次尝试：显式路径 → 全局应用根目录 → 可执行文件位置推断。
#[derive(Debug, Clone, Default)]
pub struct BasePathResolver {
    explicit: Option<PathBuf>,
}

impl BasePathResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用显式路径
    pub fn explicit(path: impl Into<PathBuf>) -> Self {
        Self {
            explicit: Some(path.into()),
        }
    }

    /// 解析应用根目录，相对路径按当前工作目录转换为绝对路径
    pub fn resolve(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.explicit {
            return absolute(path);
        }

        if let Some(path) = infrastructure_common::app_base_path() {
            debug!("使用全局应用根目录: {}", path.display());
            return absolute(&path);
        }

        let executable = std::env::current_exe().map_err(|e| ConfigError::BasePathUnresolved {
            message: format!("无法获取可执行文件路径: {}", e),
        })?;
        let base = ancestor(&executable, EXECUTABLE_DEPTH).ok_or_else(|| {
            ConfigError::BasePathUnresolved {
                message: format!("可执行文件路径层级不足: {}", executable.display()),
            }
        })?;

        debug!("根据可执行文件位置推断应用根目录: {}", base.display());
        Ok(base)
    }
}

fn absolute(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    let current = std::env::current_dir().map_err(|e| ConfigError::WorkingDirectory {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(current.join(path))
}

fn ancestor(path: &Path, levels: usize) -> Option<PathBuf> {
    path.ancestors().nth(levels).map(Path::to_path_buf)
}

/// 工作目录守卫
///
/// 进入时切换工作目录，析构时恢复原目录（包括错误返回与 panic 展开）。
#[derive(Debug)]
pub struct WorkingDirGuard {
    original: PathBuf,
}

impl WorkingDirGuard {
    pub fn enter(path: &Path) -> Result<Self, ConfigError> {
        let original = std::env::current_dir().map_err(|e| ConfigError::WorkingDirectory {
            path: path.to_path_buf(),
            source: e,
        })?;

        std::env::set_current_dir(path).map_err(|e| ConfigError::WorkingDirectory {
            path: path.to_path_buf(),
            source: e,
        })?;

        debug!("切换工作目录: {} -> {}", original.display(), path.display());
        Ok(Self { original })
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        if let Err(e) = std::env::set_current_dir(&self.original) {
            warn!("恢复工作目录失败: {}, 原因: {}", self.original.display(), e);
        }
    }
}
