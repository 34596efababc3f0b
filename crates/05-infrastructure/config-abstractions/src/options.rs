//! 容器构建选项
//!
//! 每个选项按来源列表依次查找（显式配置 → 环境变量 → 默认值），
//! 第一个给出值的来源生效。

use di_abstractions::ContainerConfig;
use infrastructure_common::ConfigError;
use std::path::PathBuf;

/// 构建选项键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildOptionKey {
    UseAutoWiring,
    UseAnnotations,
    IgnorePhpDocErrors,
    EnableCompilation,
    CompileTo,
    EnableWritingProxies,
    WriteProxiesTo,
}

impl BuildOptionKey {
    pub const ALL: [BuildOptionKey; 7] = [
        Self::UseAutoWiring,
        Self::UseAnnotations,
        Self::IgnorePhpDocErrors,
        Self::EnableCompilation,
        Self::CompileTo,
        Self::EnableWritingProxies,
        Self::WriteProxiesTo,
    ];

    /// 显式配置中的键名
    pub fn config_key(self) -> &'static str {
        match self {
            Self::UseAutoWiring => "useAutoWiring",
            Self::UseAnnotations => "useAnnotations",
            Self::IgnorePhpDocErrors => "ignorePhpDocErrors",
            Self::EnableCompilation => "enableCompilation",
            Self::CompileTo => "compileTo",
            Self::EnableWritingProxies => "enableWritingProxies",
            Self::WriteProxiesTo => "writeProxiesTo",
        }
    }

    /// 对应的环境变量
    pub fn env_var(self) -> &'static str {
        match self {
            Self::UseAutoWiring => "CORBOMITE_DI_USE_AUTO_WIRING",
            Self::UseAnnotations => "CORBOMITE_DI_USE_ANNOTATIONS",
            Self::IgnorePhpDocErrors => "CORBOMITE_DI_IGNORE_PHPDOC_ERRORS",
            Self::EnableCompilation => "CORBOMITE_DI_ENABLE_COMPILATION",
            Self::CompileTo => "CORBOMITE_DI_COMPILATION_DIR",
            Self::EnableWritingProxies => "CORBOMITE_DI_ENABLE_WRITING_PROXIES",
            Self::WriteProxiesTo => "CORBOMITE_DI_WRITE_PROXIES_TO_FILE",
        }
    }

    /// 路径型选项
    pub fn is_path(self) -> bool {
        matches!(self, Self::CompileTo | Self::WriteProxiesTo)
    }
}

/// 选项值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Flag(bool),
    Path(Option<PathBuf>),
}

/// 选项来源 trait
pub trait OptionSource: Send + Sync {
    /// 来源名称
    fn name(&self) -> &str;

    /// 查找选项；`Ok(None)` 表示交给下一个来源
    fn lookup(&self, key: BuildOptionKey) -> Result<Option<OptionValue>, ConfigError>;
}

/// 解析后的构建选项
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub use_autowiring: bool,
    pub use_annotations: bool,
    pub ignore_phpdoc_errors: bool,
    pub enable_compilation: bool,
    pub compile_to: Option<PathBuf>,
    pub enable_writing_proxies: bool,
    pub write_proxies_to: Option<PathBuf>,
}

impl BuildOptions {
    /// 写入单个选项，值类型与键不匹配时返回错误
    pub fn set(&mut self, key: BuildOptionKey, value: OptionValue) -> Result<(), ConfigError> {
        match (key, value) {
            (BuildOptionKey::UseAutoWiring, OptionValue::Flag(flag)) => self.use_autowiring = flag,
            (BuildOptionKey::UseAnnotations, OptionValue::Flag(flag)) => self.use_annotations = flag,
            (BuildOptionKey::IgnorePhpDocErrors, OptionValue::Flag(flag)) => {
                self.ignore_phpdoc_errors = flag
            }
            (BuildOptionKey::EnableCompilation, OptionValue::Flag(flag)) => {
                self.enable_compilation = flag
            }
            (BuildOptionKey::EnableWritingProxies, OptionValue::Flag(flag)) => {
                self.enable_writing_proxies = flag
            }
            (BuildOptionKey::CompileTo, OptionValue::Path(path)) => self.compile_to = path,
            (BuildOptionKey::WriteProxiesTo, OptionValue::Path(path)) => self.write_proxies_to = path,
            (key, value) => {
                return Err(ConfigError::TypeConversionError {
                    message: format!("选项 {} 的值类型不匹配: {:?}", key.config_key(), value),
                })
            }
        }
        Ok(())
    }

    /// 转换为容器配置
    pub fn to_container_config(&self) -> ContainerConfig {
        ContainerConfig {
            use_autowiring: self.use_autowiring,
            use_annotations: self.use_annotations,
            ignore_phpdoc_errors: self.ignore_phpdoc_errors,
            enable_compilation: self.enable_compilation,
            compile_to: self.compile_to.clone(),
            enable_writing_proxies: self.enable_writing_proxies,
            write_proxies_to: self.write_proxies_to.clone(),
            ..ContainerConfig::default()
        }
    }
}
