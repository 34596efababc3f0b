//! 错误类型定义

use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// 配置收集错误类型
///
/// 定义文件发现、清单读取以及包列表解析过程中的致命错误。
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("无法读取已安装包列表: {path}, 原因: {source}")]
    PackageRepositoryUnavailable {
        path: PathBuf,
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("配置文件读取失败: {path}, 原因: {source}")]
    FileReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("配置解析失败: {path}, 原因: {source}")]
    ParseError {
        path: PathBuf,
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("不支持的定义文件格式: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("无法确定应用根目录: {message}")]
    BasePathUnresolved { message: String },

    #[error("切换工作目录失败: {path}, 原因: {source}")]
    WorkingDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("配置类型转换失败: {message}")]
    TypeConversionError { message: String },
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件未注册: {name}")]
    ComponentNotRegistered { name: String },

    #[error("组件创建失败: {name}, 原因: {source}")]
    ComponentCreationFailed {
        name: String,
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("别名 {alias} 指向未定义的组件 {target}")]
    DanglingAlias { alias: String, target: String },

    #[error("定义 {name} 引用了未注册的工厂 {factory}")]
    UnknownFactory { name: String, factory: String },

    #[error("类型转换失败: {name}, 期望类型 {expected}")]
    DowncastFailed { name: String, expected: &'static str },

    #[error("解析深度超过上限 {max_depth}: {name}")]
    ResolutionDepthExceeded { name: String, max_depth: usize },

    #[error("容器输出写入失败: {path}, 原因: {source}")]
    OutputWriteFailed {
        path: PathBuf,
        source: Box<dyn StdError + Send + Sync>,
    },
}

/// 门面操作类型，决定 [`DiError`] 的固定消息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiOperation {
    Build,
    Get,
    Make,
    Has,
}

impl DiOperation {
    /// 该操作失败时对外报告的固定消息
    pub fn message(self) -> &'static str {
        match self {
            Self::Build => "Unable to build Dependency Injection Container",
            Self::Get => "Unable to get dependency",
            Self::Make => "Unable to make dependency",
            Self::Has => "Unable to check if container has dependency",
        }
    }
}

impl fmt::Display for DiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Build => "build",
            Self::Get => "get",
            Self::Make => "make",
            Self::Has => "has",
        };
        f.write_str(name)
    }
}

/// 依赖注入门面的统一错误类型
///
/// 门面的所有操作只暴露这一种错误：固定消息、HTTP 风格的错误码 500，
/// 以及通过 [`std::error::Error::source`] 链接的原始错误。
#[derive(Error, Debug)]
#[error("{}", .operation.message())]
pub struct DiError {
    operation: DiOperation,
    #[source]
    source: Box<dyn StdError + Send + Sync>,
}

impl DiError {
    /// 所有门面错误共用的错误码
    pub const CODE: u16 = 500;

    /// 包装原始错误
    pub fn new(operation: DiOperation, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self {
            operation,
            source: source.into(),
        }
    }

    pub fn build(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::new(DiOperation::Build, source)
    }

    pub fn get(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::new(DiOperation::Get, source)
    }

    pub fn make(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::new(DiOperation::Make, source)
    }

    pub fn has(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::new(DiOperation::Has, source)
    }

    /// 失败的操作
    pub fn operation(&self) -> DiOperation {
        self.operation
    }

    /// 固定的错误消息
    pub fn message(&self) -> &'static str {
        self.operation.message()
    }

    /// 错误码，恒为 500
    pub fn code(&self) -> u16 {
        Self::CODE
    }

    /// 原始错误
    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.source.as_ref()
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type DiResult<T> = Result<T, DiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn di_error_carries_fixed_message_and_code() {
        let cause = DependencyError::ComponentNotRegistered {
            name: "logger".to_string(),
        };
        let error = DiError::get(cause);

        assert_eq!(error.to_string(), "Unable to get dependency");
        assert_eq!(error.code(), 500);
        assert_eq!(error.operation(), DiOperation::Get);
        assert!(error.cause().to_string().contains("logger"));
    }

    #[test]
    fn di_error_chains_source() {
        let inner = DiError::build(ConfigError::BasePathUnresolved {
            message: "extra".to_string(),
        });
        let outer = DiError::make(inner);

        let source = StdError::source(&outer).expect("source should be attached");
        assert_eq!(source.to_string(), "Unable to build Dependency Injection Container");
        assert_eq!(outer.message(), "Unable to make dependency");
    }
}
