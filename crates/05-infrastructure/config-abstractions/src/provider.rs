//! 定义来源与包仓库抽象接口

use crate::package::PackageDescriptor;
use di_abstractions::DefinitionMap;
use infrastructure_common::ConfigError;
use std::fmt;

/// 定义来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    /// 应用自身的定义文件
    Application,
    /// 已安装包的定义文件
    Package(String),
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Application => f.write_str("application"),
            Self::Package(name) => write!(f, "package:{}", name),
        }
    }
}

/// 定义来源 trait
///
/// 每个发现来源（应用、每个已安装包）对应一个实现实例。
pub trait DefinitionSource: Send + Sync {
    /// 来源标识
    fn origin(&self) -> &SourceOrigin;

    /// 贡献定义表
    ///
    /// 来源内容不是映射时返回空表；无法读取或解析时返回错误。
    fn contribute(&self) -> Result<DefinitionMap, ConfigError>;
}

/// 包仓库 trait
///
/// 以包管理器报告的顺序枚举已安装的包。
pub trait PackageRepository: Send + Sync {
    /// 枚举已安装的包；包管理器状态不可读时返回错误
    fn packages(&self) -> Result<Vec<PackageDescriptor>, ConfigError>;

    /// 获取仓库名称
    fn name(&self) -> &str;
}
