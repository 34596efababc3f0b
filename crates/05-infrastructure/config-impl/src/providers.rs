//! 定义来源实现

use config_abstractions::{DefinitionSource, SourceOrigin};
use di_abstractions::DefinitionMap;
use infrastructure_common::ConfigError;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 定义文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    Json,
    Toml,
}

impl DefinitionFormat {
    /// 按扩展名判断格式
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Some(Self::Toml),
            _ => None,
        }
    }
}

/// 文件定义来源
///
/// 应用和每个已安装包各对应一个实例。
#[derive(Debug, Clone)]
pub struct FileDefinitionSource {
    origin: SourceOrigin,
    file_path: PathBuf,
}

impl FileDefinitionSource {
    pub fn new(origin: SourceOrigin, path: impl Into<PathBuf>) -> Self {
        Self {
            origin,
            file_path: path.into(),
        }
    }

    /// 应用定义文件
    pub fn application(path: impl Into<PathBuf>) -> Self {
        Self::new(SourceOrigin::Application, path)
    }

    /// 已安装包的定义文件
    pub fn package(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::new(SourceOrigin::Package(name.into()), path)
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// 读取并解析为 JSON 值
    fn load_value(&self) -> Result<Value, ConfigError> {
        let format = DefinitionFormat::from_path(&self.file_path).ok_or_else(|| {
            ConfigError::UnsupportedFormat {
                path: self.file_path.clone(),
            }
        })?;

        debug!("加载定义文件: {} ({})", self.file_path.display(), self.origin);

        let content =
            std::fs::read_to_string(&self.file_path).map_err(|e| ConfigError::FileReadError {
                path: self.file_path.clone(),
                source: e,
            })?;

        match format {
            DefinitionFormat::Json => {
                serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
                    path: self.file_path.clone(),
                    source: Box::new(e),
                })
            }
            DefinitionFormat::Toml => {
                let value: toml::Value =
                    toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                        path: self.file_path.clone(),
                        source: Box::new(e),
                    })?;
                Ok(toml_to_json(&value))
            }
        }
    }
}

impl DefinitionSource for FileDefinitionSource {
    fn origin(&self) -> &SourceOrigin {
        &self.origin
    }

    fn contribute(&self) -> Result<DefinitionMap, ConfigError> {
        match self.load_value()? {
            Value::Object(object) => {
                let definitions = DefinitionMap::from_json_object(object);
                debug!("{} 贡献了 {} 个定义", self.origin, definitions.len());
                Ok(definitions)
            }
            other => {
                warn!(
                    "定义文件 {} 的顶层不是映射 ({}), 按空定义处理",
                    self.file_path.display(),
                    json_type_name(&other)
                );
                Ok(DefinitionMap::new())
            }
        }
    }
}

/// 将 TOML 值转换为 JSON 值
pub(crate) fn toml_to_json(value: &toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s.clone()),
        toml::Value::Integer(i) => Value::Number(serde_json::Number::from(*i)),
        toml::Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Array(arr) => Value::Array(arr.iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .iter()
                .map(|(k, v)| (k.clone(), toml_to_json(v)))
                .collect(),
        ),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
