//! 配置节定义

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// 配置节
///
/// 扁平的键值配置，键使用 camelCase（例如 `useAutoWiring`）。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigSection {
    /// 配置数据
    pub data: HashMap<String, serde_json::Value>,
}

impl ConfigSection {
    /// 创建新的配置节
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// 插入配置项
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// 链式插入配置项
    pub fn with(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.insert(key, value);
        self
    }

    /// 获取配置项
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// 获取布尔配置项
    ///
    /// 接受 JSON 布尔值以及字符串 `"true"` / `"false"`。
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        match self.data.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(serde_json::Value::Bool(value)) => Ok(Some(*value)),
            Some(serde_json::Value::String(value)) => Ok(Some(value == "true")),
            Some(other) => Err(ConfigError::TypeConversionError {
                message: format!("配置项 {} 不是布尔类型: {}", key, other),
            }),
        }
    }

    /// 获取路径配置项，空字符串视为未设置
    pub fn get_path(&self, key: &str) -> Result<Option<PathBuf>, ConfigError> {
        match self.data.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(serde_json::Value::String(value)) if value.is_empty() => Ok(None),
            Some(serde_json::Value::String(value)) => Ok(Some(PathBuf::from(value))),
            Some(other) => Err(ConfigError::TypeConversionError {
                message: format!("配置项 {} 不是路径字符串: {}", key, other),
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
