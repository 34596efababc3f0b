//! 依赖定义模型
//!
//! 定义是一个具名的"配方"：字面量、工厂或指向另一个定义的别名。
//! 定义文件（JSON / TOML）中的每一项通过 [`Definition::from_json`] 转换。

use crate::factory::FactoryFn;
use serde_json::Value;
use std::any::Any;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::sync::Arc;

/// 解析得到的实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 工厂引用
#[derive(Clone)]
pub enum FactoryRef {
    /// 通过名称在工厂注册表中查找（定义文件只能使用这种形式）
    Named(String),
    /// 代码中直接提供的工厂函数
    Func(FactoryFn),
}

impl fmt::Debug for FactoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Func(_) => f.write_str("Func(<function>)"),
        }
    }
}

/// 依赖定义
#[derive(Clone, Debug)]
pub enum Definition {
    /// 字面量
    Value(Value),
    /// 工厂，`shared` 为 true 时 `get` 返回同一个实例
    Factory { factory: FactoryRef, shared: bool },
    /// 指向另一个定义
    Alias(String),
}

impl Definition {
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    pub fn alias(target: impl Into<String>) -> Self {
        Self::Alias(target.into())
    }

    /// 引用已注册的共享工厂
    pub fn factory(name: impl Into<String>) -> Self {
        Self::Factory {
            factory: FactoryRef::Named(name.into()),
            shared: true,
        }
    }

    /// 直接使用工厂函数的共享定义
    pub fn func<F>(func: F) -> Self
    where
        F: Fn(&dyn crate::Resolver) -> anyhow::Result<Instance> + Send + Sync + 'static,
    {
        Self::Factory {
            factory: FactoryRef::Func(Arc::new(func)),
            shared: true,
        }
    }

    /// 修改工厂定义的共享属性，对其他定义无效
    pub fn shared(self, shared: bool) -> Self {
        match self {
            Self::Factory { factory, .. } => Self::Factory { factory, shared },
            other => other,
        }
    }

    /// 定义类型名称
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Value(_) => "value",
            Self::Factory { .. } => "factory",
            Self::Alias(_) => "alias",
        }
    }

    /// 从定义文件中的一项转换
    ///
    /// - `{"value": ...}` 字面量
    /// - `{"alias": "name"}` 别名
    /// - `{"factory": "name"}` 或 `{"factory": {"name": "...", "shared": false}}` 工厂
    /// - 其他任何值按字面量处理
    pub fn from_json(value: Value) -> Self {
        let Value::Object(mut object) = value else {
            return Self::Value(value);
        };

        if object.len() == 1 {
            if let Some(inner) = object.remove("value") {
                return Self::Value(inner);
            }
            if let Some(Value::String(target)) = object.get("alias") {
                return Self::Alias(target.clone());
            }
            match object.get("factory") {
                Some(Value::String(name)) => return Self::factory(name.clone()),
                Some(Value::Object(spec)) => {
                    if let Some(Value::String(name)) = spec.get("name") {
                        let shared = spec.get("shared").and_then(Value::as_bool).unwrap_or(true);
                        return Self::factory(name.clone()).shared(shared);
                    }
                }
                _ => {}
            }
        }

        Self::Value(Value::Object(object))
    }
}

/// 定义表
///
/// 键唯一，合并时后写入者覆盖。按键名有序，保证编译输出稳定。
#[derive(Clone, Debug, Default)]
pub struct DefinitionMap {
    entries: BTreeMap<String, Definition>,
}

impl DefinitionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从定义文件的顶层对象转换
    pub fn from_json_object(object: serde_json::Map<String, Value>) -> Self {
        object
            .into_iter()
            .map(|(name, value)| (name, Definition::from_json(value)))
            .collect()
    }

    pub fn insert(&mut self, name: impl Into<String>, definition: Definition) -> Option<Definition> {
        self.entries.insert(name.into(), definition)
    }

    /// 链式插入
    pub fn with(mut self, name: impl Into<String>, definition: Definition) -> Self {
        self.insert(name, definition);
        self
    }

    /// 合并另一张定义表，`other` 中的同名定义覆盖当前定义
    pub fn merge(&mut self, other: DefinitionMap) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Definition> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Definition)> for DefinitionMap {
    fn from_iter<I: IntoIterator<Item = (String, Definition)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for DefinitionMap {
    type Item = (String, Definition);
    type IntoIter = btree_map::IntoIter<String, Definition>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_tagged_entries() {
        assert!(matches!(
            Definition::from_json(json!({"alias": "logger"})),
            Definition::Alias(target) if target == "logger"
        ));
        assert!(matches!(
            Definition::from_json(json!({"factory": "app.logger"})),
            Definition::Factory { factory: FactoryRef::Named(name), shared: true } if name == "app.logger"
        ));
        assert!(matches!(
            Definition::from_json(json!({"factory": {"name": "app.request", "shared": false}})),
            Definition::Factory { shared: false, .. }
        ));
        assert!(matches!(
            Definition::from_json(json!({"value": {"alias": "not-an-alias"}})),
            Definition::Value(Value::Object(_))
        ));
    }

    #[test]
    fn anything_else_is_a_literal() {
        assert!(matches!(Definition::from_json(json!(42)), Definition::Value(_)));
        assert!(matches!(
            Definition::from_json(json!({"alias": "a", "extra": true})),
            Definition::Value(_)
        ));
        assert!(matches!(
            Definition::from_json(json!({"factory": 3})),
            Definition::Value(_)
        ));
    }

    #[test]
    fn merge_is_last_writer_wins() {
        let mut base = DefinitionMap::new()
            .with("logger", Definition::value("package"))
            .with("cache", Definition::value("package"));
        base.merge(DefinitionMap::new().with("logger", Definition::value("app")));

        assert_eq!(base.len(), 2);
        assert!(matches!(base.get("logger"), Some(Definition::Value(v)) if v == "app"));
        assert!(matches!(base.get("cache"), Some(Definition::Value(v)) if v == "package"));
    }
}
