//! 组件工厂抽象
//!
//! 定义文件不能携带可执行代码，只能通过名称引用在代码中注册的工厂。

use crate::definition::Instance;
use crate::resolver::Resolver;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 工厂函数类型
pub type FactoryFn = Arc<dyn Fn(&dyn Resolver) -> anyhow::Result<Instance> + Send + Sync>;

/// 工厂注册表
///
/// 名称到工厂函数的映射，构建容器时用于解析 `{"factory": "name"}` 定义。
#[derive(Clone, Default)]
pub struct FactoryRegistry {
    factories: HashMap<String, FactoryFn>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册返回具体类型的工厂
    pub fn register<T, F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let factory: FactoryFn = Arc::new(move |resolver: &dyn Resolver| {
            factory(resolver).map(|instance| Arc::new(instance) as Instance)
        });
        self.factories.insert(name.into(), factory);
        self
    }

    /// 注册已类型擦除的工厂
    pub fn register_fn(&mut self, name: impl Into<String>, factory: FactoryFn) -> &mut Self {
        self.factories.insert(name.into(), factory);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FactoryFn> {
        self.factories.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// 合并另一个注册表，同名工厂以 `other` 为准
    pub fn extend(&mut self, other: FactoryRegistry) {
        self.factories.extend(other.factories);
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("FactoryRegistry")
            .field("factories", &names)
            .finish()
    }
}
