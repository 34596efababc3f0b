//! 组件解析器抽象接口
//!
//! 提供按名称解析定义的能力

use crate::definition::Instance;
use infrastructure_common::DependencyError;
use std::sync::Arc;

/// 组件解析器 trait
///
/// 对象安全，工厂函数通过 `&dyn Resolver` 解析自身的依赖。
pub trait Resolver {
    /// 解析定义；共享定义返回同一个实例
    fn get(&self, name: &str) -> Result<Instance, DependencyError>;

    /// 解析定义，总是构造新的实例
    fn make(&self, name: &str) -> Result<Instance, DependencyError>;

    /// 检查是否存在指定名称的定义（不会触发解析）
    fn has(&self, name: &str) -> Result<bool, DependencyError>;
}

/// 类型化解析扩展
pub trait ResolverExt: Resolver {
    /// 解析并向下转型
    fn get_as<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, DependencyError> {
        downcast(name, self.get(name)?)
    }

    /// 构造新实例并向下转型
    fn make_as<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, DependencyError> {
        downcast(name, self.make(name)?)
    }
}

impl<R: Resolver + ?Sized> ResolverExt for R {}

/// 将实例向下转型为具体类型
pub fn downcast<T: Send + Sync + 'static>(name: &str, instance: Instance) -> Result<Arc<T>, DependencyError> {
    instance
        .downcast::<T>()
        .map_err(|_| DependencyError::DowncastFailed {
            name: name.to_string(),
            expected: std::any::type_name::<T>(),
        })
}

/// 解析上下文
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// 当前解析链，用于检测循环依赖
    pub resolution_chain: Vec<String>,
    /// 最大递归深度
    pub max_depth: usize,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new(max_depth: usize) -> Self {
        Self {
            resolution_chain: Vec::new(),
            max_depth,
        }
    }

    /// 添加名称到解析链
    pub fn push_name(&mut self, name: &str) -> Result<(), DependencyError> {
        if self.resolution_chain.iter().any(|entry| entry == name) {
            return Err(DependencyError::CircularDependency {
                dependency_chain: format!("{} -> {}", self.resolution_chain.join(" -> "), name),
            });
        }
        if self.resolution_chain.len() >= self.max_depth {
            return Err(DependencyError::ResolutionDepthExceeded {
                name: name.to_string(),
                max_depth: self.max_depth,
            });
        }
        self.resolution_chain.push(name.to_string());
        Ok(())
    }

    /// 从解析链中移除最后一个名称
    pub fn pop_name(&mut self) {
        self.resolution_chain.pop();
    }

    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_reentry() {
        let mut context = ResolveContext::new(10);
        context.push_name("a").unwrap();
        context.push_name("b").unwrap();

        let err = context.push_name("a").unwrap_err();
        match err {
            DependencyError::CircularDependency { dependency_chain } => {
                assert_eq!(dependency_chain, "a -> b -> a");
            }
            other => panic!("unexpected error: {other}"),
        }

        context.pop_name();
        assert_eq!(context.depth(), 1);
    }

    #[test]
    fn enforces_max_depth() {
        let mut context = ResolveContext::new(1);
        context.push_name("a").unwrap();
        assert!(matches!(
            context.push_name("b"),
            Err(DependencyError::ResolutionDepthExceeded { max_depth: 1, .. })
        ));
    }

    #[test]
    fn downcast_reports_expected_type() {
        let instance: Instance = Arc::new(5_u32);
        assert_eq!(*downcast::<u32>("n", instance.clone()).unwrap(), 5);
        assert!(matches!(
            downcast::<String>("n", instance),
            Err(DependencyError::DowncastFailed { .. })
        ));
    }
}
