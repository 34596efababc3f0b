//! 进程级容器门面
//!
//! 供无法通过参数传递门面的代码使用。

use crate::facade::Di;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// 全局容器门面
static GLOBAL_DI: Lazy<RwLock<Option<Arc<Di>>>> = Lazy::new(|| RwLock::new(None));

/// 安装全局门面，替换已有的门面
pub fn install_global(di: Di) -> Arc<Di> {
    let di = Arc::new(di);
    *GLOBAL_DI.write() = Some(Arc::clone(&di));
    info!("已安装全局依赖注入门面");
    di
}

/// 获取全局门面；尚未安装时使用默认配置创建
pub fn global() -> Arc<Di> {
    if let Some(di) = GLOBAL_DI.read().as_ref() {
        return Arc::clone(di);
    }

    let mut slot = GLOBAL_DI.write();
    Arc::clone(slot.get_or_insert_with(|| Arc::new(Di::new())))
}

/// 移除全局门面
pub fn reset_global() -> Option<Arc<Di>> {
    GLOBAL_DI.write().take()
}

impl Di {
    /// 全局门面，等同于 [`global`]
    pub fn global() -> Arc<Di> {
        global()
    }
}
