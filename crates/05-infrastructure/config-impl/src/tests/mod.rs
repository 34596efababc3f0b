/// 收集器会切换进程工作目录并读取全局应用根目录，相关测试之间需要串行
pub(crate) static CWD_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());
