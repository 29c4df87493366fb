//! `log` 门面到 klog 的桥接
//!
//! 驱动 crate 统一使用 `log::info!` 等宏，安装桥接后这些记录进入同一个环形缓冲区。

use crate::LogLevel;

struct KernelLogger;

impl log::Log for KernelLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        crate::is_level_enabled(LogLevel::from(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            crate::log_impl(LogLevel::from(record.level()), *record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: KernelLogger = KernelLogger;

/// 把 klog 安装为 `log` 门面的后端
///
/// 只能成功一次；重复调用返回 `log::SetLoggerError`。
pub fn init() -> Result<(), log::SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}
