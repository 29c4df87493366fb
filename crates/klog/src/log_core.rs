//! 日志系统核心实现
//!
//! 该模块将所有日志状态和逻辑封装到一个单独的 `LogCore` 结构体中，
//! 可以独立实例化用于测试，也可以作为全局单例使用。

use alloc::collections::VecDeque;
use core::fmt;
use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use sync::SpinLock;

use super::config::{DEFAULT_CONSOLE_LEVEL, DEFAULT_LOG_LEVEL, GLOBAL_LOG_BUFFER_SIZE};
use super::entry::LogEntry;
use super::level::LogLevel;

/// 核心日志系统
///
/// 封装了有界的条目队列和过滤状态。缓冲区满时丢弃最旧的条目并计数。
///
/// # 线程安全性
///
/// 级别阈值使用原子变量，条目队列由自旋锁保护，
/// 整个结构体可以在线程之间安全共享。
pub struct LogCore {
    /// 日志条目队列，最多 GLOBAL_LOG_BUFFER_SIZE 条
    buffer: SpinLock<VecDeque<LogEntry>>,

    /// 因缓冲区满而被覆盖的条目数
    dropped: AtomicUsize,

    /// 全局日志级别阈值（控制日志是否缓冲）
    global_level: AtomicU8,

    /// 控制台输出级别阈值（控制是否立即打印）
    console_level: AtomicU8,
}

impl LogCore {
    /// 使用默认日志级别创建新的 LogCore 实例
    ///
    /// 这是一个 `const fn`，可用于初始化 `static`。
    ///
    /// 使用配置中的默认级别：
    /// - 全局级别: Info (Debug 级别的日志将被过滤)
    /// - 控制台级别: Warning (只打印 Warning 及以上级别的日志)
    #[allow(clippy::should_implement_trait)]
    pub const fn default() -> Self {
        Self {
            buffer: SpinLock::new(VecDeque::new()),
            dropped: AtomicUsize::new(0),
            global_level: AtomicU8::new(DEFAULT_LOG_LEVEL as u8),
            console_level: AtomicU8::new(DEFAULT_CONSOLE_LEVEL as u8),
        }
    }

    /// 使用自定义日志级别创建新的 LogCore 实例
    ///
    /// # 示例
    ///
    /// ```rust
    /// use klog::{LogCore, LogLevel};
    ///
    /// let _test_log = LogCore::new(LogLevel::Debug, LogLevel::Warning);
    /// ```
    pub fn new(global_level: LogLevel, console_level: LogLevel) -> Self {
        Self {
            buffer: SpinLock::new(VecDeque::with_capacity(GLOBAL_LOG_BUFFER_SIZE)),
            dropped: AtomicUsize::new(0),
            global_level: AtomicU8::new(global_level as u8),
            console_level: AtomicU8::new(console_level as u8),
        }
    }

    /// 核心日志记录实现
    ///
    /// 1. 按全局级别过滤
    /// 2. 收集上下文 (时间戳、CPU ID、任务 ID)
    /// 3. 构造定长条目并入队，满则挤掉最旧的一条
    /// 4. 满足控制台级别时立即输出
    pub fn _log(&self, level: LogLevel, args: fmt::Arguments) {
        if !self.is_level_enabled(level) {
            return;
        }

        let (cpu_id, task_id, timestamp) = match crate::get_context_provider() {
            Some(provider) => (provider.cpu_id(), provider.task_id(), provider.timestamp()),
            None => (0, 0, 0),
        };

        let entry = LogEntry::from_args(level, cpu_id, task_id, timestamp, args);

        if self.is_console_level(level) {
            self.direct_print_entry(&entry);
        }

        let mut buffer = self.buffer.lock();
        if buffer.len() >= GLOBAL_LOG_BUFFER_SIZE {
            buffer.pop_front();
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        buffer.push_back(entry);
    }

    /// 取出最旧的一条日志，没有则返回 `None`
    pub fn _read_log(&self) -> Option<LogEntry> {
        self.buffer.lock().pop_front()
    }

    /// 非破坏性读取：按索引（0 为最旧）查看日志条目
    pub fn _peek_log(&self, index: usize) -> Option<LogEntry> {
        self.buffer.lock().get(index).cloned()
    }

    /// 返回未读日志条目的数量
    pub fn _log_len(&self) -> usize {
        self.buffer.lock().len()
    }

    /// 返回未读日志的总字节数（格式化后）
    pub fn _log_unread_bytes(&self) -> usize {
        self.buffer
            .lock()
            .iter()
            .map(|entry| format_log_entry(entry).len())
            .sum()
    }

    /// 返回由于缓冲区溢出而丢弃的日志计数
    pub fn _log_dropped_count(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    /// 设置全局日志级别阈值
    ///
    /// 级别 > 阈值的日志将被丢弃。
    pub fn _set_global_level(&self, level: LogLevel) {
        self.global_level.store(level as u8, Ordering::Release);
    }

    /// 获取当前全局日志级别
    pub fn _get_global_level(&self) -> LogLevel {
        LogLevel::from_u8(self.global_level.load(Ordering::Acquire))
    }

    /// 设置控制台输出级别阈值
    pub fn _set_console_level(&self, level: LogLevel) {
        self.console_level.store(level as u8, Ordering::Release);
    }

    /// 获取当前控制台输出级别
    pub fn _get_console_level(&self) -> LogLevel {
        LogLevel::from_u8(self.console_level.load(Ordering::Acquire))
    }

    // ========== 内部辅助函数 ==========

    #[inline(always)]
    fn is_level_enabled(&self, level: LogLevel) -> bool {
        level as u8 <= self.global_level.load(Ordering::Acquire)
    }

    #[inline(always)]
    fn is_console_level(&self, level: LogLevel) -> bool {
        level as u8 <= self.console_level.load(Ordering::Acquire)
    }

    /// 直接将日志条目打印到已注册的控制台
    fn direct_print_entry(&self, entry: &LogEntry) {
        if let Some(output) = crate::get_log_output() {
            let mut line = format_log_entry(entry);
            line.push('\n');
            output.write_str(&line);
        }
    }
}

/// 格式化日志条目为字符串（带 ANSI 颜色和上下文信息）
///
/// # 格式
/// ```text
/// <color_code>[LEVEL] [timestamp] [CPU<id>/T<tid>] message<reset>
/// ```
pub fn format_log_entry(entry: &LogEntry) -> alloc::string::String {
    alloc::format!(
        "{}{} [{:12}] [CPU{}/T{:3}] {}{}",
        entry.level().color_code(),
        entry.level().as_str(),
        entry.timestamp(),
        entry.cpu_id(),
        entry.task_id(),
        entry.message(),
        entry.level().reset_color_code()
    )
}
