//! 内核日志子系统
//!
//! 该 crate 提供一个类似 **Linux 内核风格的日志系统**，驱动通过 `pr_info!` / `pr_err!`
//! 或 `log` 门面记录日志，条目进入有界缓冲区，紧急日志同时直接打印到控制台。
//!
//! # 组件
//!
//! - [`config`] - 配置常量（缓冲区大小、消息长度限制、默认级别）
//! - [`log_core`] - 核心日志实现 (LogCore)
//! - [`entry`] - 定长日志条目
//! - [`level`] - 日志级别定义（从 Emergency 到 Debug）
//! - [`macros`] - 面向用户的日志宏 (`pr_info!`, `pr_err!`, 等)
//! - [`logger`] - `log` 门面桥接，见 [`init`]
//!
//! # 双输出策略
//!
//! 1. **即时控制台输出**：达到控制台级别阈值（默认：Warning 及以上）的日志会直接打印到控制台。
//! 2. **缓冲区存储**：所有达到全局级别阈值（默认：Info 及以上）的日志都会写入缓冲区，
//!    缓冲区满时覆盖最旧的条目并计入丢弃数。
//!
//! # 架构解耦
//!
//! - **LogContextProvider**：提供 CPU ID、任务 ID、时间戳
//! - **LogOutput**：提供控制台输出能力
//!
//! 使用方需要在启动时注册这些 trait 的实现；未注册时上下文取 0，控制台输出被跳过。

#![no_std]

extern crate alloc;

pub mod config;
pub mod entry;
pub mod level;
pub mod log_core;
pub mod logger;
pub mod macros;

pub use config::{
    DEFAULT_CONSOLE_LEVEL, DEFAULT_LOG_LEVEL, GLOBAL_LOG_BUFFER_SIZE, MAX_LOG_MESSAGE_LENGTH,
};
pub use entry::LogEntry;
pub use level::LogLevel;
pub use log_core::{LogCore, format_log_entry};
pub use logger::init;

use core::sync::atomic::{AtomicPtr, Ordering};

// ========== Trait 定义 ==========

/// 日志上下文提供者 trait
///
/// 实现此 trait 以提供日志所需的上下文信息（CPU ID、任务 ID、时间戳）。
/// 使用方需要在启动时通过 `register_context_provider` 注册实现。
pub trait LogContextProvider: Send + Sync {
    /// 获取当前 CPU ID
    fn cpu_id(&self) -> usize;
    /// 获取当前任务 ID（如果没有任务则返回 0）
    fn task_id(&self) -> u32;
    /// 获取当前时间戳
    fn timestamp(&self) -> usize;
}

/// 日志输出 trait
///
/// 实现此 trait 以提供日志的控制台输出能力。
/// 使用方需要在启动时通过 `register_log_output` 注册实现。
pub trait LogOutput: Send + Sync {
    /// 输出字符串到控制台
    fn write_str(&self, s: &str);
}

// ========== 全局注册机制 ==========

/// 存储 LogContextProvider trait object 的胖指针
struct ContextProviderPtr {
    data: AtomicPtr<()>,
    vtable: AtomicPtr<()>,
}

impl ContextProviderPtr {
    const fn new() -> Self {
        Self {
            data: AtomicPtr::new(core::ptr::null_mut()),
            vtable: AtomicPtr::new(core::ptr::null_mut()),
        }
    }
}

/// 存储 LogOutput trait object 的胖指针
struct LogOutputPtr {
    data: AtomicPtr<()>,
    vtable: AtomicPtr<()>,
}

impl LogOutputPtr {
    const fn new() -> Self {
        Self {
            data: AtomicPtr::new(core::ptr::null_mut()),
            vtable: AtomicPtr::new(core::ptr::null_mut()),
        }
    }
}

static CONTEXT_PROVIDER: ContextProviderPtr = ContextProviderPtr::new();
static LOG_OUTPUT: LogOutputPtr = LogOutputPtr::new();

/// 注册日志上下文提供者
///
/// # Safety
///
/// - 必须在任何日志调用之前调用
/// - provider 必须具有 'static 生命周期
/// - 只能调用一次
pub unsafe fn register_context_provider(provider: &'static dyn LogContextProvider) {
    let ptr: *const dyn LogContextProvider = provider;
    let (data, vtable) = unsafe { core::mem::transmute::<_, (*mut (), *mut ())>(ptr) };
    CONTEXT_PROVIDER.data.store(data, Ordering::Release);
    CONTEXT_PROVIDER.vtable.store(vtable, Ordering::Release);
}

/// 注册日志输出
///
/// # Safety
///
/// - 必须在任何日志调用之前调用
/// - output 必须具有 'static 生命周期
/// - 只能调用一次
pub unsafe fn register_log_output(output: &'static dyn LogOutput) {
    let ptr: *const dyn LogOutput = output;
    let (data, vtable) = unsafe { core::mem::transmute::<_, (*mut (), *mut ())>(ptr) };
    LOG_OUTPUT.data.store(data, Ordering::Release);
    LOG_OUTPUT.vtable.store(vtable, Ordering::Release);
}

/// 获取已注册的上下文提供者
pub(crate) fn get_context_provider() -> Option<&'static dyn LogContextProvider> {
    let data = CONTEXT_PROVIDER.data.load(Ordering::Acquire);
    let vtable = CONTEXT_PROVIDER.vtable.load(Ordering::Acquire);
    if data.is_null() || vtable.is_null() {
        return None;
    }
    // Safety: 指针由 register_context_provider 设置，保证有效
    Some(unsafe {
        core::mem::transmute::<(*mut (), *mut ()), &'static dyn LogContextProvider>((data, vtable))
    })
}

/// 获取已注册的日志输出
pub(crate) fn get_log_output() -> Option<&'static dyn LogOutput> {
    let data = LOG_OUTPUT.data.load(Ordering::Acquire);
    let vtable = LOG_OUTPUT.vtable.load(Ordering::Acquire);
    if data.is_null() || vtable.is_null() {
        return None;
    }
    // Safety: 指针由 register_log_output 设置，保证有效
    Some(unsafe {
        core::mem::transmute::<(*mut (), *mut ()), &'static dyn LogOutput>((data, vtable))
    })
}

// ========== 全局单例 ==========

/// 全局日志系统实例
///
/// 使用 const fn 在编译时初始化。
/// 所有日志宏、`log` 门面桥接和公共 API 都委托给此实例。
static GLOBAL_LOG: log_core::LogCore = log_core::LogCore::default();

// ========== 公共 API (精简封装) ==========

/// 核心日志实现（由宏调用）
#[doc(hidden)]
pub fn log_impl(level: LogLevel, args: core::fmt::Arguments) {
    GLOBAL_LOG._log(level, args);
}

/// 检查日志级别是否启用（由宏调用）
#[doc(hidden)]
pub fn is_level_enabled(level: LogLevel) -> bool {
    level as u8 <= GLOBAL_LOG._get_global_level() as u8
}

/// 从缓冲区读取下一个日志条目
pub fn read_log() -> Option<LogEntry> {
    GLOBAL_LOG._read_log()
}

/// 非破坏性读取：按索引（0 为最旧）查看日志条目
pub fn peek_log(index: usize) -> Option<LogEntry> {
    GLOBAL_LOG._peek_log(index)
}

/// 返回未读日志条目的数量
pub fn log_len() -> usize {
    GLOBAL_LOG._log_len()
}

/// 返回未读日志的总字节数（格式化后）
pub fn log_unread_bytes() -> usize {
    GLOBAL_LOG._log_unread_bytes()
}

/// 返回已丢弃日志的计数
pub fn log_dropped_count() -> usize {
    GLOBAL_LOG._log_dropped_count()
}

/// 设置全局日志级别阈值
pub fn set_global_level(level: LogLevel) {
    GLOBAL_LOG._set_global_level(level);
}

/// 获取当前全局日志级别
pub fn get_global_level() -> LogLevel {
    GLOBAL_LOG._get_global_level()
}

/// 设置控制台输出级别阈值
pub fn set_console_level(level: LogLevel) {
    GLOBAL_LOG._set_console_level(level);
}

/// 获取当前控制台输出级别
pub fn get_console_level() -> LogLevel {
    GLOBAL_LOG._get_console_level()
}

#[cfg(test)]
mod tests;
