//! 中断保护器
//!
//! 基于 RAII 实现中断保护，在创建时禁用中断，销毁时恢复。
//!
//! 注意：禁用中断只能阻止**本地 CPU** 的“任务 vs 本地中断”并发，
//! 并不能阻止其他 CPU 的并行访问；多核共享数据仍需要配合自旋锁等原语。

use crate::arch_ops;
use core::ops::Drop;

/// 中断保护器，基于 RAII 实现中断保护。
///
/// 在创建时原子地禁用中断并保存之前的状态；
/// 在销毁时自动恢复之前的中断状态。未注册 `ArchOps` 时为空操作。
///
/// # 示例
/// ```ignore
/// {
///     let guard = IntrGuard::new(); // 禁用中断
///     // 临界区代码
/// } // 离开作用域，自动恢复中断状态
/// ```
pub struct IntrGuard {
    flags: usize,
}

impl IntrGuard {
    /// 原子地禁用中断并返回一个 IntrGuard 实例。
    pub fn new() -> Self {
        let flags = match arch_ops() {
            // SAFETY: 保存的 flags 会在 Drop 或 restore 中原样恢复
            Some(ops) => unsafe { ops.read_and_disable_interrupts() },
            None => 0,
        };
        IntrGuard { flags }
    }

    /// 放弃 RAII 语义，返回保存的中断状态
    ///
    /// 用于锁这类“获取与释放不在同一作用域”的场景，之后必须调用 [`IntrGuard::restore`]。
    pub fn into_flags(self) -> usize {
        let flags = self.flags;
        core::mem::forget(self);
        flags
    }

    /// 恢复由 [`IntrGuard::into_flags`] 取出的中断状态
    pub fn restore(flags: usize) {
        if let Some(ops) = arch_ops() {
            // SAFETY: flags 来自 read_and_disable_interrupts
            unsafe { ops.restore_interrupts(flags) };
        }
    }
}

impl Default for IntrGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for IntrGuard {
    /// 当 IntrGuard 离开作用域时，自动恢复中断状态。
    fn drop(&mut self) {
        Self::restore(self.flags);
    }
}
