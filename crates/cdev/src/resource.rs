//! 资源释放栈
//!
//! 每获取一个资源就压入对应的释放动作；[`ResourceStack::unwind`] 按相反顺序逐个执行。
//! 栈被 drop 时自动 unwind，因此初始化途中任何一步以 `?` 提前返回，
//! 之前获取的资源都会被逆序释放。

use alloc::boxed::Box;
use alloc::vec::Vec;

type ReleaseFn = Box<dyn FnOnce() + Send>;

/// 逆序释放的资源栈
#[derive(Default)]
pub struct ResourceStack {
    actions: Vec<(&'static str, ReleaseFn)>,
}

impl ResourceStack {
    /// 创建空栈
    pub const fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// 记录一个已获取的资源及其释放动作
    pub fn push(&mut self, what: &'static str, release: impl FnOnce() + Send + 'static) {
        self.actions.push((what, Box::new(release)));
    }

    /// 尚未释放的资源数
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// 是否已全部释放
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// 按获取的相反顺序释放全部资源，每个动作只执行一次
    pub fn unwind(&mut self) {
        while let Some((what, release)) = self.actions.pop() {
            log::debug!("unwind: release {}", what);
            release();
        }
    }
}

impl Drop for ResourceStack {
    fn drop(&mut self) {
        self.unwind();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::sync::Arc;
    use sync::SpinLock;

    fn recorder() -> (Arc<SpinLock<Vec<&'static str>>>, ResourceStack) {
        (Arc::new(SpinLock::new(Vec::new())), ResourceStack::new())
    }

    #[test]
    fn test_unwind_reverse_order() {
        let (log, mut stack) = recorder();
        for name in ["identity", "class", "node"] {
            let log = log.clone();
            stack.push(name, move || log.lock().push(name));
        }
        assert_eq!(stack.len(), 3);
        stack.unwind();
        assert!(stack.is_empty());
        assert_eq!(*log.lock(), ["node", "class", "identity"]);
    }

    #[test]
    fn test_unwind_runs_once() {
        let (log, mut stack) = recorder();
        let l = log.clone();
        stack.push("only", move || l.lock().push("only"));
        stack.unwind();
        stack.unwind();
        drop(stack);
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_drop_unwinds() {
        let (log, mut stack) = recorder();
        let a = log.clone();
        let b = log.clone();
        stack.push("a", move || a.lock().push("a"));
        stack.push("b", move || b.lock().push("b"));
        drop(stack);
        assert_eq!(*log.lock(), ["b", "a"]);
    }
}
