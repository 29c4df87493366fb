//! 内存中的宿主内核
//!
//! 把 [`ChrdevAllocator`]、[`DevNamespace`]、[`CdevMap`] 组合在一起，
//! 提供按节点名打开设备（`open("/dev/<node>")`）的入口，以及资源泄漏检查。

use alloc::sync::Arc;
use uapi::fcntl::OpenFlags;

use crate::{CdevMap, CharDeviceFile, ChrdevAllocator, DevNamespace, FsError, KernelServices};

/// 内存中的宿主内核
#[derive(Clone, Default)]
pub struct HostKernel {
    /// 设备号分配器
    pub allocator: Arc<ChrdevAllocator>,
    /// 设备命名空间
    pub namespace: Arc<DevNamespace>,
    /// 字符设备表
    pub cdevs: Arc<CdevMap>,
}

impl HostKernel {
    /// 创建空的宿主内核
    pub fn new() -> Self {
        Self::default()
    }

    /// 以 trait 对象形式交给驱动的服务集合
    pub fn services(&self) -> KernelServices {
        KernelServices::new(
            self.allocator.clone(),
            self.namespace.clone(),
            self.cdevs.clone(),
        )
    }

    /// 按节点名打开设备
    pub fn open(&self, node: &str, flags: OpenFlags) -> Result<CharDeviceFile, FsError> {
        let devno = self.namespace.lookup(node).ok_or(FsError::NoDevice)?;
        self.cdevs.open(devno, flags)
    }

    /// 是否没有任何设备号、设备类、节点或绑定残留
    pub fn is_clean(&self) -> bool {
        self.allocator.in_use() == 0
            && self.namespace.class_count() == 0
            && self.namespace.node_count() == 0
            && self.cdevs.is_empty()
    }
}
