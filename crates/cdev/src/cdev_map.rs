//! 设备号到操作表的绑定
//!
//! 模拟 `cdev_add()` / `cdev_del()`：绑定之后，打开该设备号的请求被分发给对应的
//! [`FileOperations`]；解绑之后再打开返回 `NoDevice`。

use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use sync::SpinLock;
use uapi::fcntl::OpenFlags;

use crate::{CharDeviceFile, DeviceIdentity, FileOperations, FsError, ServiceError, makedev};

/// 一次成功绑定的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdevHandle {
    devno: u64,
    count: u32,
}

impl CdevHandle {
    /// 起始设备号
    pub fn devno(&self) -> u64 {
        self.devno
    }

    /// 绑定的 minor 数量
    pub fn count(&self) -> u32 {
        self.count
    }

    fn devnos(&self) -> impl Iterator<Item = u64> + '_ {
        let major = crate::major(self.devno);
        let first = crate::minor(self.devno);
        (first..first + self.count).map(move |minor| makedev(major, minor))
    }
}

/// 字符设备绑定服务
pub trait CdevRegistry: Send + Sync {
    /// 将 `identity` 覆盖的全部设备号绑定到 `ops`
    fn bind(
        &self,
        identity: &DeviceIdentity,
        ops: Arc<dyn FileOperations>,
    ) -> Result<CdevHandle, ServiceError>;

    /// 解除绑定；未绑定时忽略
    fn unbind(&self, handle: &CdevHandle);
}

/// 内存中的字符设备表
pub struct CdevMap {
    map: SpinLock<BTreeMap<u64, Arc<dyn FileOperations>>>,
}

impl CdevMap {
    /// 创建空表
    pub const fn new() -> Self {
        Self {
            map: SpinLock::new(BTreeMap::new()),
        }
    }

    /// 已绑定的设备号数量
    pub fn len(&self) -> usize {
        self.map.lock().len()
    }

    /// 是否没有任何绑定
    pub fn is_empty(&self) -> bool {
        self.map.lock().is_empty()
    }

    /// 设备号是否已绑定
    pub fn is_bound(&self, devno: u64) -> bool {
        self.map.lock().contains_key(&devno)
    }

    /// 查找设备号对应的操作表
    pub fn lookup(&self, devno: u64) -> Option<Arc<dyn FileOperations>> {
        self.map.lock().get(&devno).cloned()
    }

    /// 打开设备号，返回新的文件句柄
    ///
    /// 查表在锁内完成，驱动的 open 回调在锁外执行。
    pub fn open(&self, devno: u64, flags: OpenFlags) -> Result<CharDeviceFile, FsError> {
        let ops = self.lookup(devno).ok_or(FsError::NoDevice)?;
        CharDeviceFile::open(ops, devno, flags)
    }
}

impl Default for CdevMap {
    fn default() -> Self {
        Self::new()
    }
}

impl CdevRegistry for CdevMap {
    fn bind(
        &self,
        identity: &DeviceIdentity,
        ops: Arc<dyn FileOperations>,
    ) -> Result<CdevHandle, ServiceError> {
        if identity.count() == 0 {
            return Err(ServiceError::InvalidArgument);
        }
        let handle = CdevHandle {
            devno: identity.devno(),
            count: identity.count(),
        };

        let mut map = self.map.lock();
        if handle.devnos().any(|devno| map.contains_key(&devno)) {
            return Err(ServiceError::Busy);
        }
        for devno in handle.devnos() {
            map.insert(devno, ops.clone());
        }
        Ok(handle)
    }

    fn unbind(&self, handle: &CdevHandle) {
        let mut map = self.map.lock();
        for devno in handle.devnos() {
            map.remove(&devno);
        }
    }
}
