//! 字符设备操作表
//!
//! 驱动通过实现 [`FileOperations`] 向 VFS 暴露 open/release/read/write/llseek。
//! 未实现的操作保持默认，返回 [`FsError::NotSupported`]；[`Capabilities`] 声明驱动
//! 实际提供哪些数据操作，分发层据此在调用前拒绝不支持的请求。
//!
//! 每次 open 产生一个独立的 [`FileHandle`]，读写位置保存在句柄中。

use bitflags::bitflags;
use core::sync::atomic::{AtomicUsize, Ordering};
use uapi::fcntl::{OpenFlags, SeekWhence};

use crate::io_buffer::{IoBufferReader, IoBufferWriter};
use crate::{BackendFault, FsError};

bitflags! {
    /// 驱动提供的数据操作
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u8 {
        /// 支持 read
        const READ = 1 << 0;
        /// 支持 write
        const WRITE = 1 << 1;
        /// 支持 llseek
        const SEEK = 1 << 2;
    }
}

/// 一次 open 对应的文件句柄
#[derive(Debug)]
pub struct FileHandle {
    devno: u64,
    flags: OpenFlags,
    pos: AtomicUsize,
}

impl FileHandle {
    /// 创建位置为 0 的句柄
    pub fn new(devno: u64, flags: OpenFlags) -> Self {
        Self {
            devno,
            flags,
            pos: AtomicUsize::new(0),
        }
    }

    /// 打开的设备号
    pub fn devno(&self) -> u64 {
        self.devno
    }

    /// 打开标志
    pub fn flags(&self) -> OpenFlags {
        self.flags
    }

    /// 当前读写位置
    pub fn pos(&self) -> usize {
        self.pos.load(Ordering::Acquire)
    }

    /// 设置读写位置
    pub fn set_pos(&self, pos: usize) {
        self.pos.store(pos, Ordering::Release);
    }
}

/// 字符设备驱动的操作表
pub trait FileOperations: Send + Sync {
    /// 驱动提供的数据操作
    fn capabilities(&self) -> Capabilities;

    /// 打开设备
    fn open(&self, _file: &FileHandle) -> Result<(), FsError> {
        Ok(())
    }

    /// 关闭设备（句柄的最后一个引用释放时调用）
    fn release(&self, _file: &FileHandle) {}

    /// 从设备读取数据到 `buf`，返回读取的字节数
    fn read(&self, _file: &FileHandle, _buf: &mut dyn IoBufferWriter) -> Result<usize, FsError> {
        Err(FsError::NotSupported)
    }

    /// 将 `buf` 中的数据写入设备，返回消耗的字节数
    fn write(&self, _file: &FileHandle, _buf: &mut dyn IoBufferReader) -> Result<usize, FsError> {
        Err(FsError::NotSupported)
    }

    /// 调整读写位置，返回新位置
    fn llseek(
        &self,
        _file: &FileHandle,
        _offset: isize,
        _whence: SeekWhence,
    ) -> Result<usize, FsError> {
        Err(FsError::NotSupported)
    }
}

/// 持有硬件资源的驱动后端
///
/// 后端在绑定设备号之后才获取硬件；获取成功之前，数据操作应返回 [`FsError::NoDevice`]。
pub trait CharBackend: FileOperations {
    /// 按顺序获取后端需要的硬件资源
    ///
    /// 任一子步骤失败时，必须先逆序释放本次已获取的部分，再返回失败的子步骤。
    fn acquire_resources(&self) -> Result<(), BackendFault>;

    /// 逆序释放全部硬件资源；重复调用无副作用
    fn release_resources(&self);
}
