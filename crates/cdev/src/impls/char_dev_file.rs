//! 打开的字符设备文件
//!
//! [`CharDeviceFile`] 把 VFS 的调用分发给驱动的操作表：先检查打开模式、驱动能力和
//! 用户缓冲区，再调用驱动。`sys_*` 系列方法返回系统调用风格的 `isize`
//! （非负为字节数或位置，负数为 `-errno`）。

use alloc::sync::Arc;
use uapi::errno::EINVAL;
use uapi::fcntl::{OpenFlags, SeekWhence};

use crate::io_buffer::{IoBufferReader, IoBufferWriter, UserSliceReader, UserSliceWriter};
use crate::{Capabilities, FileHandle, FileOperations, FsError, major, minor};

/// 字符设备文件
pub struct CharDeviceFile {
    /// 设备驱动
    ops: Arc<dyn FileOperations>,

    /// 本次打开的句柄（包含读写位置）
    handle: FileHandle,
}

impl CharDeviceFile {
    /// 打开设备：创建句柄并调用驱动的 open
    pub fn open(ops: Arc<dyn FileOperations>, devno: u64, flags: OpenFlags) -> Result<Self, FsError> {
        let handle = FileHandle::new(devno, flags);
        ops.open(&handle)?;
        log::debug!("cdev: open {}:{}", major(devno), minor(devno));
        Ok(Self { ops, handle })
    }

    /// 是否以可读方式打开
    pub fn readable(&self) -> bool {
        self.handle.flags().readable()
    }

    /// 是否以可写方式打开
    pub fn writable(&self) -> bool {
        self.handle.flags().writable()
    }

    /// 设备号
    pub fn devno(&self) -> u64 {
        self.handle.devno()
    }

    /// 打开标志
    pub fn flags(&self) -> OpenFlags {
        self.handle.flags()
    }

    /// 当前偏移量
    pub fn offset(&self) -> usize {
        self.handle.pos()
    }

    /// 驱动提供的数据操作
    pub fn capabilities(&self) -> Capabilities {
        self.ops.capabilities()
    }

    /// 从设备读取数据
    pub fn read(&self, buf: &mut dyn IoBufferWriter) -> Result<usize, FsError> {
        if !self.readable() {
            return Err(FsError::PermissionDenied);
        }
        if !self.capabilities().contains(Capabilities::READ) {
            return Err(FsError::NotSupported);
        }
        if buf.is_null() {
            return Err(FsError::InvalidArgument);
        }
        log::debug!("cdev: read {} bytes at {}", buf.len(), self.offset());
        self.ops.read(&self.handle, buf)
    }

    /// 向设备写入数据
    pub fn write(&self, buf: &mut dyn IoBufferReader) -> Result<usize, FsError> {
        if !self.writable() {
            return Err(FsError::PermissionDenied);
        }
        if !self.capabilities().contains(Capabilities::WRITE) {
            return Err(FsError::NotSupported);
        }
        if buf.is_null() {
            return Err(FsError::InvalidArgument);
        }
        log::debug!("cdev: write {} bytes at {}", buf.len(), self.offset());
        self.ops.write(&self.handle, buf)
    }

    /// 设置文件偏移量
    pub fn lseek(&self, offset: isize, whence: SeekWhence) -> Result<usize, FsError> {
        if !self.capabilities().contains(Capabilities::SEEK) {
            return Err(FsError::NotSupported);
        }
        self.ops.llseek(&self.handle, offset, whence)
    }

    /// read(2)：`buf` 为 `None` 表示空指针，`count` 为请求的字节数
    ///
    /// `buf` 比 `count` 短时，越过 `buf` 的拷贝视为访问非法地址。
    pub fn sys_read(&self, buf: Option<&mut [u8]>, count: usize) -> isize {
        let mut writer = UserSliceWriter::with_len(buf, count);
        match self.read(&mut writer) {
            Ok(n) => n as isize,
            Err(e) => e.to_errno(),
        }
    }

    /// write(2)：`buf` 为 `None` 表示空指针，`count` 为请求的字节数
    pub fn sys_write(&self, buf: Option<&[u8]>, count: usize) -> isize {
        let mut reader = UserSliceReader::with_len(buf, count);
        match self.write(&mut reader) {
            Ok(n) => n as isize,
            Err(e) => e.to_errno(),
        }
    }

    /// lseek(2)：非法的 `whence` 返回 `-EINVAL`
    pub fn sys_lseek(&self, offset: isize, whence: usize) -> isize {
        let Ok(whence) = SeekWhence::try_from(whence) else {
            return -(EINVAL as isize);
        };
        match self.lseek(offset, whence) {
            Ok(pos) => pos as isize,
            Err(e) => e.to_errno(),
        }
    }
}

impl Drop for CharDeviceFile {
    fn drop(&mut self) {
        self.ops.release(&self.handle);
        log::debug!(
            "cdev: release {}:{}",
            major(self.handle.devno()),
            minor(self.handle.devno())
        );
    }
}
