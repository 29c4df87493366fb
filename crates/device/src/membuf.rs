//! 固定容量的内存缓冲区设备
//!
//! 所有打开的句柄共享同一块缓冲区，读写位置保存在各自的句柄中。
//! 每次 read/write/lseek 都在设备锁内完成。
//!
//! - read：拷贝 `min(len, capacity - pos)` 字节；位于末尾时返回 0。
//! - write：拷贝 `min(len, capacity - pos)` 字节；可写长度为 0 时返回 `NoSpace`。
//! - lseek：新位置必须落在 `[0, capacity]` 内，否则返回 `InvalidArgument` 且位置不变。

use alloc::vec;
use alloc::vec::Vec;
use cdev::io_buffer::{IoBufferReader, IoBufferWriter};
use cdev::{
    BackendFault, Capabilities, CharBackend, FileHandle, FileOperations, FsError, SeekWhence,
};
use sync::SpinLock;

use crate::config::{MEMBUF_MODULE, MemBufConfig};

/// 内存缓冲区设备
pub struct MemBuffer {
    capacity: usize,
    /// 获取资源之前为 `None`
    data: SpinLock<Option<Vec<u8>>>,
}

impl MemBuffer {
    /// 创建指定容量的设备，缓冲区在加载时分配
    pub fn new(config: &MemBufConfig) -> Self {
        Self {
            capacity: config.capacity,
            data: SpinLock::new(None),
        }
    }

    /// 缓冲区容量
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 获取缓冲区内容（用于调试）
    pub fn raw_data(&self) -> Option<Vec<u8>> {
        self.data.lock().clone()
    }
}

impl FileOperations for MemBuffer {
    fn capabilities(&self) -> Capabilities {
        Capabilities::READ | Capabilities::WRITE | Capabilities::SEEK
    }

    fn open(&self, _file: &FileHandle) -> Result<(), FsError> {
        log::info!("{}: device opened", MEMBUF_MODULE);
        Ok(())
    }

    fn release(&self, _file: &FileHandle) {
        log::info!("{}: device closed", MEMBUF_MODULE);
    }

    fn read(&self, file: &FileHandle, buf: &mut dyn IoBufferWriter) -> Result<usize, FsError> {
        let guard = self.data.lock();
        let data = guard.as_ref().ok_or(FsError::NoDevice)?;

        let pos = file.pos();
        let count = buf.len().min(self.capacity.saturating_sub(pos));
        log::debug!(
            "{}: read requested {} bytes, copying {} from {}",
            MEMBUF_MODULE,
            buf.len(),
            count,
            pos
        );
        if count == 0 {
            return Ok(0);
        }

        buf.write_slice(&data[pos..pos + count])?;
        file.set_pos(pos + count);
        Ok(count)
    }

    fn write(&self, file: &FileHandle, buf: &mut dyn IoBufferReader) -> Result<usize, FsError> {
        let mut guard = self.data.lock();
        let data = guard.as_mut().ok_or(FsError::NoDevice)?;

        let pos = file.pos();
        let count = buf.len().min(self.capacity.saturating_sub(pos));
        log::debug!(
            "{}: write requested {} bytes, copying {} to {}",
            MEMBUF_MODULE,
            buf.len(),
            count,
            pos
        );
        if count == 0 {
            log::warn!("{}: no space left on device", MEMBUF_MODULE);
            return Err(FsError::NoSpace);
        }

        buf.read_slice(&mut data[pos..pos + count])?;
        file.set_pos(pos + count);
        Ok(count)
    }

    fn llseek(&self, file: &FileHandle, offset: isize, whence: SeekWhence) -> Result<usize, FsError> {
        let _guard = self.data.lock();

        let base = match whence {
            SeekWhence::Set => 0,
            SeekWhence::Cur => file.pos(),
            SeekWhence::End => self.capacity,
        };
        let target = base
            .checked_add_signed(offset)
            .filter(|&pos| pos <= self.capacity)
            .ok_or(FsError::InvalidArgument)?;

        log::debug!(
            "{}: seek {:?} {} -> {}",
            MEMBUF_MODULE,
            whence,
            offset,
            target
        );
        file.set_pos(target);
        Ok(target)
    }
}

impl CharBackend for MemBuffer {
    fn acquire_resources(&self) -> Result<(), BackendFault> {
        *self.data.lock() = Some(vec![0u8; self.capacity]);
        Ok(())
    }

    fn release_resources(&self) {
        self.data.lock().take();
    }
}
