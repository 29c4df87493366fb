//! I/O 缓冲区
//!
//! 驱动的 read/write 不直接接触用户指针，而是通过 [`IoBufferWriter`] / [`IoBufferReader`]
//! 拷贝数据。`len()` 是调用者声明的字节数，真正可访问的内存可能更短（或根本不存在），
//! 拷贝越界时返回 [`FsError::BadAddress`]，对应 `copy_to_user()` / `copy_from_user()` 失败。

use crate::FsError;

/// 供驱动读取的缓冲区（write 系统调用的数据来源）
pub trait IoBufferReader {
    /// 剩余可读字节数
    ///
    /// 即使读取不超过该长度，也可能因地址不可访问而失败。
    fn len(&self) -> usize;

    /// 是否没有剩余数据
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 缓冲区地址是否为空指针
    fn is_null(&self) -> bool {
        false
    }

    /// 读取恰好 `data.len()` 个字节
    ///
    /// 超出剩余长度或地址不可访问时返回 `BadAddress`，此时缓冲区位置不变。
    fn read_slice(&mut self, data: &mut [u8]) -> Result<(), FsError>;
}

/// 供驱动写入的缓冲区（read 系统调用的目的地）
pub trait IoBufferWriter {
    /// 剩余可写字节数
    fn len(&self) -> usize;

    /// 是否已写满
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 缓冲区地址是否为空指针
    fn is_null(&self) -> bool {
        false
    }

    /// 写入整个 `data`
    ///
    /// 超出剩余长度或地址不可访问时返回 `BadAddress`，此时缓冲区位置不变。
    fn write_slice(&mut self, data: &[u8]) -> Result<(), FsError>;
}

/// 基于切片的用户缓冲区读取器
pub struct UserSliceReader<'a> {
    /// 实际可访问的内存，`None` 表示空指针
    mem: Option<&'a [u8]>,
    /// 调用者声明的长度
    len: usize,
    pos: usize,
}

impl<'a> UserSliceReader<'a> {
    /// 以整个切片作为用户缓冲区
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            mem: Some(data),
            len: data.len(),
            pos: 0,
        }
    }

    /// 声明长度为 `len` 的缓冲区，实际可访问的只有 `mem`
    pub fn with_len(mem: Option<&'a [u8]>, len: usize) -> Self {
        Self { mem, len, pos: 0 }
    }

    /// 长度为 `len` 的空指针缓冲区
    pub fn null(len: usize) -> Self {
        Self::with_len(None, len)
    }

    /// 已读取的字节数
    pub fn consumed(&self) -> usize {
        self.pos
    }
}

impl IoBufferReader for UserSliceReader<'_> {
    fn len(&self) -> usize {
        self.len - self.pos
    }

    fn is_null(&self) -> bool {
        self.mem.is_none()
    }

    fn read_slice(&mut self, data: &mut [u8]) -> Result<(), FsError> {
        let end = self.pos + data.len();
        if end > self.len {
            return Err(FsError::BadAddress);
        }
        let src = self
            .mem
            .and_then(|mem| mem.get(self.pos..end))
            .ok_or(FsError::BadAddress)?;
        data.copy_from_slice(src);
        self.pos = end;
        Ok(())
    }
}

/// 基于切片的用户缓冲区写入器
pub struct UserSliceWriter<'a> {
    mem: Option<&'a mut [u8]>,
    len: usize,
    pos: usize,
}

impl<'a> UserSliceWriter<'a> {
    /// 以整个切片作为用户缓冲区
    pub fn new(data: &'a mut [u8]) -> Self {
        let len = data.len();
        Self {
            mem: Some(data),
            len,
            pos: 0,
        }
    }

    /// 声明长度为 `len` 的缓冲区，实际可访问的只有 `mem`
    pub fn with_len(mem: Option<&'a mut [u8]>, len: usize) -> Self {
        Self { mem, len, pos: 0 }
    }

    /// 长度为 `len` 的空指针缓冲区
    pub fn null(len: usize) -> Self {
        Self::with_len(None, len)
    }

    /// 已写入的字节数
    pub fn written(&self) -> usize {
        self.pos
    }
}

impl IoBufferWriter for UserSliceWriter<'_> {
    fn len(&self) -> usize {
        self.len - self.pos
    }

    fn is_null(&self) -> bool {
        self.mem.is_none()
    }

    fn write_slice(&mut self, data: &[u8]) -> Result<(), FsError> {
        let end = self.pos + data.len();
        if end > self.len {
            return Err(FsError::BadAddress);
        }
        let start = self.pos;
        let dst = self
            .mem
            .as_deref_mut()
            .and_then(|mem| mem.get_mut(start..end))
            .ok_or(FsError::BadAddress)?;
        dst.copy_from_slice(data);
        self.pos = end;
        Ok(())
    }
}
