//! open(2) 标志与 lseek(2) 的 whence 定义

use bitflags::bitflags;

bitflags! {
    /// open(2) 的标志位
    ///
    /// 访问模式占低两位（`O_RDONLY` 为 0），其余为普通标志位。
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u32 {
        const O_RDONLY = 0o0;
        const O_WRONLY = 0o1;
        const O_RDWR = 0o2;
        const O_ACCMODE = 0o3;
        const O_CREAT = 0o100;
        const O_EXCL = 0o200;
        const O_NOCTTY = 0o400;
        const O_TRUNC = 0o1000;
        const O_APPEND = 0o2000;
        const O_NONBLOCK = 0o4000;
        const O_SYNC = 0o4010000;
        const O_CLOEXEC = 0o2000000;
    }
}

impl OpenFlags {
    /// 访问模式位
    #[inline]
    fn access_mode(&self) -> u32 {
        self.bits() & Self::O_ACCMODE.bits()
    }

    /// 是否以可读方式打开
    pub fn readable(&self) -> bool {
        let mode = self.access_mode();
        mode == Self::O_RDONLY.bits() || mode == Self::O_RDWR.bits()
    }

    /// 是否以可写方式打开
    pub fn writable(&self) -> bool {
        let mode = self.access_mode();
        mode == Self::O_WRONLY.bits() || mode == Self::O_RDWR.bits()
    }
}

/// lseek 的起始位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum SeekWhence {
    /// 相对文件开头 (SEEK_SET)
    Set = 0,
    /// 相对当前位置 (SEEK_CUR)
    Cur = 1,
    /// 相对文件末尾 (SEEK_END)
    End = 2,
}

impl TryFrom<usize> for SeekWhence {
    type Error = ();

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SeekWhence::Set),
            1 => Ok(SeekWhence::Cur),
            2 => Ok(SeekWhence::End),
            _ => Err(()),
        }
    }
}
