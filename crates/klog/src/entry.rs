//! 日志条目结构
//!
//! 条目大小固定，消息直接格式化进内联数组，写入路径不做堆分配。

use core::fmt::{self, Write};

use crate::config::MAX_LOG_MESSAGE_LENGTH;
use crate::level::LogLevel;

/// 单条日志
#[derive(Clone)]
pub struct LogEntry {
    level: LogLevel,
    cpu_id: usize,
    task_id: u32,
    timestamp: usize,
    len: usize,
    message: [u8; MAX_LOG_MESSAGE_LENGTH],
}

/// 把格式化输出写进定长数组，超出部分按字符边界截断
struct MessageWriter<'a> {
    buf: &'a mut [u8; MAX_LOG_MESSAGE_LENGTH],
    len: usize,
}

impl Write for MessageWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = MAX_LOG_MESSAGE_LENGTH - self.len;
        let mut take = s.len().min(room);
        while !s.is_char_boundary(take) {
            take -= 1;
        }
        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}

impl LogEntry {
    /// 由 `format_args!` 的结果构造条目
    pub fn from_args(
        level: LogLevel,
        cpu_id: usize,
        task_id: u32,
        timestamp: usize,
        args: fmt::Arguments,
    ) -> Self {
        let mut message = [0u8; MAX_LOG_MESSAGE_LENGTH];
        let mut writer = MessageWriter {
            buf: &mut message,
            len: 0,
        };
        // 截断不视为错误，MessageWriter 永远返回 Ok
        let _ = writer.write_fmt(args);
        let len = writer.len;
        Self {
            level,
            cpu_id,
            task_id,
            timestamp,
            len,
            message,
        }
    }

    /// 日志级别
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// 产生日志的 CPU
    pub fn cpu_id(&self) -> usize {
        self.cpu_id
    }

    /// 产生日志的任务，没有任务上下文时为 0
    pub fn task_id(&self) -> u32 {
        self.task_id
    }

    /// 时间戳
    pub fn timestamp(&self) -> usize {
        self.timestamp
    }

    /// 消息文本
    pub fn message(&self) -> &str {
        // MessageWriter 只在字符边界处截断，内容总是合法 UTF-8
        core::str::from_utf8(&self.message[..self.len]).unwrap_or("")
    }
}

impl fmt::Debug for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogEntry")
            .field("level", &self.level)
            .field("timestamp", &self.timestamp)
            .field("message", &self.message())
            .finish()
    }
}
