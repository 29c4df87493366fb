//! 与用户空间共用定义和声明
//!
//! 包含 errno、打开标志和 lseek 的 whence 取值，确保驱动与用户态测试程序的一致性

#![no_std]
#![allow(dead_code)]
// uapi 中包含大量与 Linux 兼容的常量定义；逐项补 `///` 噪声较大。
#![allow(missing_docs)]

pub mod errno;
pub mod fcntl;
