//! 字符设备核心层
//!
//! 此 crate 提供伪字符设备驱动所依赖的内核侧抽象，包括：
//!
//! - [`IdentityService`] / [`ChrdevAllocator`] - 设备号（major:minor）分配
//! - [`NamespaceService`] / [`DevNamespace`] - 设备类与 `/dev` 节点
//! - [`FileOperations`] - 驱动提供给 VFS 的操作表
//! - [`CdevRegistry`] / [`CdevMap`] - 设备号到操作表的绑定与分发
//! - [`ResourceStack`] - 按获取顺序记录资源、逆序释放
//! - [`lifecycle`] - 模块加载/卸载的有序初始化与回滚

#![no_std]
#![allow(clippy::module_inception)]

extern crate alloc;

pub mod config;
pub mod devno;
pub mod error;
pub mod io_buffer;
pub mod lifecycle;

mod cdev_map;
mod file;
mod host;
mod impls;
mod namespace;
mod resource;

// Re-export error
pub use error::{BackendFault, FsError, InitError, ServiceError};

// Re-export devno
pub use devno::{ChrdevAllocator, DeviceIdentity, IdentityService, major, makedev, minor};

// Re-export namespace
pub use namespace::{ClassHandle, DevNamespace, DeviceHandle, NamespaceService};

// Re-export file
pub use file::{Capabilities, CharBackend, FileHandle, FileOperations};

// Re-export cdev map
pub use cdev_map::{CdevHandle, CdevMap, CdevRegistry};

// Re-export impls
pub use impls::CharDeviceFile;

// Re-export resource
pub use resource::ResourceStack;

// Re-export lifecycle
pub use lifecycle::{DeviceDesc, DeviceModule, KernelServices, Ready, initialize, teardown};

// Re-export host
pub use host::HostKernel;

// Re-export io buffers
pub use io_buffer::{IoBufferReader, IoBufferWriter, UserSliceReader, UserSliceWriter};

// Re-export uapi types for convenience
pub use uapi::fcntl::{OpenFlags, SeekWhence};

#[cfg(test)]
mod tests;
