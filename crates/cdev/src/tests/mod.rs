//! cdev 集成测试
//!
//! [`FlakyKernel`] 包装 [`HostKernel`]，可以让指定的内核服务调用失败，
//! 并把每次调用记录到共享的日志中；[`ProbeBackend`] 是一个最小的后端，
//! 同样记录 acquire/release 以及文件操作。

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use sync::SpinLock;

use crate::io_buffer::{IoBufferReader, IoBufferWriter};
use crate::{
    BackendFault, CdevHandle, CdevRegistry, Capabilities, CharBackend, ClassHandle, DeviceDesc,
    DeviceHandle, DeviceIdentity, FileHandle, FileOperations, FsError, HostKernel,
    IdentityService, KernelServices, NamespaceService, ServiceError,
};


/// 共享的调用日志
pub type Journal = Arc<SpinLock<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(SpinLock::new(Vec::new()))
}

fn note(journal: &Journal, event: &str) {
    journal.lock().push(String::from(event));
}

/// 让某一步失败
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Nothing,
    Allocate,
    CreateClass,
    Publish,
    Bind,
}

pub struct FlakyKernel {
    pub host: HostKernel,
    pub journal: Journal,
    fail: FailAt,
}

impl FlakyKernel {
    pub fn new(fail: FailAt, journal: Journal) -> Arc<Self> {
        Arc::new(Self {
            host: HostKernel::new(),
            journal,
            fail,
        })
    }

    pub fn services(self: &Arc<Self>) -> KernelServices {
        KernelServices::new(self.clone(), self.clone(), self.clone())
    }

    fn check(&self, step: FailAt, err: ServiceError) -> Result<(), ServiceError> {
        if self.fail == step { Err(err) } else { Ok(()) }
    }
}

impl IdentityService for FlakyKernel {
    fn allocate(&self, name: &str) -> Result<DeviceIdentity, ServiceError> {
        self.check(FailAt::Allocate, ServiceError::Exhausted)?;
        note(&self.journal, "allocate");
        self.host.allocator.allocate(name)
    }

    fn release(&self, identity: &DeviceIdentity) {
        note(&self.journal, "release identity");
        self.host.allocator.release(identity);
    }
}

impl NamespaceService for FlakyKernel {
    fn create_class(&self, name: &str) -> Result<ClassHandle, ServiceError> {
        self.check(FailAt::CreateClass, ServiceError::AlreadyExists)?;
        note(&self.journal, "create class");
        self.host.namespace.create_class(name)
    }

    fn destroy_class(&self, class: &ClassHandle) {
        note(&self.journal, "destroy class");
        self.host.namespace.destroy_class(class);
    }

    fn publish(
        &self,
        class: &ClassHandle,
        identity: &DeviceIdentity,
        node: &str,
    ) -> Result<DeviceHandle, ServiceError> {
        self.check(FailAt::Publish, ServiceError::AlreadyExists)?;
        note(&self.journal, "publish");
        self.host.namespace.publish(class, identity, node)
    }

    fn unpublish(&self, device: &DeviceHandle) {
        note(&self.journal, "unpublish");
        self.host.namespace.unpublish(device);
    }
}

impl CdevRegistry for FlakyKernel {
    fn bind(
        &self,
        identity: &DeviceIdentity,
        ops: Arc<dyn FileOperations>,
    ) -> Result<CdevHandle, ServiceError> {
        self.check(FailAt::Bind, ServiceError::Busy)?;
        note(&self.journal, "bind");
        self.host.cdevs.bind(identity, ops)
    }

    fn unbind(&self, handle: &CdevHandle) {
        note(&self.journal, "unbind");
        self.host.cdevs.unbind(handle);
    }
}

/// 最小后端：保存最后一次写入的数据，读取时原样返回
pub struct ProbeBackend {
    journal: Journal,
    fail_acquire: bool,
    acquired: SpinLock<bool>,
    data: SpinLock<Vec<u8>>,
    pub opens: SpinLock<usize>,
    pub releases: SpinLock<usize>,
}

impl ProbeBackend {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            fail_acquire: false,
            acquired: SpinLock::new(false),
            data: SpinLock::new(Vec::new()),
            opens: SpinLock::new(0),
            releases: SpinLock::new(0),
        }
    }

    pub fn failing(journal: Journal) -> Self {
        Self {
            fail_acquire: true,
            ..Self::new(journal)
        }
    }

    pub fn is_acquired(&self) -> bool {
        *self.acquired.lock()
    }
}

impl FileOperations for ProbeBackend {
    fn capabilities(&self) -> Capabilities {
        Capabilities::READ | Capabilities::WRITE
    }

    fn open(&self, _file: &FileHandle) -> Result<(), FsError> {
        *self.opens.lock() += 1;
        Ok(())
    }

    fn release(&self, _file: &FileHandle) {
        *self.releases.lock() += 1;
    }

    fn read(&self, _file: &FileHandle, buf: &mut dyn IoBufferWriter) -> Result<usize, FsError> {
        let data = self.data.lock();
        let n = data.len().min(buf.len());
        buf.write_slice(&data[..n])?;
        Ok(n)
    }

    fn write(&self, _file: &FileHandle, buf: &mut dyn IoBufferReader) -> Result<usize, FsError> {
        let mut incoming = alloc::vec![0u8; buf.len()];
        buf.read_slice(&mut incoming)?;
        let n = incoming.len();
        *self.data.lock() = incoming;
        Ok(n)
    }
}

impl CharBackend for ProbeBackend {
    fn acquire_resources(&self) -> Result<(), BackendFault> {
        if self.fail_acquire {
            return Err(BackendFault::new("probe", ServiceError::NoDevice));
        }
        note(&self.journal, "acquire");
        *self.acquired.lock() = true;
        Ok(())
    }

    fn release_resources(&self) {
        let mut acquired = self.acquired.lock();
        if *acquired {
            note(&self.journal, "release backend");
            *acquired = false;
        }
    }
}

pub fn desc() -> DeviceDesc {
    DeviceDesc::new("PROBE", "probedevice", "probeclass", "probe")
}
