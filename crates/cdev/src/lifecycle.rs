//! 模块生命周期
//!
//! 初始化按固定顺序获取资源：
//!
//! 1. 分配设备号
//! 2. 创建设备类
//! 3. 发布设备节点
//! 4. 绑定操作表
//! 5. 后端获取硬件资源
//!
//! 任何一步失败，之前获取的资源都按相反顺序释放，然后返回该步骤对应的 [`InitError`]。
//! 成功时返回的 [`Ready`] 是全部资源的唯一所有者，[`teardown`] 按相反顺序释放它们。

use alloc::string::{String, ToString};
use alloc::sync::Arc;

use crate::{
    CdevRegistry, CharBackend, DeviceHandle, DeviceIdentity, FileOperations, IdentityService,
    InitError, NamespaceService, ResourceStack,
};

/// 驱动初始化所依赖的内核服务
#[derive(Clone)]
pub struct KernelServices {
    /// 设备号分配
    pub identity: Arc<dyn IdentityService>,
    /// 设备类与节点
    pub namespace: Arc<dyn NamespaceService>,
    /// 操作表绑定
    pub cdevs: Arc<dyn CdevRegistry>,
}

impl KernelServices {
    /// 组合三个内核服务
    pub fn new(
        identity: Arc<dyn IdentityService>,
        namespace: Arc<dyn NamespaceService>,
        cdevs: Arc<dyn CdevRegistry>,
    ) -> Self {
        Self {
            identity,
            namespace,
            cdevs,
        }
    }
}

/// 设备在内核中登记时使用的名字
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDesc {
    /// 日志前缀（模块名）
    pub module: &'static str,
    /// 设备号区域名
    pub region: String,
    /// 设备类名
    pub class: String,
    /// `/dev` 下的节点名
    pub node: String,
}

impl DeviceDesc {
    /// 创建设备描述
    pub fn new(module: &'static str, region: &str, class: &str, node: &str) -> Self {
        Self {
            module,
            region: region.to_string(),
            class: class.to_string(),
            node: node.to_string(),
        }
    }
}

/// 初始化成功后的设备
///
/// 持有全部已获取资源；drop 时自动逆序释放。
pub struct Ready {
    module: &'static str,
    identity: DeviceIdentity,
    node: DeviceHandle,
    resources: ResourceStack,
}

impl Ready {
    /// 分配到的设备号区间
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// 起始设备号
    pub fn devno(&self) -> u64 {
        self.identity.devno()
    }

    /// 已发布的节点
    pub fn node(&self) -> &DeviceHandle {
        &self.node
    }

    /// 资源是否已全部释放
    pub fn is_released(&self) -> bool {
        self.resources.is_empty()
    }

    /// 逆序释放全部资源；重复调用无副作用
    pub fn release(&mut self) {
        if self.resources.is_empty() {
            return;
        }
        log::info!("{}: tearing down /dev/{}", self.module, self.node.node());
        self.resources.unwind();
        log::info!("{}: device driver removed", self.module);
    }
}

impl Drop for Ready {
    fn drop(&mut self) {
        self.release();
    }
}

/// 按顺序获取设备的全部资源
///
/// 失败时已获取的资源全部逆序释放，不留下任何部分状态。
pub fn initialize<B: CharBackend + 'static>(
    services: &KernelServices,
    desc: &DeviceDesc,
    backend: &Arc<B>,
) -> Result<Ready, InitError> {
    let module = desc.module;
    // 提前返回时 resources 被 drop，已获取的资源按逆序释放
    let mut resources = ResourceStack::new();

    let identity = services.identity.allocate(&desc.region).map_err(|e| {
        log::error!("{}: cannot allocate major number: {}", module, e);
        InitError::IdentityExhausted
    })?;
    log::info!(
        "{}: major = {} minor = {}",
        module,
        identity.major(),
        identity.minor()
    );
    {
        let svc = services.identity.clone();
        let identity = identity.clone();
        resources.push("device number", move || svc.release(&identity));
    }

    let class = services
        .namespace
        .create_class(&desc.class)
        .map_err(|e| {
            log::error!("{}: cannot create class {}: {}", module, desc.class, e);
            InitError::NamespaceUnavailable
        })?;
    {
        let svc = services.namespace.clone();
        let class = class.clone();
        resources.push("device class", move || svc.destroy_class(&class));
    }

    let node = services
        .namespace
        .publish(&class, &identity, &desc.node)
        .map_err(|e| {
            log::error!("{}: cannot create device {}: {}", module, desc.node, e);
            InitError::PublishFailed
        })?;
    {
        let svc = services.namespace.clone();
        let node = node.clone();
        resources.push("device node", move || svc.unpublish(&node));
    }

    let ops: Arc<dyn FileOperations> = backend.clone();
    let binding = services.cdevs.bind(&identity, ops).map_err(|e| {
        log::error!("{}: cannot add the device to the system: {}", module, e);
        InitError::BindFailed
    })?;
    {
        let svc = services.cdevs.clone();
        resources.push("cdev binding", move || svc.unbind(&binding));
    }

    backend.acquire_resources().map_err(|fault| {
        log::error!("{}: {}", module, fault);
        InitError::BackendUnavailable(fault)
    })?;
    {
        let backend = backend.clone();
        resources.push("backend", move || backend.release_resources());
    }

    log::info!("{}: device driver inserted: /dev/{}", module, desc.node);
    Ok(Ready {
        module,
        identity,
        node,
        resources,
    })
}

/// 逆序释放设备的全部资源
pub fn teardown(mut ready: Ready) {
    ready.release();
}

/// 可加载/卸载的驱动模块
///
/// 卸载未加载的模块、重复卸载均无副作用；模块被 drop 时自动卸载。
pub struct DeviceModule<B: CharBackend + 'static> {
    services: KernelServices,
    desc: DeviceDesc,
    backend: Arc<B>,
    ready: Option<Ready>,
}

impl<B: CharBackend + 'static> DeviceModule<B> {
    /// 创建未加载的模块
    pub fn new(services: KernelServices, desc: DeviceDesc, backend: B) -> Self {
        Self {
            services,
            desc,
            backend: Arc::new(backend),
            ready: None,
        }
    }

    /// 加载模块；已加载时直接返回
    pub fn load(&mut self) -> Result<(), InitError> {
        if self.ready.is_some() {
            log::warn!("{}: already loaded", self.desc.module);
            return Ok(());
        }
        let ready = initialize(&self.services, &self.desc, &self.backend)?;
        self.ready = Some(ready);
        Ok(())
    }

    /// 卸载模块
    pub fn unload(&mut self) {
        match self.ready.take() {
            Some(ready) => teardown(ready),
            None => log::debug!("{}: not loaded", self.desc.module),
        }
    }

    /// 是否已加载
    pub fn is_loaded(&self) -> bool {
        self.ready.is_some()
    }

    /// 已加载时返回设备
    pub fn ready(&self) -> Option<&Ready> {
        self.ready.as_ref()
    }

    /// 驱动后端
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// 设备描述
    pub fn desc(&self) -> &DeviceDesc {
        &self.desc
    }
}

impl<B: CharBackend + 'static> Drop for DeviceModule<B> {
    fn drop(&mut self) {
        self.unload();
    }
}
