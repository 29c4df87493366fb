//! I2C 服务接口
//!
//! 对应 `i2c_get_adapter()` / `i2c_new_client_device()` / `i2c_add_driver()` 以及
//! SMBus 的 byte/word 读写。所有传输都可能失败。

use alloc::string::{String, ToString};
use cdev::ServiceError;

/// 已获取的总线适配器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterHandle {
    bus: u32,
}

impl AdapterHandle {
    /// 由服务实现在获取成功后创建
    pub const fn new(bus: u32) -> Self {
        Self { bus }
    }

    /// 总线号
    pub fn bus(&self) -> u32 {
        self.bus
    }
}

/// 已注册的 client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientHandle {
    bus: u32,
    addr: u16,
}

impl ClientHandle {
    /// 由服务实现在注册成功后创建
    pub const fn new(bus: u32, addr: u16) -> Self {
        Self { bus, addr }
    }

    /// 所在总线号
    pub fn bus(&self) -> u32 {
        self.bus
    }

    /// 从机地址
    pub fn addr(&self) -> u16 {
        self.addr
    }
}

/// 已注册的驱动描述符
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverHandle {
    name: String,
}

impl DriverHandle {
    /// 由服务实现在注册成功后创建
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// 驱动名
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// I2C 总线服务
pub trait BusService: Send + Sync {
    /// 获取总线适配器
    fn get_adapter(&self, bus: u32) -> Result<AdapterHandle, ServiceError>;

    /// 归还总线适配器
    fn put_adapter(&self, adapter: &AdapterHandle);

    /// 在适配器上注册地址为 `addr` 的 client
    fn register_client(
        &self,
        adapter: &AdapterHandle,
        addr: u16,
        name: &str,
    ) -> Result<ClientHandle, ServiceError>;

    /// 注销 client
    fn unregister_client(&self, client: &ClientHandle);

    /// 注册驱动描述符
    fn add_driver(&self, name: &str) -> Result<DriverHandle, ServiceError>;

    /// 注销驱动描述符
    fn del_driver(&self, driver: &DriverHandle);

    /// 读取一个字节寄存器
    fn read_byte(&self, client: &ClientHandle, reg: u8) -> Result<u8, ServiceError>;

    /// 读取一个 16 位字（小端序）
    fn read_word(&self, client: &ClientHandle, reg: u8) -> Result<u16, ServiceError>;

    /// 写入一个字节寄存器
    fn write_byte(&self, client: &ClientHandle, reg: u8, value: u8) -> Result<(), ServiceError>;
}
