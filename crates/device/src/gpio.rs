//! GPIO 服务接口
//!
//! 对应 `gpio_request()` / `gpio_direction_output()` / `gpio_set_value()` /
//! `gpio_get_value()` / `gpio_free()`。

use cdev::ServiceError;

/// 已申请的引脚
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinHandle {
    pin: u32,
}

impl PinHandle {
    /// 由服务实现在申请成功后创建
    pub const fn new(pin: u32) -> Self {
        Self { pin }
    }

    /// 引脚编号
    pub fn pin(&self) -> u32 {
        self.pin
    }
}

/// GPIO 控制器
pub trait PinService: Send + Sync {
    /// 以 `label` 申请引脚
    fn claim(&self, pin: u32, label: &str) -> Result<PinHandle, ServiceError>;

    /// 配置为输出，并设置初始电平
    fn set_direction_output(&self, pin: &PinHandle, level: bool) -> Result<(), ServiceError>;

    /// 设置输出电平
    fn set_level(&self, pin: &PinHandle, level: bool);

    /// 读取当前电平
    fn level(&self, pin: &PinHandle) -> bool;

    /// 释放引脚
    fn release(&self, pin: &PinHandle);
}
