//! 驱动模块入口
//!
//! 每个函数把后端和它的设备描述组装成尚未加载的 [`DeviceModule`]，
//! 调用者负责 `load()`；模块被 drop 时自动卸载。

use alloc::sync::Arc;
use cdev::{DeviceModule, KernelServices};

use crate::config::{Bmp280Config, GpioLedConfig, MemBufConfig};
use crate::gpio::PinService;
use crate::i2c::BusService;
use crate::{Bmp280, GpioLed, MemBuffer};

/// 内存缓冲区设备模块
pub fn membuf(services: KernelServices, config: &MemBufConfig) -> DeviceModule<MemBuffer> {
    DeviceModule::new(services, config.desc(), MemBuffer::new(config))
}

/// GPIO 输出设备模块
pub fn gpio_led(
    services: KernelServices,
    pins: Arc<dyn PinService>,
    config: &GpioLedConfig,
) -> DeviceModule<GpioLed> {
    DeviceModule::new(services, config.desc(), GpioLed::new(pins, config))
}

/// BMP280 传感器模块
pub fn bmp280(
    services: KernelServices,
    bus: Arc<dyn BusService>,
    config: &Bmp280Config,
) -> DeviceModule<Bmp280> {
    DeviceModule::new(services, config.desc(), Bmp280::new(bus, config))
}
