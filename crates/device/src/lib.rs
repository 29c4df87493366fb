//! 伪字符设备驱动
//!
//! 此 crate 提供三个字符设备后端，以及它们依赖的硬件服务接口：
//!
//! - [`MemBuffer`] - 固定容量的内存缓冲区，支持 read/write/lseek
//! - [`GpioLed`] - 由单字节命令驱动的 GPIO 输出引脚
//! - [`Bmp280`] - 通过 I2C 读取的温度传感器
//! - [`PinService`] / [`BusService`] - GPIO 与 I2C 的服务接口
//!
//! 每个后端实现 [`cdev::CharBackend`]，由 [`modules`] 中的入口组装成
//! [`cdev::DeviceModule`]。

#![no_std]
#![allow(clippy::module_inception)]

extern crate alloc;

pub mod bmp280;
pub mod config;
pub mod gpio;
pub mod gpio_led;
pub mod i2c;
pub mod membuf;
pub mod modules;

// Re-export backends
pub use bmp280::{Bmp280, Calibration};
pub use gpio_led::GpioLed;
pub use membuf::MemBuffer;

// Re-export services
pub use gpio::{PinHandle, PinService};
pub use i2c::{AdapterHandle, BusService, ClientHandle, DriverHandle};

// Re-export config
pub use config::{Bmp280Config, GpioLedConfig, MemBufConfig};

#[cfg(test)]
mod tests;
