//! GPIO 输出设备
//!
//! 写入协议：每次 write 只消费第一个字节，`'1'` 拉高引脚，`'0'` 拉低引脚，
//! 其他字节记录错误后忽略；多余的字节被丢弃，返回值始终是消费的字节数。
//! 设备没有 read 操作。引脚电平以硬件为准，软件不缓存。

use alloc::string::String;
use alloc::sync::Arc;
use cdev::io_buffer::IoBufferReader;
use cdev::{
    BackendFault, Capabilities, CharBackend, FileHandle, FileOperations, FsError, ResourceStack,
};
use sync::SpinLock;

use crate::config::{GPIO_LED_MODULE, GpioLedConfig};
use crate::gpio::{PinHandle, PinService};

struct Claimed {
    pin: PinHandle,
    /// 释放引脚的动作
    resources: ResourceStack,
}

/// GPIO 输出设备
pub struct GpioLed {
    pins: Arc<dyn PinService>,
    pin: u32,
    label: String,
    claimed: SpinLock<Option<Claimed>>,
}

impl GpioLed {
    /// 创建设备，引脚在加载时申请
    pub fn new(pins: Arc<dyn PinService>, config: &GpioLedConfig) -> Self {
        Self {
            pins,
            pin: config.pin,
            label: config.label.clone(),
            claimed: SpinLock::new(None),
        }
    }

    /// 读取引脚当前电平；引脚未申请时返回 `None`
    pub fn level(&self) -> Option<bool> {
        let claimed = self.claimed.lock();
        claimed.as_ref().map(|c| self.pins.level(&c.pin))
    }

    /// 引脚是否已申请
    pub fn is_claimed(&self) -> bool {
        self.claimed.lock().is_some()
    }
}

impl FileOperations for GpioLed {
    fn capabilities(&self) -> Capabilities {
        Capabilities::WRITE
    }

    fn open(&self, _file: &FileHandle) -> Result<(), FsError> {
        log::info!("{}: device opened", GPIO_LED_MODULE);
        Ok(())
    }

    fn release(&self, _file: &FileHandle) {
        log::info!("{}: device closed", GPIO_LED_MODULE);
    }

    fn write(&self, _file: &FileHandle, buf: &mut dyn IoBufferReader) -> Result<usize, FsError> {
        let claimed = self.claimed.lock();
        let claimed = claimed.as_ref().ok_or(FsError::NoDevice)?;

        log::debug!("{}: write requested {} bytes", GPIO_LED_MODULE, buf.len());
        if buf.is_empty() {
            return Ok(0);
        }

        let mut cmd = [0u8; 1];
        buf.read_slice(&mut cmd)?;
        match cmd[0] {
            b'1' => self.pins.set_level(&claimed.pin, true),
            b'0' => self.pins.set_level(&claimed.pin, false),
            other => log::error!(
                "{}: unknown command {:#04x}, expected '0' or '1'",
                GPIO_LED_MODULE,
                other
            ),
        }
        Ok(cmd.len())
    }
}

impl CharBackend for GpioLed {
    fn acquire_resources(&self) -> Result<(), BackendFault> {
        let mut resources = ResourceStack::new();

        let pin = self.pins.claim(self.pin, &self.label).map_err(|e| {
            log::error!("{}: cannot claim gpio {}: {}", GPIO_LED_MODULE, self.pin, e);
            BackendFault::new("gpio request", e)
        })?;
        {
            let pins = self.pins.clone();
            let pin = pin.clone();
            resources.push("gpio", move || pins.release(&pin));
        }

        self.pins.set_direction_output(&pin, false).map_err(|e| {
            log::error!(
                "{}: cannot set gpio {} as output: {}",
                GPIO_LED_MODULE,
                self.pin,
                e
            );
            BackendFault::new("gpio direction", e)
        })?;

        log::info!("{}: gpio {} ready as output", GPIO_LED_MODULE, self.pin);
        *self.claimed.lock() = Some(Claimed { pin, resources });
        Ok(())
    }

    fn release_resources(&self) {
        let claimed = self.claimed.lock().take();
        if let Some(mut claimed) = claimed {
            // 释放之前先拉低
            self.pins.set_level(&claimed.pin, false);
            claimed.resources.unwind();
            log::info!("{}: gpio {} released", GPIO_LED_MODULE, self.pin);
        }
    }
}
