//! BMP280 温度传感器
//!
//! 加载时依次获取总线适配器、注册 client、注册驱动描述符，读取芯片 ID 与三个温度校准系数，
//! 然后写 config / ctrl_meas 寄存器进入连续测量模式。任一步失败，已完成的注册按逆序撤销。
//!
//! 每次 read 都重新读取三个原始寄存器，经过定点补偿得到以 0.01°C 为单位的温度，
//! 以 4 字节小端序 `i32` 返回给调用者（最多拷贝 `min(len, 4)` 字节）。

use alloc::sync::Arc;
use cdev::io_buffer::IoBufferWriter;
use cdev::{
    BackendFault, Capabilities, CharBackend, FileHandle, FileOperations, FsError, ResourceStack,
    ServiceError,
};
use sync::SpinLock;

use crate::config::{
    BMP280_CHIP_ID, BMP280_CONFIG_VALUE, BMP280_CTRL_MEAS_VALUE, BMP280_MODULE,
    BMP280_SAMPLE_SIZE, Bmp280Config, bmp280_reg,
};
use crate::i2c::{BusService, ClientHandle};

/// 把 16 位无符号寄存器值按补码解释为有符号数
#[inline]
pub const fn sign_extend16(raw: u16) -> i32 {
    if raw > 0x7FFF {
        raw as i32 - 0x1_0000
    } else {
        raw as i32
    }
}

/// 由三个温度寄存器（0xFA/0xFB/0xFC）拼出 20 位原始采样值
#[inline]
pub const fn raw_sample(msb: u8, lsb: u8, xlsb: u8) -> i32 {
    (((msb as i32) << 16) | ((lsb as i32) << 8) | xlsb as i32) >> 4
}

/// 温度校准系数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    /// dig_T1（无符号）
    pub t1: i32,
    /// dig_T2（有符号）
    pub t2: i32,
    /// dig_T3（有符号）
    pub t3: i32,
}

impl Calibration {
    /// 由寄存器读出的原始字构造，T2 与 T3 做符号扩展，T1 保持无符号
    pub const fn from_raw(t1: u16, t2: u16, t3: u16) -> Self {
        Self {
            t1: t1 as i32,
            t2: sign_extend16(t2),
            t3: sign_extend16(t3),
        }
    }

    /// 定点温度补偿，返回 0.01°C 为单位的温度
    ///
    /// 全程按 32 位有符号整数运算，右移为算术右移，溢出按补码回绕。
    pub fn compensate(&self, raw: i32) -> i32 {
        let var1 = ((raw >> 3).wrapping_sub(self.t1 << 1)).wrapping_mul(self.t2) >> 11;
        let delta = (raw >> 4).wrapping_sub(self.t1);
        let var2 = ((delta.wrapping_mul(delta) >> 12).wrapping_mul(self.t3)) >> 14;
        (var1.wrapping_add(var2).wrapping_mul(5).wrapping_add(128)) >> 8
    }
}

/// 加载后持有的传感器状态
struct Session {
    client: ClientHandle,
    calibration: Calibration,
    /// 撤销总线注册的动作
    resources: ResourceStack,
}

/// BMP280 温度传感器
pub struct Bmp280 {
    bus: Arc<dyn BusService>,
    config: Bmp280Config,
    session: SpinLock<Option<Session>>,
}

impl Bmp280 {
    /// 创建设备，总线资源在加载时获取
    pub fn new(bus: Arc<dyn BusService>, config: &Bmp280Config) -> Self {
        Self {
            bus,
            config: config.clone(),
            session: SpinLock::new(None),
        }
    }

    /// 加载时读取的校准系数
    pub fn calibration(&self) -> Option<Calibration> {
        self.session.lock().as_ref().map(|s| s.calibration)
    }

    /// 读取一次温度（0.01°C）
    pub fn read_temperature(&self) -> Result<i32, FsError> {
        let (client, calibration) = {
            let session = self.session.lock();
            let session = session.as_ref().ok_or(FsError::NoDevice)?;
            (session.client.clone(), session.calibration)
        };

        let read = |reg: u8| {
            self.bus.read_byte(&client, reg).map_err(|e| {
                log::error!("{}: read of register {:#04x} failed: {}", BMP280_MODULE, reg, e);
                FsError::from(e)
            })
        };
        let msb = read(bmp280_reg::TEMP_MSB)?;
        let lsb = read(bmp280_reg::TEMP_LSB)?;
        let xlsb = read(bmp280_reg::TEMP_XLSB)?;

        Ok(calibration.compensate(raw_sample(msb, lsb, xlsb)))
    }

    fn fault(step: &'static str, cause: ServiceError) -> BackendFault {
        log::error!("{}: {} failed: {}", BMP280_MODULE, step, cause);
        BackendFault::new(step, cause)
    }

    fn read_word(&self, client: &ClientHandle, reg: u8, step: &'static str) -> Result<u16, BackendFault> {
        self.bus
            .read_word(client, reg)
            .map_err(|e| Self::fault(step, e))
    }
}

impl FileOperations for Bmp280 {
    fn capabilities(&self) -> Capabilities {
        Capabilities::READ
    }

    fn open(&self, _file: &FileHandle) -> Result<(), FsError> {
        log::info!("{}: device opened", BMP280_MODULE);
        Ok(())
    }

    fn release(&self, _file: &FileHandle) {
        log::info!("{}: device closed", BMP280_MODULE);
    }

    fn read(&self, _file: &FileHandle, buf: &mut dyn IoBufferWriter) -> Result<usize, FsError> {
        log::debug!("{}: read requested {} bytes", BMP280_MODULE, buf.len());

        let temperature = self.read_temperature()?;
        let bytes = temperature.to_le_bytes();
        let count = buf.len().min(BMP280_SAMPLE_SIZE);
        buf.write_slice(&bytes[..count]).inspect_err(|_| {
            log::error!("{}: unable to copy data to user space", BMP280_MODULE);
        })?;
        Ok(count)
    }
}

impl CharBackend for Bmp280 {
    fn acquire_resources(&self) -> Result<(), BackendFault> {
        let cfg = &self.config;
        let mut resources = ResourceStack::new();

        let adapter = self
            .bus
            .get_adapter(cfg.bus)
            .map_err(|e| Self::fault("i2c adapter", e))?;
        {
            let bus = self.bus.clone();
            let adapter = adapter.clone();
            resources.push("i2c adapter", move || bus.put_adapter(&adapter));
        }

        let client = self
            .bus
            .register_client(&adapter, cfg.address, &cfg.name)
            .map_err(|e| Self::fault("i2c client", e))?;
        {
            let bus = self.bus.clone();
            let client = client.clone();
            resources.push("i2c client", move || bus.unregister_client(&client));
        }

        let driver = self
            .bus
            .add_driver(&cfg.name)
            .map_err(|e| Self::fault("i2c driver", e))?;
        {
            let bus = self.bus.clone();
            resources.push("i2c driver", move || bus.del_driver(&driver));
        }
        log::info!("{}: {} driver added", BMP280_MODULE, cfg.name);

        let id = self
            .bus
            .read_byte(&client, bmp280_reg::CHIP_ID)
            .map_err(|e| Self::fault("chip id", e))?;
        log::info!("{}: chip id {:#x}", BMP280_MODULE, id);
        if id != BMP280_CHIP_ID {
            log::warn!(
                "{}: unexpected chip id {:#x}, expected {:#x}",
                BMP280_MODULE,
                id,
                BMP280_CHIP_ID
            );
        }

        let t1 = self.read_word(&client, bmp280_reg::DIG_T1, "calibration T1")?;
        let t2 = self.read_word(&client, bmp280_reg::DIG_T2, "calibration T2")?;
        let t3 = self.read_word(&client, bmp280_reg::DIG_T3, "calibration T3")?;
        let calibration = Calibration::from_raw(t1, t2, t3);
        log::debug!("{}: calibration {:?}", BMP280_MODULE, calibration);

        self.bus
            .write_byte(&client, bmp280_reg::CONFIG, BMP280_CONFIG_VALUE)
            .map_err(|e| Self::fault("config", e))?;
        self.bus
            .write_byte(&client, bmp280_reg::CTRL_MEAS, BMP280_CTRL_MEAS_VALUE)
            .map_err(|e| Self::fault("ctrl_meas", e))?;

        log::info!("{}: sensor ready at {:#04x}", BMP280_MODULE, cfg.address);
        *self.session.lock() = Some(Session {
            client,
            calibration,
            resources,
        });
        Ok(())
    }

    fn release_resources(&self) {
        let session = self.session.lock().take();
        if let Some(mut session) = session {
            session.resources.unwind();
            log::info!("{}: device cleaned up", BMP280_MODULE);
        }
    }
}
