//! 驱动配置
//!
//! 编译期常量给出每个设备的默认值；`*Config` 结构体允许在创建模块时覆盖。

use alloc::string::{String, ToString};
use cdev::DeviceDesc;

/// 内存缓冲区设备的模块名（日志前缀）
pub const MEMBUF_MODULE: &str = "SINGLE_CHAR_DEVICE";
/// 内存缓冲区容量（字节）
pub const MEMBUF_CAPACITY: usize = 512;
/// 内存缓冲区设备号区域名
pub const MEMBUF_REGION: &str = "chardevice";
/// 内存缓冲区设备类名
pub const MEMBUF_CLASS: &str = "chardevclass";
/// 内存缓冲区节点名
pub const MEMBUF_NODE: &str = "simple_char";

/// GPIO 设备的模块名（日志前缀）
pub const GPIO_LED_MODULE: &str = "SINGLE_CHAR_IO_DEVICE";
/// 输出引脚编号
pub const GPIO_LED_PIN: u32 = 4;
/// 申请引脚时使用的标签
pub const GPIO_LED_LABEL: &str = "rpi-gpio-4";
/// GPIO 设备号区域名
pub const GPIO_LED_REGION: &str = "iodevice";
/// GPIO 设备类名
pub const GPIO_LED_CLASS: &str = "iodevclass";
/// GPIO 节点名
pub const GPIO_LED_NODE: &str = "pio";

/// 传感器设备的模块名（日志前缀）
pub const BMP280_MODULE: &str = "SINGLE_CHAR_I2C_DEVICE";
/// 传感器所在的 I2C 总线
pub const BMP280_BUS: u32 = 1;
/// 传感器的 I2C 从机地址
pub const BMP280_ADDRESS: u16 = 0x76;
/// client 与驱动描述符的名字
pub const BMP280_NAME: &str = "BMP280";
/// 传感器设备号区域名
pub const BMP280_REGION: &str = "pdevice";
/// 传感器设备类名
pub const BMP280_CLASS: &str = "pdevclass";
/// 传感器节点名
pub const BMP280_NODE: &str = "pdev";

/// BMP280 寄存器
pub mod bmp280_reg {
    /// 芯片 ID
    pub const CHIP_ID: u8 = 0xD0;
    /// 温度校准系数 dig_T1（无符号）
    pub const DIG_T1: u8 = 0x88;
    /// 温度校准系数 dig_T2（有符号）
    pub const DIG_T2: u8 = 0x8A;
    /// 温度校准系数 dig_T3（有符号）
    pub const DIG_T3: u8 = 0x8C;
    /// 测量控制
    pub const CTRL_MEAS: u8 = 0xF4;
    /// 采样间隔与滤波配置
    pub const CONFIG: u8 = 0xF5;
    /// 温度原始值 [19:12]
    pub const TEMP_MSB: u8 = 0xFA;
    /// 温度原始值 [11:4]
    pub const TEMP_LSB: u8 = 0xFB;
    /// 温度原始值 [3:0]（高 4 位）
    pub const TEMP_XLSB: u8 = 0xFC;
}

/// BMP280 的芯片 ID
pub const BMP280_CHIP_ID: u8 = 0x58;
/// config 寄存器：t_sb = 1000 ms
pub const BMP280_CONFIG_VALUE: u8 = 5 << 5;
/// ctrl_meas 寄存器：osrs_t = x16，osrs_p = x16，normal mode
pub const BMP280_CTRL_MEAS_VALUE: u8 = (5 << 5) | (5 << 2) | 3;
/// 每次 read 产生的结果宽度（i32）
pub const BMP280_SAMPLE_SIZE: usize = 4;

/// 内存缓冲区设备配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemBufConfig {
    /// 缓冲区容量
    pub capacity: usize,
    /// 设备号区域名
    pub region: String,
    /// 设备类名
    pub class: String,
    /// 节点名
    pub node: String,
}

impl Default for MemBufConfig {
    fn default() -> Self {
        Self {
            capacity: MEMBUF_CAPACITY,
            region: MEMBUF_REGION.to_string(),
            class: MEMBUF_CLASS.to_string(),
            node: MEMBUF_NODE.to_string(),
        }
    }
}

impl MemBufConfig {
    /// 生成设备描述
    pub fn desc(&self) -> DeviceDesc {
        DeviceDesc::new(MEMBUF_MODULE, &self.region, &self.class, &self.node)
    }
}

/// GPIO 设备配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpioLedConfig {
    /// 输出引脚编号
    pub pin: u32,
    /// 申请引脚时使用的标签
    pub label: String,
    /// 设备号区域名
    pub region: String,
    /// 设备类名
    pub class: String,
    /// 节点名
    pub node: String,
}

impl Default for GpioLedConfig {
    fn default() -> Self {
        Self {
            pin: GPIO_LED_PIN,
            label: GPIO_LED_LABEL.to_string(),
            region: GPIO_LED_REGION.to_string(),
            class: GPIO_LED_CLASS.to_string(),
            node: GPIO_LED_NODE.to_string(),
        }
    }
}

impl GpioLedConfig {
    /// 生成设备描述
    pub fn desc(&self) -> DeviceDesc {
        DeviceDesc::new(GPIO_LED_MODULE, &self.region, &self.class, &self.node)
    }
}

/// 传感器设备配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bmp280Config {
    /// I2C 总线号
    pub bus: u32,
    /// 从机地址
    pub address: u16,
    /// client 与驱动描述符的名字
    pub name: String,
    /// 设备号区域名
    pub region: String,
    /// 设备类名
    pub class: String,
    /// 节点名
    pub node: String,
}

impl Default for Bmp280Config {
    fn default() -> Self {
        Self {
            bus: BMP280_BUS,
            address: BMP280_ADDRESS,
            name: BMP280_NAME.to_string(),
            region: BMP280_REGION.to_string(),
            class: BMP280_CLASS.to_string(),
            node: BMP280_NODE.to_string(),
        }
    }
}

impl Bmp280Config {
    /// 生成设备描述
    pub fn desc(&self) -> DeviceDesc {
        DeviceDesc::new(BMP280_MODULE, &self.region, &self.class, &self.node)
    }
}
