//! Mock 实现模块
//!
//! 提供架构操作、GPIO 控制器和 I2C 总线的 Mock 实现，用于测试

pub mod arch;
pub mod gpio;
pub mod i2c;

/// Mock 注入的失败原因
///
/// 被测 crate 负责把它转换为自己的错误类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFault {
    /// 资源已被占用
    Busy,
    /// 对象不存在（未申请的引脚、未注册的 client 等）
    Missing,
    /// 通过 `fail_*` 注入的失败
    Injected,
}
