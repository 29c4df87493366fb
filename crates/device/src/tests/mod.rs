//! device 集成测试
//!
//! 为 test-support 中的 Mock 实现本 crate 的服务接口，让后端在宿主机上运行。

extern crate alloc;

use alloc::sync::Arc;
use cdev::{HostKernel, ServiceError};
use test_support::mock::MockFault;
use test_support::mock::gpio::MockGpio;
use test_support::mock::i2c::MockI2cBus;

use crate::gpio::{PinHandle, PinService};
use crate::i2c::{AdapterHandle, BusService, ClientHandle, DriverHandle};

mod bmp280;

fn service_error(fault: MockFault) -> ServiceError {
    match fault {
        MockFault::Busy => ServiceError::Busy,
        MockFault::Missing => ServiceError::NoDevice,
        MockFault::Injected => ServiceError::Io,
    }
}

impl PinService for MockGpio {
    fn claim(&self, pin: u32, label: &str) -> Result<PinHandle, ServiceError> {
        MockGpio::claim(self, pin, label).map_err(service_error)?;
        Ok(PinHandle::new(pin))
    }

    fn set_direction_output(&self, pin: &PinHandle, level: bool) -> Result<(), ServiceError> {
        MockGpio::set_direction_output(self, pin.pin(), level).map_err(service_error)
    }

    fn set_level(&self, pin: &PinHandle, level: bool) {
        MockGpio::set_level(self, pin.pin(), level);
    }

    fn level(&self, pin: &PinHandle) -> bool {
        MockGpio::level(self, pin.pin())
    }

    fn release(&self, pin: &PinHandle) {
        MockGpio::release(self, pin.pin());
    }
}

impl BusService for MockI2cBus {
    fn get_adapter(&self, bus: u32) -> Result<AdapterHandle, ServiceError> {
        MockI2cBus::get_adapter(self, bus).map_err(service_error)?;
        Ok(AdapterHandle::new(bus))
    }

    fn put_adapter(&self, _adapter: &AdapterHandle) {
        MockI2cBus::put_adapter(self);
    }

    fn register_client(
        &self,
        adapter: &AdapterHandle,
        addr: u16,
        name: &str,
    ) -> Result<ClientHandle, ServiceError> {
        self.new_client(addr, name).map_err(service_error)?;
        Ok(ClientHandle::new(adapter.bus(), addr))
    }

    fn unregister_client(&self, client: &ClientHandle) {
        MockI2cBus::unregister_client(self, client.addr());
    }

    fn add_driver(&self, name: &str) -> Result<DriverHandle, ServiceError> {
        MockI2cBus::add_driver(self, name).map_err(service_error)?;
        Ok(DriverHandle::new(name))
    }

    fn del_driver(&self, driver: &DriverHandle) {
        MockI2cBus::del_driver(self, driver.name());
    }

    fn read_byte(&self, client: &ClientHandle, reg: u8) -> Result<u8, ServiceError> {
        MockI2cBus::read_byte(self, client.addr(), reg).map_err(service_error)
    }

    fn read_word(&self, client: &ClientHandle, reg: u8) -> Result<u16, ServiceError> {
        MockI2cBus::read_word(self, client.addr(), reg).map_err(service_error)
    }

    fn write_byte(&self, client: &ClientHandle, reg: u8, value: u8) -> Result<(), ServiceError> {
        MockI2cBus::write_byte(self, client.addr(), reg, value).map_err(service_error)
    }
}

fn gpio() -> Arc<MockGpio> {
    Arc::new(MockGpio::new())
}

/// 预置了芯片 ID、校准系数和一组原始温度值的总线
///
/// T1 = 28000, T2 = 26000, T3 = -1000，原始值 0x7F2C3，补偿结果为 2253。
fn calibrated_bus() -> Arc<MockI2cBus> {
    use crate::config::bmp280_reg::*;

    let bus = MockI2cBus::new(crate::config::BMP280_BUS);
    bus.set_register(CHIP_ID, 0x58);
    bus.set_word(DIG_T1, 28000);
    bus.set_word(DIG_T2, 26000);
    bus.set_word(DIG_T3, (-1000i16) as u16);
    bus.set_register(TEMP_MSB, 0x7F);
    bus.set_register(TEMP_LSB, 0x2C);
    bus.set_register(TEMP_XLSB, 0x30);
    Arc::new(bus)
}

fn host() -> HostKernel {
    HostKernel::new()
}
