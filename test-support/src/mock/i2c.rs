//! I2C 总线的 Mock 实现
//!
//! 模拟一条带有 256 字节寄存器空间的总线，按 SMBus 语义读写。
//! `device` crate 在 `cfg(test)` 下为 [`MockI2cBus`] 实现 `BusService`。

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use super::MockFault;

/// 可注入失败的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum I2cFailPoint {
    /// 获取适配器
    Adapter,
    /// 注册 client
    Client,
    /// 注册驱动描述符
    Driver,
    /// 读取指定寄存器（字节或字）
    Read(u8),
    /// 写入指定寄存器
    Write(u8),
}

struct I2cState {
    registers: [u8; 256],
    adapters_held: usize,
    /// addr -> name
    clients: BTreeMap<u16, String>,
    drivers: BTreeSet<String>,
    writes: Vec<(u8, u8)>,
    reads: usize,
    fail: Option<I2cFailPoint>,
}

/// Mock 的 I2C 总线
pub struct MockI2cBus {
    bus: u32,
    state: Mutex<I2cState>,
}

impl MockI2cBus {
    /// 创建编号为 `bus` 的总线，寄存器全部为 0
    pub fn new(bus: u32) -> Self {
        Self {
            bus,
            state: Mutex::new(I2cState {
                registers: [0; 256],
                adapters_held: 0,
                clients: BTreeMap::new(),
                drivers: BTreeSet::new(),
                writes: Vec::new(),
                reads: 0,
                fail: None,
            }),
        }
    }

    pub fn bus(&self) -> u32 {
        self.bus
    }

    pub fn fail_at(&self, point: I2cFailPoint) {
        self.state.lock().unwrap().fail = Some(point);
    }

    pub fn set_register(&self, reg: u8, value: u8) {
        self.state.lock().unwrap().registers[reg as usize] = value;
    }

    /// 以小端序写入一个 16 位字（SMBus word 的字节序）
    pub fn set_word(&self, reg: u8, value: u16) {
        let mut st = self.state.lock().unwrap();
        let [lo, hi] = value.to_le_bytes();
        st.registers[reg as usize] = lo;
        st.registers[reg.wrapping_add(1) as usize] = hi;
    }

    pub fn get_adapter(&self, bus: u32) -> Result<(), MockFault> {
        let mut st = self.state.lock().unwrap();
        if st.fail == Some(I2cFailPoint::Adapter) {
            return Err(MockFault::Injected);
        }
        if bus != self.bus {
            return Err(MockFault::Missing);
        }
        st.adapters_held += 1;
        Ok(())
    }

    pub fn put_adapter(&self) {
        let mut st = self.state.lock().unwrap();
        st.adapters_held = st.adapters_held.saturating_sub(1);
    }

    pub fn new_client(&self, addr: u16, name: &str) -> Result<(), MockFault> {
        let mut st = self.state.lock().unwrap();
        if st.fail == Some(I2cFailPoint::Client) {
            return Err(MockFault::Injected);
        }
        if st.clients.contains_key(&addr) {
            return Err(MockFault::Busy);
        }
        st.clients.insert(addr, name.to_string());
        Ok(())
    }

    pub fn unregister_client(&self, addr: u16) {
        self.state.lock().unwrap().clients.remove(&addr);
    }

    pub fn add_driver(&self, name: &str) -> Result<(), MockFault> {
        let mut st = self.state.lock().unwrap();
        if st.fail == Some(I2cFailPoint::Driver) {
            return Err(MockFault::Injected);
        }
        if !st.drivers.insert(name.to_string()) {
            return Err(MockFault::Busy);
        }
        Ok(())
    }

    pub fn del_driver(&self, name: &str) {
        self.state.lock().unwrap().drivers.remove(name);
    }

    pub fn read_byte(&self, addr: u16, reg: u8) -> Result<u8, MockFault> {
        let mut st = self.state.lock().unwrap();
        Self::check_read(&st, addr, reg)?;
        st.reads += 1;
        Ok(st.registers[reg as usize])
    }

    pub fn read_word(&self, addr: u16, reg: u8) -> Result<u16, MockFault> {
        let mut st = self.state.lock().unwrap();
        Self::check_read(&st, addr, reg)?;
        st.reads += 1;
        let lo = st.registers[reg as usize];
        let hi = st.registers[reg.wrapping_add(1) as usize];
        Ok(u16::from_le_bytes([lo, hi]))
    }

    pub fn write_byte(&self, addr: u16, reg: u8, value: u8) -> Result<(), MockFault> {
        let mut st = self.state.lock().unwrap();
        if st.fail == Some(I2cFailPoint::Write(reg)) {
            return Err(MockFault::Injected);
        }
        if !st.clients.contains_key(&addr) {
            return Err(MockFault::Missing);
        }
        st.registers[reg as usize] = value;
        st.writes.push((reg, value));
        Ok(())
    }

    fn check_read(st: &I2cState, addr: u16, reg: u8) -> Result<(), MockFault> {
        if st.fail == Some(I2cFailPoint::Read(reg)) {
            return Err(MockFault::Injected);
        }
        if !st.clients.contains_key(&addr) {
            return Err(MockFault::Missing);
        }
        Ok(())
    }

    pub fn adapters_held(&self) -> usize {
        self.state.lock().unwrap().adapters_held
    }

    pub fn client_count(&self) -> usize {
        self.state.lock().unwrap().clients.len()
    }

    pub fn driver_count(&self) -> usize {
        self.state.lock().unwrap().drivers.len()
    }

    /// 成功完成的读事务数
    pub fn read_count(&self) -> usize {
        self.state.lock().unwrap().reads
    }

    /// 按顺序记录的 (寄存器, 值) 写事务
    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.state.lock().unwrap().writes.clone()
    }
}
