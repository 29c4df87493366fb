//! GPIO 控制器的 Mock 实现
//!
//! 注意：这里不直接依赖 `device` crate（避免循环依赖）。
//! `device` crate 在 `cfg(test)` 下为这些类型实现其 trait（例如 `PinService`）。

use std::collections::BTreeMap;
use std::sync::Mutex;

use super::MockFault;

/// GPIO 上发生的操作，按时间顺序记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpioEvent {
    /// 申请引脚
    Claim(u32),
    /// 设置为输出，附带初始电平
    Output(u32, bool),
    /// 设置电平
    Set(u32, bool),
    /// 释放引脚
    Release(u32),
}

#[derive(Default)]
struct GpioState {
    /// pin -> label
    claimed: BTreeMap<u32, String>,
    /// pin -> 当前电平（只记录配置为输出的引脚）
    levels: BTreeMap<u32, bool>,
    events: Vec<GpioEvent>,
    fail_claim: bool,
    fail_direction: bool,
}

/// Mock 的 GPIO 控制器
#[derive(Default)]
pub struct MockGpio {
    state: Mutex<GpioState>,
}

impl MockGpio {
    pub fn new() -> Self {
        Self::default()
    }

    /// 之后的 claim 全部失败
    pub fn fail_claim(&self) {
        self.state.lock().unwrap().fail_claim = true;
    }

    /// 之后的方向设置全部失败
    pub fn fail_direction(&self) {
        self.state.lock().unwrap().fail_direction = true;
    }

    pub fn claim(&self, pin: u32, label: &str) -> Result<(), MockFault> {
        let mut st = self.state.lock().unwrap();
        if st.fail_claim {
            return Err(MockFault::Injected);
        }
        if st.claimed.contains_key(&pin) {
            return Err(MockFault::Busy);
        }
        st.claimed.insert(pin, label.to_string());
        st.events.push(GpioEvent::Claim(pin));
        Ok(())
    }

    pub fn set_direction_output(&self, pin: u32, level: bool) -> Result<(), MockFault> {
        let mut st = self.state.lock().unwrap();
        if st.fail_direction {
            return Err(MockFault::Injected);
        }
        if !st.claimed.contains_key(&pin) {
            return Err(MockFault::Missing);
        }
        st.levels.insert(pin, level);
        st.events.push(GpioEvent::Output(pin, level));
        Ok(())
    }

    pub fn set_level(&self, pin: u32, level: bool) {
        let mut st = self.state.lock().unwrap();
        if let Some(slot) = st.levels.get_mut(&pin) {
            *slot = level;
        }
        st.events.push(GpioEvent::Set(pin, level));
    }

    /// 读取引脚电平，未配置的引脚视为低电平
    pub fn level(&self, pin: u32) -> bool {
        self.state
            .lock()
            .unwrap()
            .levels
            .get(&pin)
            .copied()
            .unwrap_or(false)
    }

    pub fn release(&self, pin: u32) {
        let mut st = self.state.lock().unwrap();
        st.claimed.remove(&pin);
        st.events.push(GpioEvent::Release(pin));
    }

    pub fn is_claimed(&self, pin: u32) -> bool {
        self.state.lock().unwrap().claimed.contains_key(&pin)
    }

    pub fn label(&self, pin: u32) -> Option<String> {
        self.state.lock().unwrap().claimed.get(&pin).cloned()
    }

    pub fn claimed_count(&self) -> usize {
        self.state.lock().unwrap().claimed.len()
    }

    pub fn events(&self) -> Vec<GpioEvent> {
        self.state.lock().unwrap().events.clone()
    }
}
