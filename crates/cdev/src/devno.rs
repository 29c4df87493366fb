//! 设备号编码与动态分配
//!
//! 设备号采用 Linux 内核内部的 dev_t 编码：高位为 major，低 [`MINORBITS`] 位为 minor。
//! [`ChrdevAllocator`] 模拟 `alloc_chrdev_region()`，从动态区间中挑选空闲主设备号。

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use sync::SpinLock;

use crate::ServiceError;
use crate::config::{
    DEFAULT_BASE_MINOR, DEFAULT_MINOR_COUNT, DYNAMIC_MAJOR_RANGES, MINORBITS, MINORMASK,
};

/// 由 major 和 minor 组合设备号
#[inline]
pub const fn makedev(major: u32, minor: u32) -> u64 {
    ((major as u64) << MINORBITS) | (minor & MINORMASK) as u64
}

/// 取设备号的 major 部分
#[inline]
pub const fn major(dev: u64) -> u32 {
    (dev >> MINORBITS) as u32
}

/// 取设备号的 minor 部分
#[inline]
pub const fn minor(dev: u64) -> u32 {
    (dev as u32) & MINORMASK
}

/// 一段已分配的设备号区间
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    devno: u64,
    count: u32,
    name: String,
}

impl DeviceIdentity {
    /// 创建设备号区间描述
    pub fn new(devno: u64, count: u32, name: &str) -> Self {
        Self {
            devno,
            count,
            name: name.to_string(),
        }
    }

    /// 起始设备号
    pub fn devno(&self) -> u64 {
        self.devno
    }

    /// 主设备号
    pub fn major(&self) -> u32 {
        major(self.devno)
    }

    /// 起始 minor 号
    pub fn minor(&self) -> u32 {
        minor(self.devno)
    }

    /// 区间内的 minor 数量
    pub fn count(&self) -> u32 {
        self.count
    }

    /// 注册时使用的区域名
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// 设备号分配服务
pub trait IdentityService: Send + Sync {
    /// 以 `name` 为区域名动态分配一个设备号区间
    fn allocate(&self, name: &str) -> Result<DeviceIdentity, ServiceError>;

    /// 归还设备号区间；未分配的区间被忽略
    fn release(&self, identity: &DeviceIdentity);
}

/// 动态主设备号分配器
pub struct ChrdevAllocator {
    /// major -> 区域名
    regions: SpinLock<BTreeMap<u32, String>>,
}

impl ChrdevAllocator {
    /// 创建空的分配器
    pub const fn new() -> Self {
        Self {
            regions: SpinLock::new(BTreeMap::new()),
        }
    }

    /// 当前已分配的区间数
    pub fn in_use(&self) -> usize {
        self.regions.lock().len()
    }

    /// 指定 major 是否已被占用
    pub fn is_allocated(&self, major: u32) -> bool {
        self.regions.lock().contains_key(&major)
    }

    /// 查询 major 对应的区域名
    pub fn region_name(&self, major: u32) -> Option<String> {
        self.regions.lock().get(&major).cloned()
    }
}

impl Default for ChrdevAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityService for ChrdevAllocator {
    fn allocate(&self, name: &str) -> Result<DeviceIdentity, ServiceError> {
        if name.is_empty() {
            return Err(ServiceError::InvalidArgument);
        }

        let mut regions = self.regions.lock();
        let free = DYNAMIC_MAJOR_RANGES
            .iter()
            .flat_map(|&(low, high)| (low..=high).rev())
            .find(|major| !regions.contains_key(major));

        match free {
            Some(major) => {
                regions.insert(major, name.to_string());
                Ok(DeviceIdentity::new(
                    makedev(major, DEFAULT_BASE_MINOR),
                    DEFAULT_MINOR_COUNT,
                    name,
                ))
            }
            None => {
                log::warn!("chrdev: no free dynamic major for {}", name);
                Err(ServiceError::Exhausted)
            }
        }
    }

    fn release(&self, identity: &DeviceIdentity) {
        let mut regions = self.regions.lock();
        match regions.get(&identity.major()) {
            Some(owner) if owner == identity.name() => {
                regions.remove(&identity.major());
            }
            _ => log::debug!(
                "chrdev: region {}:{} ({}) not allocated",
                identity.major(),
                identity.minor(),
                identity.name()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_starts_from_highest_major() {
        let alloc = ChrdevAllocator::new();
        let first = alloc.allocate("a").unwrap();
        let second = alloc.allocate("b").unwrap();
        assert_eq!(first.major(), 254);
        assert_eq!(second.major(), 253);
        assert_eq!(first.minor(), 0);
        assert_eq!(first.count(), 1);
        assert_eq!(alloc.in_use(), 2);
    }

    #[test]
    fn test_allocate_falls_back_to_extended_range() {
        let alloc = ChrdevAllocator::new();
        for _ in 234..=254 {
            alloc.allocate("low").unwrap();
        }
        let next = alloc.allocate("high").unwrap();
        assert_eq!(next.major(), 511);
    }

    #[test]
    fn test_allocate_exhausted() {
        let alloc = ChrdevAllocator::new();
        let total = (254 - 234 + 1) + (511 - 384 + 1);
        for _ in 0..total {
            alloc.allocate("dev").unwrap();
        }
        assert_eq!(alloc.allocate("dev"), Err(ServiceError::Exhausted));
        assert_eq!(alloc.in_use(), total);
    }

    #[test]
    fn test_allocate_empty_name() {
        let alloc = ChrdevAllocator::new();
        assert_eq!(alloc.allocate(""), Err(ServiceError::InvalidArgument));
        assert_eq!(alloc.in_use(), 0);
    }

    #[test]
    fn test_release_reuses_major() {
        let alloc = ChrdevAllocator::new();
        let id = alloc.allocate("pdevice").unwrap();
        assert_eq!(alloc.region_name(id.major()).as_deref(), Some("pdevice"));
        alloc.release(&id);
        assert!(!alloc.is_allocated(id.major()));
        assert_eq!(alloc.allocate("pdevice").unwrap().major(), id.major());
    }

    #[test]
    fn test_release_twice_is_noop() {
        let alloc = ChrdevAllocator::new();
        let id = alloc.allocate("iodevice").unwrap();
        let other = alloc.allocate("chardevice").unwrap();
        alloc.release(&id);
        alloc.release(&id);
        assert_eq!(alloc.in_use(), 1);
        assert!(alloc.is_allocated(other.major()));
    }

    #[test]
    fn test_release_foreign_region_ignored() {
        let alloc = ChrdevAllocator::new();
        let id = alloc.allocate("mine").unwrap();
        let forged = DeviceIdentity::new(id.devno(), 1, "theirs");
        alloc.release(&forged);
        assert!(alloc.is_allocated(id.major()));
    }
}
