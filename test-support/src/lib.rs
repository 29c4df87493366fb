//! 测试支持 crate
//!
//! 提供 Mock 实现，用于在宿主机上验证驱动而不需要真实硬件

pub mod mock;
