//! 字符设备核心层的编译期配置

/// minor 号所占位数（与 Linux 内核内部 dev_t 编码一致）
pub const MINORBITS: u32 = 20;

/// minor 号掩码
pub const MINORMASK: u32 = (1 << MINORBITS) - 1;

/// 动态分配主设备号的区间（闭区间，先高后低）
///
/// 与 Linux 一致：先从 254 向下搜索到 234，再从 511 向下搜索到 384。
pub const DYNAMIC_MAJOR_RANGES: [(u32, u32); 2] = [(234, 254), (384, 511)];

/// 每个驱动申请的 minor 数量
pub const DEFAULT_MINOR_COUNT: u32 = 1;

/// 每个驱动申请的起始 minor 号
pub const DEFAULT_BASE_MINOR: u32 = 0;
