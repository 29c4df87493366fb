//! 字符设备层错误类型
//!
//! - [`FsError`]：文件操作（read/write/lseek/open）的错误，可通过 [`FsError::to_errno()`]
//!   转换为系统调用错误码。
//! - [`ServiceError`]：内核服务（设备号、命名空间、绑定、GPIO、I2C）返回的失败原因。
//! - [`InitError`]：模块初始化失败时返回给加载者的错误，对应初始化序列中的某一步。

use core::fmt;

use uapi::errno::{
    EACCES, EBUSY, EEXIST, EFAULT, EINVAL, EIO, ENODEV, ENOENT, ENOMEM, ENOSPC, EOPNOTSUPP,
};

/// 文件操作错误类型
///
/// 各错误码对应标准 POSIX errno 值。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    // 参数相关
    /// 无效参数 (-EINVAL)
    InvalidArgument,
    /// 用户缓冲区不可访问 (-EFAULT)
    BadAddress,

    // 权限相关
    /// 打开模式不允许该操作 (-EACCES)
    PermissionDenied,

    // 设备相关
    /// 设备空间不足 (-ENOSPC)
    NoSpace,
    /// 设备不存在或尚未就绪 (-ENODEV)
    NoDevice,
    /// I/O 错误 (-EIO)
    IoError,

    // 其他
    /// 操作不支持 (-EOPNOTSUPP)
    NotSupported,
}

impl FsError {
    /// 转换为系统调用错误码（负数）
    pub fn to_errno(&self) -> isize {
        let errno = match self {
            FsError::InvalidArgument => EINVAL,
            FsError::BadAddress => EFAULT,
            FsError::PermissionDenied => EACCES,
            FsError::NoSpace => ENOSPC,
            FsError::NoDevice => ENODEV,
            FsError::IoError => EIO,
            FsError::NotSupported => EOPNOTSUPP,
        };
        -(errno as isize)
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FsError::InvalidArgument => "invalid argument",
            FsError::BadAddress => "bad address",
            FsError::PermissionDenied => "permission denied",
            FsError::NoSpace => "no space left on device",
            FsError::NoDevice => "no such device",
            FsError::IoError => "input/output error",
            FsError::NotSupported => "operation not supported",
        };
        f.write_str(msg)
    }
}

/// 内核服务调用失败的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    /// 可分配的资源已耗尽（例如动态主设备号）
    Exhausted,
    /// 资源已被占用
    Busy,
    /// 目标不存在
    NotFound,
    /// 同名对象已存在
    AlreadyExists,
    /// 硬件不存在或不可用
    NoDevice,
    /// 总线传输失败
    Io,
    /// 参数不合法
    InvalidArgument,
}

impl ServiceError {
    /// 转换为系统调用错误码（负数）
    pub fn to_errno(&self) -> isize {
        let errno = match self {
            ServiceError::Exhausted | ServiceError::Busy => EBUSY,
            ServiceError::NotFound => ENOENT,
            ServiceError::AlreadyExists => EEXIST,
            ServiceError::NoDevice => ENODEV,
            ServiceError::Io => EIO,
            ServiceError::InvalidArgument => EINVAL,
        };
        -(errno as isize)
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ServiceError::Exhausted => "resource exhausted",
            ServiceError::Busy => "resource busy",
            ServiceError::NotFound => "not found",
            ServiceError::AlreadyExists => "already exists",
            ServiceError::NoDevice => "no such device",
            ServiceError::Io => "bus transfer failed",
            ServiceError::InvalidArgument => "invalid argument",
        };
        f.write_str(msg)
    }
}

impl From<ServiceError> for FsError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Io => FsError::IoError,
            ServiceError::InvalidArgument => FsError::InvalidArgument,
            ServiceError::Exhausted => FsError::NoSpace,
            ServiceError::Busy
            | ServiceError::NotFound
            | ServiceError::AlreadyExists
            | ServiceError::NoDevice => FsError::NoDevice,
        }
    }
}

/// 后端在获取硬件资源时失败的具体子步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendFault {
    /// 失败的子步骤名称（例如 `"gpio request"`）
    pub step: &'static str,
    /// 服务返回的失败原因
    pub cause: ServiceError,
}

impl BackendFault {
    /// 创建新的后端故障描述
    pub const fn new(step: &'static str, cause: ServiceError) -> Self {
        Self { step, cause }
    }
}

impl fmt::Display for BackendFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.step, self.cause)
    }
}

/// 模块初始化错误
///
/// 每个变体对应初始化序列中失败的那一步；失败前已获取的资源均已逆序释放。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// 无法分配设备号
    IdentityExhausted,
    /// 无法创建设备类
    NamespaceUnavailable,
    /// 无法发布设备节点
    PublishFailed,
    /// 无法将设备号绑定到操作表
    BindFailed,
    /// 后端获取硬件资源失败
    BackendUnavailable(BackendFault),
}

impl InitError {
    /// 转换为模块加载返回的错误码（负数）
    pub fn to_errno(&self) -> isize {
        match self {
            InitError::IdentityExhausted | InitError::BindFailed => -(EBUSY as isize),
            InitError::NamespaceUnavailable => -(ENOMEM as isize),
            InitError::PublishFailed => -(ENODEV as isize),
            InitError::BackendUnavailable(fault) => fault.cause.to_errno(),
        }
    }
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::IdentityExhausted => f.write_str("cannot allocate device number"),
            InitError::NamespaceUnavailable => f.write_str("cannot create device class"),
            InitError::PublishFailed => f.write_str("cannot create device node"),
            InitError::BindFailed => f.write_str("cannot add character device"),
            InitError::BackendUnavailable(fault) => write!(f, "backend unavailable: {}", fault),
        }
    }
}
