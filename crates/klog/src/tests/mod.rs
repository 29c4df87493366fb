// Unit tests for klog.
//
// These target local `LogCore` instances so they can run in parallel without touching the global
// logger used by the macros.

extern crate alloc;

use crate::LogLevel;
use crate::log_core::LogCore;

/// Test-only logging helper (mirrors production macro behavior, but targets a local `LogCore`).
macro_rules! test_log {
    ($logger:expr, $level:expr, $($arg:tt)*) => {
        $logger._log($level, format_args!($($arg)*))
    };
}

mod basic;
mod filter;
mod format;
mod overflow;
