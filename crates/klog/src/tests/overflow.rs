use super::*;
use crate::GLOBAL_LOG_BUFFER_SIZE;

#[test]
fn test_overflow_drops_oldest() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Emergency);

    for i in 0..GLOBAL_LOG_BUFFER_SIZE + 3 {
        test_log!(log, LogLevel::Info, "entry {}", i);
    }

    assert_eq!(log._log_len(), GLOBAL_LOG_BUFFER_SIZE);
    assert_eq!(log._log_dropped_count(), 3);
    assert_eq!(log._read_log().unwrap().message(), "entry 3");
}

#[test]
fn test_no_drop_below_capacity() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Emergency);

    for i in 0..GLOBAL_LOG_BUFFER_SIZE {
        test_log!(log, LogLevel::Info, "entry {}", i);
    }

    assert_eq!(log._log_dropped_count(), 0);
}
