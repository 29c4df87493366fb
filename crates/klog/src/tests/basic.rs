use super::*;

#[test]
fn test_write_and_read() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Warning);

    test_log!(log, LogLevel::Info, "test message");

    assert_eq!(log._log_len(), 1);

    let entry = log._read_log().unwrap();
    assert_eq!(entry.message(), "test message");
    assert_eq!(entry.level(), LogLevel::Info);

    assert_eq!(log._log_len(), 0);
}

#[test]
fn test_format_arguments() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Warning);

    test_log!(log, LogLevel::Info, "major:minor = {}:{}", 240, 0);
    test_log!(log, LogLevel::Debug, "reg: {:#x}", 0xD0);

    assert_eq!(log._read_log().unwrap().message(), "major:minor = 240:0");
    assert_eq!(log._read_log().unwrap().message(), "reg: 0xd0");
}

#[test]
fn test_fifo_order() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Warning);

    for i in 0..5 {
        test_log!(log, LogLevel::Debug, "message {}", i);
    }

    assert_eq!(log._log_len(), 5);

    for i in 0..5 {
        let entry = log._read_log().unwrap();
        let expected = alloc::format!("message {}", i);
        assert_eq!(entry.message(), expected.as_str());
    }

    assert!(log._read_log().is_none());
}

#[test]
fn test_peek_does_not_consume() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Warning);

    test_log!(log, LogLevel::Info, "first");
    test_log!(log, LogLevel::Info, "second");

    assert_eq!(log._peek_log(1).unwrap().message(), "second");
    assert_eq!(log._peek_log(0).unwrap().message(), "first");
    assert!(log._peek_log(2).is_none());
    assert_eq!(log._log_len(), 2);
}
