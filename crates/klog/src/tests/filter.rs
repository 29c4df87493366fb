use super::*;

#[test]
fn test_global_level_filtering() {
    let log = LogCore::new(LogLevel::Warning, LogLevel::Warning);

    test_log!(log, LogLevel::Emergency, "emergency");
    test_log!(log, LogLevel::Error, "error");
    test_log!(log, LogLevel::Warning, "warning");
    test_log!(log, LogLevel::Info, "info");
    test_log!(log, LogLevel::Debug, "debug");

    assert_eq!(log._log_len(), 3);
    assert_eq!(log._read_log().unwrap().message(), "emergency");
    assert_eq!(log._read_log().unwrap().message(), "error");
    assert_eq!(log._read_log().unwrap().message(), "warning");
}

#[test]
fn test_dynamic_level_change() {
    let log = LogCore::new(LogLevel::Info, LogLevel::Warning);

    test_log!(log, LogLevel::Debug, "debug1");
    assert_eq!(log._log_len(), 0);

    log._set_global_level(LogLevel::Debug);
    assert_eq!(log._get_global_level(), LogLevel::Debug);
    test_log!(log, LogLevel::Debug, "debug2");

    assert_eq!(log._log_len(), 1);
    assert_eq!(log._read_log().unwrap().message(), "debug2");
}

#[test]
fn test_console_level_roundtrip() {
    let log = LogCore::new(LogLevel::Info, LogLevel::Warning);
    log._set_console_level(LogLevel::Error);
    assert_eq!(log._get_console_level(), LogLevel::Error);
}

#[test]
fn test_log_crate_level_mapping() {
    assert_eq!(LogLevel::from(log::Level::Error), LogLevel::Error);
    assert_eq!(LogLevel::from(log::Level::Warn), LogLevel::Warning);
    assert_eq!(LogLevel::from(log::Level::Info), LogLevel::Info);
    assert_eq!(LogLevel::from(log::Level::Trace), LogLevel::Debug);
}
