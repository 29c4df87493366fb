use super::*;
use crate::{MAX_LOG_MESSAGE_LENGTH, format_log_entry};

#[test]
fn test_message_truncation() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Warning);

    let long_msg = "a".repeat(MAX_LOG_MESSAGE_LENGTH + 44);
    test_log!(log, LogLevel::Info, "{}", long_msg);

    let entry = log._read_log().unwrap();
    assert_eq!(entry.message().len(), MAX_LOG_MESSAGE_LENGTH);
}

#[test]
fn test_truncation_keeps_utf8() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Warning);

    // 3-byte characters never line up with the limit, the cut must land on a boundary.
    let long_msg = "温".repeat(MAX_LOG_MESSAGE_LENGTH);
    test_log!(log, LogLevel::Info, "{}", long_msg);

    let entry = log._read_log().unwrap();
    assert!(entry.message().len() <= MAX_LOG_MESSAGE_LENGTH);
    assert!(entry.message().chars().all(|c| c == '温'));
}

#[test]
fn test_format_log_entry() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Warning);
    test_log!(log, LogLevel::Error, "boom");

    let entry = log._read_log().unwrap();
    let line = format_log_entry(&entry);
    assert!(line.contains("[ERR]"));
    assert!(line.ends_with("boom\x1b[0m"));
}

#[test]
fn test_unread_bytes_matches_formatting() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Warning);
    test_log!(log, LogLevel::Info, "abc");

    let expected = format_log_entry(&log._peek_log(0).unwrap()).len();
    assert_eq!(log._log_unread_bytes(), expected);
}
