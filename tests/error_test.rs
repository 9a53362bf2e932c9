use std::io;

use mimir::{MimirError, Result};

#[test]
fn test_error_display() {
    let err = MimirError::Configuration("empty namespace".to_string());
    assert!(err.to_string().contains("empty namespace"));
    assert!(err.to_string().starts_with("configuration error"));
}

#[test]
fn test_store_error_display() {
    let err = MimirError::Store("disk full".to_string());
    assert_eq!(err.to_string(), "store error: disk full");
}

#[test]
fn test_decode_error_display() {
    let err = MimirError::Decode("unsupported entry version 2".to_string());
    assert_eq!(err.to_string(), "decode error: unsupported entry version 2");
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(MimirError::Store("x".into()))
    }
    assert!(returns_error().is_err());
}

#[test]
fn test_from_io_error() {
    fn read() -> Result<()> {
        let io_result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        io_result?;
        Ok(())
    }
    assert!(matches!(read(), Err(MimirError::Io(_))));
}

#[test]
fn test_from_json_error() {
    fn parse() -> Result<serde_json::Value> {
        Ok(serde_json::from_str("{not json")?)
    }
    assert!(matches!(parse(), Err(MimirError::Json(_))));
}

// ============================================================================
// Transient error classification
// ============================================================================

#[test]
fn transient_errors() {
    for kind in [
        io::ErrorKind::Interrupted,
        io::ErrorKind::TimedOut,
        io::ErrorKind::WouldBlock,
    ] {
        assert!(MimirError::Io(io::Error::new(kind, "x")).is_transient());
    }
}

#[test]
fn permanent_errors() {
    assert!(!MimirError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "x")).is_transient());
    assert!(!MimirError::Io(io::Error::new(io::ErrorKind::NotFound, "x")).is_transient());
    assert!(!MimirError::Store("x".into()).is_transient());
    assert!(!MimirError::Configuration("x".into()).is_transient());
    assert!(!MimirError::Decode("x".into()).is_transient());
    let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(!MimirError::Json(json).is_transient());
}
