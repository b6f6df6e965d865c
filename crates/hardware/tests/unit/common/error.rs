//! # Error Tests
//!
//! Checks the conversions into `AccessError` and the rendered messages.

use mesi_core::common::{
    AccessError, AddressError, ConfigError, CoreId, LineIndex, ProtocolViolation, ValueError,
};

#[test]
fn address_error_converts_into_access_error() {
    let err: AccessError = AddressError::Misaligned {
        offset: 3,
        word_size: 8,
    }
    .into();
    assert!(matches!(err, AccessError::Address(_)));
    assert_eq!(
        err.to_string(),
        "misaligned access at offset 0x3: offsets must be a multiple of 8"
    );
}

#[test]
fn value_error_converts_into_access_error() {
    let err: AccessError = ValueError {
        value: 256,
        word_size: 8,
    }
    .into();
    assert_eq!(err.to_string(), "value 256 does not fit in a 8-bit word");
}

#[test]
fn protocol_violation_names_line_and_core() {
    let err: AccessError = ProtocolViolation::MissingLine {
        line: LineIndex(5),
        core: CoreId(1),
    }
    .into();
    assert_eq!(
        err.to_string(),
        "protocol violation: L1-1 has no entry for line 0x5"
    );
}

#[test]
fn unknown_core_reports_system_size() {
    let err = AccessError::UnknownCore { core: 4, cores: 2 };
    assert_eq!(err.to_string(), "no L1 cache for core 4 (system has 2 cores)");
}

#[test]
fn config_error_wraps_value_error() {
    let err: ConfigError = ValueError {
        value: 300,
        word_size: 8,
    }
    .into();
    assert_eq!(
        err.to_string(),
        "default value: value 300 does not fit in a 8-bit word"
    );
}
