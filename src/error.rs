//! # Error Types
//!
//! Error handling for the message codec.
//!
//! Encoding and decoding each have their own error enum so callers can match
//! on exactly the failures a given direction can produce. [`ProtocolError`]
//! wraps both together with the failures of the surrounding API (field
//! assignment, configuration, JSON conversion).
//!
//! ## Error Categories
//! - **Encode Errors**: a stored value does not fit the field's declared type
//! - **Decode Errors**: truncated, malformed or type-mismatched input
//! - **Field Errors**: assignment to a field the message type does not declare
//! - **Configuration Errors**: unreadable or invalid configuration
//!
//! Unknown fields in decoded input are never an error; they are skipped.
//!
//! ## Example Usage
//! ```rust
//! use message_codec::error::{DecodeError, ProtocolError};
//! use message_codec::messages::Ping;
//! use tracing::{error, info};
//!
//! match message_codec::decode::<Ping>(&[0x0a, 0x05, b'h']) {
//!     Ok(ping) => info!(?ping, "Decoded ping"),
//!     Err(e) => error!(error = %e, "Decode failed"),
//! }
//!
//! let err: ProtocolError = DecodeError::UnexpectedEof { offset: 3 }.into();
//! assert!(matches!(err, ProtocolError::Decode(_)));
//! ```

use crate::core::wire::WireKind;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Configuration errors
    pub const ERR_CONFIG_OPEN: &str = "Failed to open config file";
    pub const ERR_CONFIG_READ: &str = "Failed to read config file";
    pub const ERR_CONFIG_PARSE: &str = "Failed to parse TOML";
    pub const ERR_CONFIG_WRITE: &str = "Failed to write config file";

    /// Conversion errors
    pub const ERR_EXPECTED_OBJECT: &str = "Expected a JSON object";
    pub const ERR_EXPECTED_ARRAY: &str = "Expected a JSON array";
    pub const ERR_INVALID_HEX: &str = "Invalid hex string";

    /// Logging errors
    pub const ERR_LOGGING_INIT: &str = "Failed to install tracing subscriber";
}

/// Failures while serializing a message instance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Field '{field}' expects {expected}, got {actual}")]
    TypeMismatch {
        field: &'static str,
        expected: String,
        actual: &'static str,
    },

    #[error("Field '{field}' is {expected} but holds a {actual} value")]
    CardinalityMismatch {
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Value {value} out of range for field '{field}' ({kind})")]
    ValueOutOfRange {
        field: &'static str,
        kind: &'static str,
        value: i128,
    },

    #[error("Field '{field}' expects message {expected}, got {actual}")]
    MessageMismatch {
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Value {value} is not a member of enum {enum_name} (field '{field}')")]
    InvalidEnumValue {
        field: &'static str,
        enum_name: &'static str,
        value: i32,
    },

    #[error("Field number {number} is not declared by message {message}")]
    UndeclaredField { message: &'static str, number: u32 },

    #[error("Message nesting exceeds maximum depth of {max_depth}")]
    RecursionLimit { max_depth: usize },

    #[error("Encoded message too large: {size} bytes (maximum {max})")]
    MessageTooLarge { size: usize, max: usize },
}

/// Failures while parsing a byte sequence into a message instance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    #[error("Length prefix {length} at offset {offset} exceeds remaining {remaining} bytes")]
    LengthOutOfBounds {
        offset: usize,
        length: u64,
        remaining: usize,
    },

    #[error("Varint at offset {offset} is longer than 10 bytes")]
    VarintOverflow { offset: usize },

    #[error("Invalid field number {number} at offset {offset}")]
    InvalidFieldNumber { number: u64, offset: usize },

    #[error("Unsupported wire kind {kind} at offset {offset}")]
    UnsupportedWireKind { kind: u8, offset: usize },

    #[error("Field '{field}' expects wire kind {expected:?}, got {actual:?}")]
    WireKindMismatch {
        field: &'static str,
        expected: WireKind,
        actual: WireKind,
    },

    #[error("Value {value} out of range for field '{field}' ({kind})")]
    ValueOutOfRange {
        field: &'static str,
        kind: &'static str,
        value: i128,
    },

    #[error("Field '{field}' contains invalid UTF-8")]
    InvalidUtf8 { field: &'static str },

    #[error("Value {value} is not a member of enum {enum_name} (field '{field}')")]
    InvalidEnumValue {
        field: &'static str,
        enum_name: &'static str,
        value: i32,
    },

    #[error("Message nesting exceeds maximum depth of {max_depth}")]
    RecursionLimit { max_depth: usize },

    #[error("Input too large: {size} bytes (maximum {max})")]
    MessageTooLarge { size: usize, max: usize },

    #[error("Cannot convert field '{field}': expected {expected}, got {actual}")]
    ConversionMismatch {
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
}

/// ProtocolError is the crate-level error type wrapping every failure.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Message {message} has no field named '{field}'")]
    UnknownField {
        message: &'static str,
        field: String,
    },

    #[error("Field '{field}' of {message} is not repeated")]
    NotRepeated {
        message: &'static str,
        field: &'static str,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
