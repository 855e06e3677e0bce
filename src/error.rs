//! Unified error types for the SmartSync firmware.
//!
//! Follows embedded best practice: a single `Error` enum that every subsystem
//! can convert into, keeping the top-level control loop's error handling
//! uniform. All variants are `Copy` so they can be cheaply passed around
//! without allocation.
//!
//! None of these are fatal to the control loop: a bad command is logged and
//! dropped, and the loop keeps servicing actuators.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Command referenced an appliance id outside `0..APPLIANCE_COUNT`.
    InvalidAppliance(u8),
    /// Inbound payload could not be decoded into a command.
    Parse(ParseError),
    /// Persistent storage operation failed.
    Storage(crate::app::ports::StorageError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAppliance(id) => write!(f, "invalid appliance id {id}"),
            Self::Parse(e) => write!(f, "parse: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Why an inbound payload failed to decode.
///
/// A parse failure never mutates state and never propagates past the
/// dispatcher boundary — the command is logged and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Payload is not valid UTF-8.
    NotUtf8,
    /// JSON payload is malformed.
    BadJson,
    /// JSON object lacks the required `cmd` field.
    MissingCmd,
    /// `value` field is absent or has the wrong type for the command.
    BadValue,
    /// A numeric token could not be parsed.
    BadNumber,
    /// An `HH:MM` time token is malformed or out of range.
    BadTimeToken,
    /// More seed samples than the grammar accepts in one command.
    TooManySamples,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotUtf8 => write!(f, "payload is not UTF-8"),
            Self::BadJson => write!(f, "malformed JSON"),
            Self::MissingCmd => write!(f, "missing cmd field"),
            Self::BadValue => write!(f, "missing or mistyped value field"),
            Self::BadNumber => write!(f, "invalid number"),
            Self::BadTimeToken => write!(f, "invalid HH:MM token"),
            Self::TooManySamples => write!(f, "too many seed samples"),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<crate::app::ports::StorageError> for Error {
    fn from(e: crate::app::ports::StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
