//! Wire protocol — two decode front-ends over one [`Command`] type.
//!
//! Earlier firmware revisions shipped two divergent grammars on two BLE
//! characteristic schemes: a colon-delimited text protocol and a compact
//! JSON protocol. Both survive on the wire for app compatibility, unified
//! here behind a single internal [`Command`] representation.
//!
//! | Front-end | Payload shape        | Module   |
//! |-----------|----------------------|----------|
//! | text      | `FAN:PWM:128`        | [`text`] |
//! | JSON      | `{"cmd":"SET_FAN"..}`| [`json`]  |
//!
//! Parsing never panics and never mutates state; failures come back as
//! [`ParseError`] and the caller logs and drops the payload.

pub mod json;
pub mod text;

use crate::app::commands::Command;
use crate::error::ParseError;

/// Decode a raw inbound payload using the matching front-end.
///
/// A payload whose first non-whitespace byte is `{` is treated as JSON;
/// everything else goes through the text grammar.
pub fn decode(payload: &[u8]) -> Result<Command, ParseError> {
    let line = core::str::from_utf8(payload).map_err(|_| ParseError::NotUtf8)?;
    let trimmed = line.trim();
    if trimmed.starts_with('{') {
        json::parse(trimmed)
    } else {
        text::parse(trimmed)
    }
}
