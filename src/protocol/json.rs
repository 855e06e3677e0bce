//! Compact JSON grammar.
//!
//! Object with a required string field `cmd` and an optional `value`:
//!
//! ```text
//! {"cmd":"SET_FAN","value":128}     integer 0..=255 (clamped)
//! {"cmd":"SET_LED","value":64}      integer 0..=255 (clamped)
//! {"cmd":"SET_AUTO","value":true}   boolean
//! {"cmd":"GET_STATUS"}
//! ```
//!
//! Unknown `cmd` values decode to [`Command::Unrecognized`]; malformed
//! JSON, a missing `cmd`, or a missing/mistyped `value` are
//! [`ParseError`]s.

use serde::Deserialize;

use crate::app::commands::Command;
use crate::error::ParseError;

/// Raw deserialization target; interpretation happens in [`parse`].
#[derive(Debug, Deserialize)]
struct JsonCommand<'a> {
    #[serde(borrow)]
    cmd: Option<&'a str>,
    value: Option<serde_json::Value>,
}

/// Parse one JSON command payload.
pub fn parse(payload: &str) -> Result<Command, ParseError> {
    let raw: JsonCommand<'_> =
        serde_json::from_str(payload).map_err(|_| ParseError::BadJson)?;
    let cmd = raw.cmd.ok_or(ParseError::MissingCmd)?;

    match cmd {
        "SET_FAN" => Ok(Command::SetFanPwm {
            value: integer_value(raw.value.as_ref())?,
        }),
        "SET_LED" => Ok(Command::SetLedBrightness {
            value: integer_value(raw.value.as_ref())?,
        }),
        "SET_AUTO" => match raw.value.as_ref().and_then(serde_json::Value::as_bool) {
            Some(enabled) => Ok(Command::SetAutoMode { enabled }),
            None => Err(ParseError::BadValue),
        },
        "GET_STATUS" => Ok(Command::StatusRequest),
        _ => Ok(Command::Unrecognized),
    }
}

/// Extract an integer `value` and clamp it into `0..=255`.
fn integer_value(value: Option<&serde_json::Value>) -> Result<u8, ParseError> {
    let n = value
        .and_then(serde_json::Value::as_i64)
        .ok_or(ParseError::BadValue)?;
    Ok(n.clamp(0, 255) as u8)
}
