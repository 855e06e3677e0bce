//! Colon-delimited text grammar.
//!
//! Case-sensitive, one command per payload, surrounding whitespace
//! ignored:
//!
//! ```text
//! B1:ON            B1:OFF           B2:ON            B2:OFF
//! FAN:ON           FAN:OFF
//! FAN:PWM:<n>                         n clamped to 0..=255
//! SIMLOG:<appl>:<HH:MM>,<HH:MM>,...   batch learning bootstrap
//! SUGGEST:ACCEPT:<appl>
//! ```
//!
//! Anything syntactically sound but unknown decodes to
//! [`Command::Unrecognized`] — a no-op, not an error. Malformed numbers
//! and time tokens are [`ParseError`]s.

use heapless::Vec;

use crate::app::commands::{Command, Relay, MAX_SEED_SAMPLES};
use crate::error::ParseError;

/// Parse one trimmed line of the text grammar.
pub fn parse(line: &str) -> Result<Command, ParseError> {
    match line {
        "" => return Ok(Command::Unrecognized),
        "B1:ON" => {
            return Ok(Command::SetRelay {
                relay: Relay::Bulb1,
                on: true,
            })
        }
        "B1:OFF" => {
            return Ok(Command::SetRelay {
                relay: Relay::Bulb1,
                on: false,
            })
        }
        "B2:ON" => {
            return Ok(Command::SetRelay {
                relay: Relay::Bulb2,
                on: true,
            })
        }
        "B2:OFF" => {
            return Ok(Command::SetRelay {
                relay: Relay::Bulb2,
                on: false,
            })
        }
        // The dispatcher also records a manual toggle for the fan relay —
        // that side effect belongs to dispatch, not to the grammar.
        "FAN:ON" => {
            return Ok(Command::SetRelay {
                relay: Relay::Fan,
                on: true,
            })
        }
        "FAN:OFF" => {
            return Ok(Command::SetRelay {
                relay: Relay::Fan,
                on: false,
            })
        }
        _ => {}
    }

    if let Some(arg) = line.strip_prefix("FAN:PWM:") {
        let value = parse_clamped_u8(arg)?;
        return Ok(Command::SetFanPwm { value });
    }

    if let Some(rest) = line.strip_prefix("SIMLOG:") {
        return parse_simlog(rest);
    }

    if let Some(arg) = line.strip_prefix("SUGGEST:ACCEPT:") {
        let appliance = arg.parse::<u8>().map_err(|_| ParseError::BadNumber)?;
        return Ok(Command::AcceptSuggestion { appliance });
    }

    Ok(Command::Unrecognized)
}

/// Parse an integer and clamp it into `0..=255`.
///
/// Negative values clamp to 0 (matching the wire behaviour apps rely on);
/// a non-numeric token is a [`ParseError::BadNumber`].
fn parse_clamped_u8(token: &str) -> Result<u8, ParseError> {
    let n = token.parse::<i64>().map_err(|_| ParseError::BadNumber)?;
    Ok(n.clamp(0, 255) as u8)
}

/// `SIMLOG:<appl>:<HH:MM>,<HH:MM>,...` — all-or-nothing: any malformed
/// time token fails the whole command so no partial seeding occurs.
fn parse_simlog(rest: &str) -> Result<Command, ParseError> {
    let (appl_str, times) = rest.split_once(':').ok_or(ParseError::BadTimeToken)?;
    let appliance = appl_str.parse::<u8>().map_err(|_| ParseError::BadNumber)?;

    let mut minutes: Vec<u16, MAX_SEED_SAMPLES> = Vec::new();
    for token in times.split(',') {
        let minute = parse_minute(token.trim())?;
        minutes.push(minute).map_err(|_| ParseError::TooManySamples)?;
    }
    if minutes.is_empty() {
        return Err(ParseError::BadTimeToken);
    }

    Ok(Command::SeedLog { appliance, minutes })
}

/// Parse an `HH:MM` token into a minute-of-day, validating both fields.
fn parse_minute(token: &str) -> Result<u16, ParseError> {
    let (hh, mm) = token.split_once(':').ok_or(ParseError::BadTimeToken)?;
    let hh = hh.parse::<u16>().map_err(|_| ParseError::BadTimeToken)?;
    let mm = mm.parse::<u16>().map_err(|_| ParseError::BadTimeToken)?;
    if hh > 23 || mm > 59 {
        return Err(ParseError::BadTimeToken);
    }
    Ok(hh * 60 + mm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_commands() {
        assert_eq!(
            parse("B1:ON").unwrap(),
            Command::SetRelay {
                relay: Relay::Bulb1,
                on: true
            }
        );
        assert_eq!(
            parse("B2:OFF").unwrap(),
            Command::SetRelay {
                relay: Relay::Bulb2,
                on: false
            }
        );
        assert_eq!(
            parse("FAN:ON").unwrap(),
            Command::SetRelay {
                relay: Relay::Fan,
                on: true
            }
        );
    }

    #[test]
    fn grammar_is_case_sensitive() {
        assert_eq!(parse("b1:on").unwrap(), Command::Unrecognized);
        assert_eq!(parse("Fan:On").unwrap(), Command::Unrecognized);
    }

    #[test]
    fn fan_pwm_in_range() {
        assert_eq!(parse("FAN:PWM:128").unwrap(), Command::SetFanPwm { value: 128 });
        assert_eq!(parse("FAN:PWM:0").unwrap(), Command::SetFanPwm { value: 0 });
        assert_eq!(parse("FAN:PWM:255").unwrap(), Command::SetFanPwm { value: 255 });
    }

    #[test]
    fn fan_pwm_clamps_overrange() {
        assert_eq!(parse("FAN:PWM:999").unwrap(), Command::SetFanPwm { value: 255 });
    }

    // Pins the policy: negative values clamp to zero, garbage is an error.
    #[test]
    fn fan_pwm_negative_clamps_to_zero() {
        assert_eq!(parse("FAN:PWM:-5").unwrap(), Command::SetFanPwm { value: 0 });
    }

    #[test]
    fn fan_pwm_non_numeric_is_error() {
        assert_eq!(parse("FAN:PWM:fast"), Err(ParseError::BadNumber));
        assert_eq!(parse("FAN:PWM:"), Err(ParseError::BadNumber));
    }

    #[test]
    fn simlog_parses_minutes_in_order() {
        let cmd = parse("SIMLOG:0:19:05,19:06,19:04").unwrap();
        match cmd {
            Command::SeedLog { appliance, minutes } => {
                assert_eq!(appliance, 0);
                assert_eq!(minutes.as_slice(), &[1145, 1146, 1144]);
            }
            other => panic!("expected SeedLog, got {:?}", other),
        }
    }

    #[test]
    fn simlog_tolerates_spaces_after_commas() {
        let cmd = parse("SIMLOG:2:07:30, 07:45").unwrap();
        match cmd {
            Command::SeedLog { appliance, minutes } => {
                assert_eq!(appliance, 2);
                assert_eq!(minutes.as_slice(), &[450, 465]);
            }
            other => panic!("expected SeedLog, got {:?}", other),
        }
    }

    #[test]
    fn simlog_rejects_malformed_tokens() {
        assert_eq!(parse("SIMLOG:0:19:05,banana"), Err(ParseError::BadTimeToken));
        assert_eq!(parse("SIMLOG:0:25:00"), Err(ParseError::BadTimeToken));
        assert_eq!(parse("SIMLOG:0:12:75"), Err(ParseError::BadTimeToken));
        assert_eq!(parse("SIMLOG:0:"), Err(ParseError::BadTimeToken));
        assert_eq!(parse("SIMLOG:x:19:05"), Err(ParseError::BadNumber));
    }

    #[test]
    fn suggest_accept() {
        assert_eq!(
            parse("SUGGEST:ACCEPT:1").unwrap(),
            Command::AcceptSuggestion { appliance: 1 }
        );
        assert_eq!(parse("SUGGEST:ACCEPT:no"), Err(ParseError::BadNumber));
    }

    #[test]
    fn unknown_lines_are_unrecognized() {
        assert_eq!(parse("").unwrap(), Command::Unrecognized);
        assert_eq!(parse("HELLO").unwrap(), Command::Unrecognized);
        assert_eq!(parse("B3:ON").unwrap(), Command::Unrecognized);
        assert_eq!(parse("FAN").unwrap(), Command::Unrecognized);
    }
}
