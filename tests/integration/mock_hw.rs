//! Mock adapters for integration tests.
//!
//! Records every actuator call and outbound notification so tests can
//! assert on the full command history without touching real GPIO/PWM
//! registers or a BLE stack.

use std::cell::Cell;

use smartsync::app::commands::Relay;
use smartsync::app::ports::{ActuatorPort, ClockPort, NotificationPort, SensorPort};
use smartsync::sensors::SensorSnapshot;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    SetRelay { relay: Relay, on: bool },
    SetFanPwm { value: u8 },
    SetLedBrightness { value: u8 },
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    pub snapshot: SensorSnapshot,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            snapshot: SensorSnapshot::default(),
        }
    }

    pub fn last_call(&self) -> Option<&ActuatorCall> {
        self.calls.last()
    }

    /// Most recently commanded state for one relay.
    pub fn relay_on(&self, which: Relay) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::SetRelay { relay, on } if *relay == which => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Most recently commanded fan PWM duty.
    pub fn fan_pwm(&self) -> Option<u8> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::SetFanPwm { value } => Some(*value),
            _ => None,
        })
    }

    /// Most recently commanded LED brightness.
    pub fn led_brightness(&self) -> Option<u8> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::SetLedBrightness { value } => Some(*value),
            _ => None,
        })
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorPort for MockHardware {
    fn set_relay(&mut self, relay: Relay, on: bool) {
        self.calls.push(ActuatorCall::SetRelay { relay, on });
    }

    fn set_fan_pwm(&mut self, value: u8) {
        self.calls.push(ActuatorCall::SetFanPwm { value });
    }

    fn set_led_brightness(&mut self, value: u8) {
        self.calls.push(ActuatorCall::SetLedBrightness { value });
    }
}

impl SensorPort for MockHardware {
    fn read(&mut self) -> SensorSnapshot {
        self.snapshot
    }
}

// ── FixedClock ────────────────────────────────────────────────

/// Clock whose readings tests set explicitly.
pub struct FixedClock {
    minute: Cell<u16>,
    uptime: Cell<u64>,
}

#[allow(dead_code)]
impl FixedClock {
    pub fn at_minute(minute: u16) -> Self {
        Self {
            minute: Cell::new(minute),
            uptime: Cell::new(0),
        }
    }

    pub fn set_minute(&self, minute: u16) {
        self.minute.set(minute);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.uptime.set(self.uptime.get() + ms);
    }
}

impl ClockPort for FixedClock {
    fn minute_of_day(&self) -> u16 {
        self.minute.get()
    }

    fn uptime_ms(&self) -> u64 {
        self.uptime.get()
    }
}

// ── RecordingNotifier ─────────────────────────────────────────

/// Captures every outbound notification for assertions.
pub struct RecordingNotifier {
    pub sent: Vec<String>,
}

#[allow(dead_code)]
impl RecordingNotifier {
    pub fn new() -> Self {
        Self { sent: Vec::new() }
    }

    pub fn last(&self) -> Option<&str> {
        self.sent.last().map(String::as_str)
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationPort for RecordingNotifier {
    fn notify(&mut self, text: &str) {
        self.sent.push(text.to_string());
    }
}
