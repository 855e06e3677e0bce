//! GPIO / peripheral pin assignments for the SmartSync main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Relays (active HIGH through NPN drivers)
// ---------------------------------------------------------------------------

/// Relay channel for bulb 1.
pub const RELAY_BULB1_GPIO: i32 = 16;
/// Relay channel for bulb 2.
pub const RELAY_BULB2_GPIO: i32 = 17;
/// Relay channel for the fan mains supply.
pub const RELAY_FAN_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// PWM outputs (LEDC)
// ---------------------------------------------------------------------------

/// Fan speed PWM output.
pub const FAN_PWM_GPIO: i32 = 19;
/// LEDC channel for the fan (25 kHz — above audible range).
pub const FAN_PWM_CHANNEL: u32 = 0;
pub const FAN_PWM_FREQ_HZ: u32 = 25_000;

/// LED strip brightness PWM output.
pub const LED_PWM_GPIO: i32 = 14;
/// LEDC channel for the LED strip.
pub const LED_PWM_CHANNEL: u32 = 1;
pub const LED_PWM_FREQ_HZ: u32 = 5_000;

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// DHT22 temperature/humidity sensor — single-wire data pin.
pub const DHT_GPIO: i32 = 27;

/// PIR motion sensor — digital input.
pub const PIR_GPIO: i32 = 25;

/// HC-SR04 ultrasonic ranger.
pub const ULTRASONIC_TRIG_GPIO: i32 = 32;
pub const ULTRASONIC_ECHO_GPIO: i32 = 33;

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

/// On-board status LED (BLE connection indicator).
pub const STATUS_LED_GPIO: i32 = 2;
