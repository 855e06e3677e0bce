//! Integration tests for the payload → decode → dispatch → ports pipeline.
//!
//! These run on the host (x86_64) and verify that the full chain from an
//! incoming wire payload down to actuator calls, log records, and
//! outbound notifications works correctly without any real hardware.

use crate::mock_hw::{ActuatorCall, FixedClock, MockHardware, RecordingNotifier};

use smartsync::app::commands::Relay;
use smartsync::app::ports::ClockPort;
use smartsync::adapters::nvs::NvsAdapter;
use smartsync::app::service::AppService;
use smartsync::config::SystemConfig;
use smartsync::learner::ApplianceId;

fn make_app() -> (AppService, MockHardware, FixedClock, RecordingNotifier) {
    let app = AppService::new(SystemConfig::default());
    let hw = MockHardware::new();
    let clock = FixedClock::at_minute(1145); // 19:05
    let notifier = RecordingNotifier::new();
    (app, hw, clock, notifier)
}

// ── Relay commands ───────────────────────────────────────────

#[test]
fn fan_on_switches_relay_and_records_toggle() {
    let (mut app, mut hw, clock, mut notifier) = make_app();

    app.handle_payload(b"FAN:ON", &mut hw, &clock, &mut notifier);

    assert!(hw.relay_on(Relay::Fan));
    assert_eq!(app.log_snapshot(ApplianceId::FAN).as_slice(), &[1145]);
}

#[test]
fn fan_off_also_feeds_the_learner() {
    let (mut app, mut hw, clock, mut notifier) = make_app();

    app.handle_payload(b"FAN:OFF", &mut hw, &clock, &mut notifier);

    assert!(!hw.relay_on(Relay::Fan));
    assert_eq!(app.log_snapshot(ApplianceId::FAN).len(), 1);
}

#[test]
fn bulb_toggles_are_not_logged() {
    let (mut app, mut hw, clock, mut notifier) = make_app();

    app.handle_payload(b"B1:ON", &mut hw, &clock, &mut notifier);
    app.handle_payload(b"B2:OFF", &mut hw, &clock, &mut notifier);

    assert!(hw.relay_on(Relay::Bulb1));
    assert!(!hw.relay_on(Relay::Bulb2));
    assert!(app.log_snapshot(ApplianceId::FAN).is_empty());
}

// ── PWM commands (both grammars) ─────────────────────────────

#[test]
fn fan_pwm_payload_reaches_actuator_clamped() {
    let (mut app, mut hw, clock, mut notifier) = make_app();

    app.handle_payload(b"FAN:PWM:999", &mut hw, &clock, &mut notifier);

    assert_eq!(hw.fan_pwm(), Some(255));
    assert_eq!(app.fan_speed(), 255);
    assert!(app.is_prefs_dirty());
}

#[test]
fn json_set_led_reaches_actuator() {
    let (mut app, mut hw, clock, mut notifier) = make_app();

    app.handle_payload(br#"{"cmd":"SET_LED","value":64}"#, &mut hw, &clock, &mut notifier);

    assert_eq!(hw.led_brightness(), Some(64));
    assert_eq!(app.led_brightness(), 64);
}

// ── Auto mode + preferences persistence ──────────────────────

#[test]
fn set_auto_survives_a_reboot() {
    let (mut app, mut hw, clock, mut notifier) = make_app();
    let mut nvs = NvsAdapter::new().unwrap();

    app.handle_payload(br#"{"cmd":"SET_AUTO","value":true}"#, &mut hw, &clock, &mut notifier);
    assert!(app.auto_mode());
    assert!(app.is_prefs_dirty());

    // Not yet: the save delay has not elapsed.
    assert!(!app.save_prefs_if_needed(&mut nvs, clock.uptime_ms()));

    clock.advance_ms(6_000);
    assert!(app.save_prefs_if_needed(&mut nvs, clock.uptime_ms()));
    assert!(!app.is_prefs_dirty());

    // "Reboot": a fresh service loads the stored preferences.
    let mut app2 = AppService::new(SystemConfig::default());
    app2.load_prefs(&nvs);
    assert!(app2.auto_mode());
}

#[test]
fn boot_restore_applies_saved_prefs_to_actuators() {
    let (mut app, mut hw, clock, mut notifier) = make_app();
    let mut nvs = NvsAdapter::new().unwrap();

    app.handle_payload(b"FAN:PWM:180", &mut hw, &clock, &mut notifier);
    app.handle_payload(br#"{"cmd":"SET_LED","value":90}"#, &mut hw, &clock, &mut notifier);
    clock.advance_ms(10_000);
    assert!(app.save_prefs_if_needed(&mut nvs, clock.uptime_ms()));

    let mut app2 = AppService::new(SystemConfig::default());
    app2.load_prefs(&nvs);
    let mut hw2 = MockHardware::new();
    app2.apply_prefs(&mut hw2);

    assert_eq!(hw2.fan_pwm(), Some(180));
    assert_eq!(hw2.led_brightness(), Some(90));
}

// ── Status reporting ─────────────────────────────────────────

#[test]
fn get_status_notifies_sensor_snapshot_json() {
    let (mut app, mut hw, clock, mut notifier) = make_app();
    hw.snapshot.temperature_c = 24.5;
    hw.snapshot.humidity_pct = 51.0;
    hw.snapshot.motion = true;
    hw.snapshot.distance_cm = 120.0;
    clock.advance_ms(123_456);

    app.handle_payload(b"FAN:PWM:100", &mut hw, &clock, &mut notifier);
    app.handle_payload(br#"{"cmd":"GET_STATUS"}"#, &mut hw, &clock, &mut notifier);

    let json = notifier.last().expect("status report should be sent");
    let v: serde_json::Value = serde_json::from_str(json).unwrap();
    assert_eq!(v["type"], "sensor_data");
    assert!((v["temperature"].as_f64().unwrap() - 24.5).abs() < 0.01);
    assert!((v["humidity"].as_f64().unwrap() - 51.0).abs() < 0.01);
    assert_eq!(v["fan_speed"], 100);
    assert_eq!(v["led_brightness"], 128); // first-boot default
    assert_eq!(v["motion"], true);
    assert!((v["distance"].as_f64().unwrap() - 120.0).abs() < 0.01);
    assert_eq!(v["timestamp"], 123_456);
}

// ── Suggestion acceptance ────────────────────────────────────

#[test]
fn accept_suggestion_is_acknowledged() {
    let (mut app, mut hw, clock, mut notifier) = make_app();

    app.handle_payload(b"SUGGEST:ACCEPT:2", &mut hw, &clock, &mut notifier);

    assert_eq!(notifier.last(), Some("SUGGEST_ACCEPTED:2"));
}

// ── Bad input never mutates state ────────────────────────────

#[test]
fn unrecognized_command_is_a_noop() {
    let (mut app, mut hw, clock, mut notifier) = make_app();

    app.handle_payload(b"HELLO:WORLD", &mut hw, &clock, &mut notifier);

    assert!(hw.calls.is_empty());
    assert!(notifier.sent.is_empty());
    assert!(app.log_snapshot(ApplianceId::FAN).is_empty());
}

#[test]
fn parse_errors_are_dropped_without_side_effects() {
    let (mut app, mut hw, clock, mut notifier) = make_app();

    app.handle_payload(b"FAN:PWM:fast", &mut hw, &clock, &mut notifier);
    app.handle_payload(br#"{"cmd":"SET_FAN""#, &mut hw, &clock, &mut notifier);
    app.handle_payload(b"SIMLOG:0:19:05,banana", &mut hw, &clock, &mut notifier);
    app.handle_payload(&[0xFF, 0x00, 0x80], &mut hw, &clock, &mut notifier);

    assert!(hw.calls.is_empty());
    assert!(notifier.sent.is_empty());
    assert!(app.log_snapshot(ApplianceId::FAN).is_empty());
}

#[test]
fn out_of_range_appliance_id_is_dropped() {
    let (mut app, mut hw, clock, mut notifier) = make_app();

    app.handle_payload(b"SIMLOG:9:19:05,19:06,19:04,19:07", &mut hw, &clock, &mut notifier);
    app.handle_payload(b"SUGGEST:ACCEPT:200", &mut hw, &clock, &mut notifier);

    assert!(hw.calls.is_empty());
    assert!(notifier.sent.is_empty());
    for raw in 0..4 {
        let id = ApplianceId::new(raw).unwrap();
        assert!(app.log_snapshot(id).is_empty());
    }
}

// ── Dispatch is purely synchronous ───────────────────────────

#[test]
fn each_payload_is_fully_processed_in_order() {
    let (mut app, mut hw, clock, mut notifier) = make_app();

    app.handle_payload(b"B1:ON", &mut hw, &clock, &mut notifier);
    app.handle_payload(b"FAN:PWM:10", &mut hw, &clock, &mut notifier);
    app.handle_payload(b"B1:OFF", &mut hw, &clock, &mut notifier);

    assert_eq!(
        hw.calls,
        vec![
            ActuatorCall::SetRelay {
                relay: Relay::Bulb1,
                on: true
            },
            ActuatorCall::SetFanPwm { value: 10 },
            ActuatorCall::SetRelay {
                relay: Relay::Bulb1,
                on: false
            },
        ]
    );
}
