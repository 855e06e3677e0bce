//! End-to-end learner behaviour: toggles in, suggestions out.
//!
//! Exercises the record → evaluate → notify chain through the public
//! dispatch surface, the same way a BLE peer would drive it.

use crate::mock_hw::{FixedClock, MockHardware, RecordingNotifier};

use smartsync::app::service::AppService;
use smartsync::config::SystemConfig;
use smartsync::learner::ApplianceId;

fn make_app() -> (AppService, MockHardware, FixedClock, RecordingNotifier) {
    (
        AppService::new(SystemConfig::default()),
        MockHardware::new(),
        FixedClock::at_minute(1145),
        RecordingNotifier::new(),
    )
}

#[test]
fn seedlog_bootstraps_a_suggestion() {
    let (mut app, mut hw, clock, mut notifier) = make_app();

    // 19:05, 19:06, 19:04, 19:07 — a tight evening cluster.
    app.handle_payload(
        b"SIMLOG:0:19:05,19:06,19:04,19:07",
        &mut hw,
        &clock,
        &mut notifier,
    );

    assert_eq!(
        app.log_snapshot(ApplianceId::FAN).as_slice(),
        &[1145, 1146, 1144, 1147]
    );
    // Evaluation runs after every record; only the fourth has enough
    // evidence, so exactly one suggestion goes out.
    assert_eq!(notifier.sent, ["SUGGEST:0:1145"]);
}

#[test]
fn scattered_usage_never_suggests() {
    let (mut app, mut hw, clock, mut notifier) = make_app();

    app.handle_payload(
        b"SIMLOG:1:00:00,06:40,13:20,20:00",
        &mut hw,
        &clock,
        &mut notifier,
    );

    let id = ApplianceId::new(1).unwrap();
    assert_eq!(app.log_snapshot(id).len(), 4);
    assert!(notifier.sent.is_empty());
}

#[test]
fn manual_toggles_accumulate_into_a_suggestion() {
    let (mut app, mut hw, clock, mut notifier) = make_app();

    // Four evenings of switching the fan on around 19:05.
    for minute in [1144, 1146, 1145, 1147] {
        clock.set_minute(minute);
        app.handle_payload(b"FAN:ON", &mut hw, &clock, &mut notifier);
    }

    assert_eq!(notifier.sent.len(), 1);
    assert!(notifier.sent[0].starts_with("SUGGEST:0:"));
}

#[test]
fn suggestion_repeats_for_each_matching_toggle_once_stable() {
    let (mut app, mut hw, clock, mut notifier) = make_app();

    for minute in [1144, 1146, 1145, 1147, 1145] {
        clock.set_minute(minute);
        app.handle_payload(b"FAN:ON", &mut hw, &clock, &mut notifier);
    }

    // Once the cluster is stable, every further toggle re-evaluates to
    // the same answer — the peer sees one message per toggle.
    assert_eq!(notifier.sent.len(), 2);
    assert_eq!(notifier.sent[0], "SUGGEST:0:1145");
    assert_eq!(notifier.sent[1], "SUGGEST:0:1145");
}

#[test]
fn old_habit_fades_as_the_ring_turns_over() {
    let (mut app, mut hw, clock, mut notifier) = make_app();

    // Two weeks of a 19:05 habit...
    let mut seed = String::from("SIMLOG:0:");
    for i in 0..14 {
        if i > 0 {
            seed.push(',');
        }
        seed.push_str("19:05");
    }
    app.handle_payload(seed.as_bytes(), &mut hw, &clock, &mut notifier);
    let before = notifier.sent.len();
    assert!(before > 0);

    // ...then the user shifts to mornings. Once enough evening samples
    // are evicted the spread exceeds the cluster threshold and the
    // suggestions stop.
    for _ in 0..10 {
        clock.set_minute(420); // 07:00
        app.handle_payload(b"FAN:ON", &mut hw, &clock, &mut notifier);
    }
    let during_transition = notifier.sent.len();
    assert_eq!(
        before, during_transition,
        "mixed morning/evening samples must not produce suggestions"
    );

    // Four more mornings complete the turnover back to a tight cluster.
    for _ in 0..4 {
        clock.set_minute(421);
        app.handle_payload(b"FAN:ON", &mut hw, &clock, &mut notifier);
    }
    assert!(
        notifier.sent.len() > during_transition,
        "a new stable habit should be suggested again"
    );
    assert!(notifier.sent.last().unwrap().starts_with("SUGGEST:0:42"));
}

#[test]
fn per_appliance_logs_are_isolated() {
    let (mut app, mut hw, clock, mut notifier) = make_app();

    app.handle_payload(b"SIMLOG:2:19:05,19:06", &mut hw, &clock, &mut notifier);
    app.handle_payload(b"SIMLOG:3:07:00,07:01", &mut hw, &clock, &mut notifier);

    assert_eq!(app.log_snapshot(ApplianceId::new(2).unwrap()).len(), 2);
    assert_eq!(app.log_snapshot(ApplianceId::new(3).unwrap()).len(), 2);
    assert!(app.log_snapshot(ApplianceId::FAN).is_empty());
}
