//! Scheduler scenarios against mock adapters.
//!
//! Time is driven explicitly through `run_iteration`, one iteration every
//! 10 ms, so each test is deterministic.

use crate::mock_hw::{ActuatorCall, MockHardware, MockNetwork, RecordingSink};
use atmguard::app::events::AppEvent;
use atmguard::app::state::DeviceState;
use atmguard::config::NodeConfig;
use atmguard::error::CommsError;
use atmguard::scheduler::Scheduler;

const STEP_MS: u64 = 10;
const CARD: [u8; 4] = [0x04, 0xA1, 0x2B, 0x9C];

fn scheduler() -> Scheduler {
    Scheduler::new(&NodeConfig::default(), DeviceState::new())
}

/// Run iterations at every step in `from..=to`, calling `before` ahead of
/// each one so tests can inject inputs at exact times.
fn run(
    sched: &mut Scheduler,
    hw: &mut MockHardware,
    net: &mut MockNetwork,
    sink: &mut RecordingSink,
    from: u64,
    to: u64,
    mut before: impl FnMut(u64, &mut MockHardware, &mut MockNetwork),
) {
    let mut now = from;
    while now <= to {
        before(now, hw, net);
        sched.run_iteration(now, hw, net, sink);
        now += STEP_MS;
    }
}

#[test]
fn card_at_1000_pulses_relay_until_4000() {
    let mut sched = scheduler();
    let mut hw = MockHardware::new();
    let mut net = MockNetwork::offline();
    let mut sink = RecordingSink::default();

    let mut relay_on_from = None;
    let mut relay_off_at = None;
    let mut now = 0;
    while now <= 4_500 {
        if now == 1_000 {
            hw.present(&CARD);
        }
        sched.run_iteration(now, &mut hw, &mut net, &mut sink);
        if hw.relay_on() && relay_on_from.is_none() {
            relay_on_from = Some(now);
        }
        if relay_on_from.is_some() && !hw.relay_on() && relay_off_at.is_none() {
            relay_off_at = Some(now);
        }
        now += STEP_MS;
    }

    assert_eq!(relay_on_from, Some(1_000));
    assert_eq!(relay_off_at, Some(4_000));
    assert_eq!(
        sched.state().last_credential_id().map(|t| t.as_str()),
        Some("04 A1 2B 9C")
    );
    assert_eq!(hw.releases, 1);
    assert!(sink.events.contains(&AppEvent::RelayReleased { at: 4_000 }));
}

#[test]
fn offline_telemetry_keeps_credential_for_next_cycle() {
    let mut sched = scheduler();
    let mut hw = MockHardware::new();
    let mut net = MockNetwork::offline();
    let mut sink = RecordingSink::default();

    run(&mut sched, &mut hw, &mut net, &mut sink, 0, 9_990, |now, hw, _| {
        if now == 1_000 {
            hw.present(&CARD);
        }
    });

    assert!(net.sent.is_empty());
    assert_eq!(net.connect_attempts, 1, "one bounded reconnect at 5000");
    assert!(sched.state().last_credential_id().is_some());
    assert_eq!(sched.state().last_telemetry_sent_at(), 5_000);
    assert!(sink.events.contains(&AppEvent::TelemetrySkipped));

    // Access point comes back before the 10000 cycle.
    net.connect_succeeds = true;
    run(&mut sched, &mut hw, &mut net, &mut sink, 10_000, 10_000, |_, _, _| {});

    assert_eq!(net.connect_attempts, 2);
    assert_eq!(net.sent_uids(), vec!["04 A1 2B 9C".to_owned()]);
    assert!(sched.state().last_credential_id().is_none());
}

#[test]
fn second_tap_extends_pulse_without_flicker() {
    let mut sched = scheduler();
    let mut hw = MockHardware::new();
    let mut net = MockNetwork::offline();
    let mut sink = RecordingSink::default();

    let mut off_observed_at = None;
    let mut now = 0;
    while now <= 5_000 {
        if now == 1_000 || now == 1_500 {
            hw.present(&CARD);
        }
        sched.run_iteration(now, &mut hw, &mut net, &mut sink);
        if now >= 1_000 && !hw.relay_on() && off_observed_at.is_none() {
            off_observed_at = Some(now);
        }
        now += STEP_MS;
    }

    assert_eq!(hw.relay_calls(), vec![true, true, false]);
    assert_eq!(off_observed_at, Some(4_500));
    assert!(sink.events.contains(&AppEvent::RelayEngaged {
        until: 4_500,
        extended: true
    }));
}

#[test]
fn motion_mirrors_to_buzzer_and_indicator_in_same_iteration() {
    let mut sched = scheduler();
    let mut hw = MockHardware::new();
    let mut net = MockNetwork::offline();
    let mut sink = RecordingSink::default();

    hw.motion = true;
    sched.run_iteration(2_000, &mut hw, &mut net, &mut sink);

    assert!(sched.state().motion_detected());
    assert!(hw.calls.contains(&ActuatorCall::Buzzer(true)));
    assert!(hw.calls.contains(&ActuatorCall::Indicator(true)));

    hw.motion = false;
    sched.run_iteration(4_000, &mut hw, &mut net, &mut sink);
    assert!(!hw.buzzer_on() && !hw.indicator_on());
}

#[test]
fn credential_reported_at_most_once() {
    let mut sched = scheduler();
    let mut hw = MockHardware::new();
    let mut net = MockNetwork::online();
    let mut sink = RecordingSink::default();

    run(&mut sched, &mut hw, &mut net, &mut sink, 0, 15_000, |now, hw, _| {
        if now == 1_000 {
            hw.present(&CARD);
        }
    });

    assert_eq!(net.sent.len(), 3, "5000, 10000, 15000");
    assert_eq!(net.sent_uids(), vec!["04 A1 2B 9C".to_owned()]);
    assert!(net.sent[0].uid.is_some());
    assert!(net.sent[1].uid.is_none() && net.sent[2].uid.is_none());
}

#[test]
fn failed_send_still_consumes_credential() {
    let mut sched = scheduler();
    let mut hw = MockHardware::new();
    let mut net = MockNetwork::online();
    net.response = Err(CommsError::RequestFailed);
    let mut sink = RecordingSink::default();

    run(&mut sched, &mut hw, &mut net, &mut sink, 0, 5_000, |now, hw, _| {
        if now == 1_000 {
            hw.present(&CARD);
        }
    });
    assert!(sched.state().last_credential_id().is_none());
    assert!(sink.events.contains(&AppEvent::TelemetryFailed(CommsError::RequestFailed)));

    net.response = Ok(200);
    run(&mut sched, &mut hw, &mut net, &mut sink, 5_010, 10_000, |_, _, _| {});
    assert_eq!(net.sent.len(), 2);
    assert!(net.sent[1].uid.is_none());
    assert_eq!(sched.service().metrics().telemetry_failed, 1);
    assert_eq!(sched.service().metrics().last_status, Some(200));
}

#[test]
fn temperature_stays_at_last_good_value() {
    let mut sched = scheduler();
    let mut hw = MockHardware::new();
    hw.temperature = Some(26.5);
    let mut net = MockNetwork::online();
    let mut sink = RecordingSink::default();

    run(&mut sched, &mut hw, &mut net, &mut sink, 0, 2_000, |_, _, _| {});
    hw.temperature = None;
    run(&mut sched, &mut hw, &mut net, &mut sink, 2_010, 5_000, |_, _, _| {});

    assert_eq!(sched.state().temperature_c(), Some(26.5));
    assert_eq!(net.sent[0].temp, Some(26.5));
}

#[test]
fn telemetry_before_any_reading_omits_temperature() {
    let mut sched = Scheduler::new(
        &NodeConfig {
            sensor_period_ms: 60_000,
            ..NodeConfig::default()
        },
        DeviceState::new(),
    );
    let mut hw = MockHardware::new();
    let mut net = MockNetwork::online();
    let mut sink = RecordingSink::default();

    run(&mut sched, &mut hw, &mut net, &mut sink, 0, 5_000, |_, _, _| {});

    assert_eq!(net.sent.len(), 1);
    assert_eq!(net.sent[0].temp, None);
    assert!(!net.sent[0].motion);
}
