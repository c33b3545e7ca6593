//! Integration tests for the AppService → FSM → actuators pipeline.
//!
//! These run on the host (x86_64) and drive the full chain from a touch
//! sample down to servo, LED and report calls without any real hardware.

use crate::mock_hw::{HwCall, MockHttp, Rig};

use touchlock::adapters::time::ManualClock;
use touchlock::app::events::AppEvent;
use touchlock::app::ports::IndicatorChannel;
use touchlock::authority::Outcome;
use touchlock::error::TouchError;
use touchlock::fsm::StateId;

fn make_rig() -> Rig<MockHttp> {
    Rig::new(MockHttp::new(), ManualClock::new(0))
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_drives_lock_to_rest_position() {
    let rig = make_rig();

    assert_eq!(rig.app.state(), StateId::Idle);
    assert_eq!(rig.hw.servo_angle(), Some(90));
    assert!(rig.hw.led(IndicatorChannel::Fail), "red LED lit while locked");
    assert!(!rig.hw.led(IndicatorChannel::Ok));
    assert_eq!(rig.sink.events[0], AppEvent::Started(StateId::Idle));
}

#[test]
fn quiet_ticks_write_nothing() {
    let mut rig = make_rig();
    let writes = rig.hw.calls.len();

    rig.run_for(2_000);

    assert_eq!(rig.hw.calls.len(), writes, "unchanged outputs are not rewritten");
    assert!(rig.net.requests.is_empty());
}

// ── Correct code ──────────────────────────────────────────────

#[test]
fn correct_code_unlocks_for_dwell_then_relocks() {
    let mut rig = make_rig();
    rig.net.reply("Received: Status=unlocked, Code=1234 at 12:00:00. ");

    rig.enter("1234");

    assert_eq!(
        rig.net.requests,
        vec!["http://lockdash.local:5000/?status=unlocked&code=1234".to_owned()]
    );
    assert_eq!(rig.app.state(), StateId::Unlocking);
    assert_eq!(rig.hw.servo_angle(), Some(180));
    assert!(rig.hw.led(IndicatorChannel::Ok));
    assert!(!rig.hw.led(IndicatorChannel::Fail));
    assert_eq!(rig.sink.count(&AppEvent::CodeAccepted), 1);

    rig.run_for(4_800);
    assert_eq!(rig.app.state(), StateId::Unlocking, "still within the 5 s dwell");

    rig.run_for(200);
    assert_eq!(rig.app.state(), StateId::Idle);
    assert_eq!(rig.hw.servo_angle(), Some(90));
    assert!(rig.hw.led(IndicatorChannel::Fail));
    assert!(!rig.hw.led(IndicatorChannel::Ok));

    // No failure indication anywhere in the sequence.
    assert!(!rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::StateChanged {
            to: StateId::Blinking,
            ..
        }
    )));
}

#[test]
fn touches_during_unlock_are_discarded() {
    let mut rig = make_rig();
    rig.net.reply("ok");
    rig.enter("1234");

    rig.press(5);
    rig.press(6);
    assert_eq!(rig.app.digits_entered(), 0);

    rig.run_for(5_000);
    assert_eq!(rig.app.state(), StateId::Idle);
    assert_eq!(rig.app.digits_entered(), 0);
}

// ── Wrong code ────────────────────────────────────────────────

#[test]
fn wrong_code_blinks_three_times_and_reports_once() {
    let mut rig = make_rig();
    rig.net.reply("Received: Status=attempt, Code=4321 at 12:00:00. ");

    rig.enter("4321");

    assert_eq!(
        rig.net.requests,
        vec!["http://lockdash.local:5000/?status=attempt&code=4321".to_owned()]
    );
    assert_eq!(rig.app.state(), StateId::Blinking);
    assert_eq!(rig.sink.count(&AppEvent::CodeRejected), 1);
    let before = rig.hw.calls.len();

    rig.run_for(1_200);

    assert_eq!(rig.app.state(), StateId::Idle);
    let blink = &rig.hw.calls[before..];
    let offs = blink
        .iter()
        .filter(|c| **c == HwCall::Led(IndicatorChannel::Fail, false))
        .count();
    assert_eq!(offs, 3, "three on/off cycles: {:?}", blink);
    assert!(rig.hw.led(IndicatorChannel::Fail), "red back on at rest");
    assert_eq!(rig.hw.count(HwCall::Servo(180)), 0, "bolt never moved");
    assert_eq!(rig.net.requests.len(), 1);
}

#[test]
fn new_code_can_be_entered_after_rejection() {
    let mut rig = make_rig();
    rig.net.reply("nope");
    rig.net.reply("ok");

    rig.enter("8765");
    rig.run_for(1_200);
    rig.enter("1234");

    assert_eq!(rig.net.requests.len(), 2);
    assert!(rig.net.requests[1].ends_with("status=unlocked&code=1234"));
    assert_eq!(rig.app.state(), StateId::Unlocking);
}

// ── Transport failure ─────────────────────────────────────────

#[test]
fn unreachable_authority_still_clears_code() {
    let mut rig = make_rig();

    rig.enter("4444");

    assert_eq!(rig.net.requests.len(), 1, "one attempt, no retries");
    assert_eq!(rig.sink.count(&AppEvent::ReportFailed(Outcome::Attempt)), 1);
    assert_eq!(rig.app.digits_entered(), 0);
    assert_eq!(rig.app.lockout_remaining_ms(), 0);

    rig.run_for(1_200);
    assert_eq!(rig.app.state(), StateId::Idle);

    rig.enter("1234");
    assert_eq!(rig.sink.count(&AppEvent::ReportFailed(Outcome::Unlocked)), 1);
    assert_eq!(rig.app.state(), StateId::Unlocking, "unlock works offline");
}

// ── Keypad sampling ───────────────────────────────────────────

#[test]
fn held_pad_counts_once() {
    let mut rig = make_rig();
    for _ in 0..5 {
        rig.hw.queue(Ok(0b0000_0100));
    }
    rig.run_for(500);

    assert_eq!(rig.app.digits_entered(), 1);
    assert_eq!(rig.sink.digits_reported(), 1);
}

#[test]
fn simultaneous_pads_register_in_ascending_order() {
    let mut rig = make_rig();
    rig.net.reply("ok");

    rig.hw.queue(Ok(0b0000_1011)); // sensors 1, 2, 4
    rig.tick();
    rig.hw.queue(Ok(0));
    rig.tick();
    rig.press(3);

    assert_eq!(
        rig.net.requests,
        vec!["http://lockdash.local:5000/?status=attempt&code=1243".to_owned()]
    );
}

#[test]
fn touch_read_error_is_treated_as_no_touch() {
    let mut rig = make_rig();
    rig.hw.queue(Err(TouchError::Bus));
    rig.hw.queue(Err(TouchError::Bus));
    rig.run_for(200);

    assert_eq!(rig.app.state(), StateId::Idle);
    assert_eq!(rig.app.digits_entered(), 0);

    rig.press(1);
    assert_eq!(rig.app.digits_entered(), 1);
}

#[test]
fn read_glitch_during_hold_does_not_repeat_digit() {
    let mut rig = make_rig();
    rig.hw.queue(Ok(0b0000_0100));
    rig.hw.queue(Err(TouchError::Bus));
    rig.hw.queue(Ok(0b0000_0100));
    rig.tick();
    rig.tick();
    rig.tick();

    assert_eq!(rig.app.digits_entered(), 1);
}

#[test]
fn digits_never_appear_in_events() {
    let mut rig = make_rig();
    rig.net.reply("ok");
    rig.enter("1234");

    let rendered = format!("{:?}", rig.sink.events);
    assert!(!rendered.contains("1234"), "{}", rendered);
    let counts: Vec<u8> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::DigitEntered { count } => Some(*count),
            _ => None,
        })
        .collect();
    assert_eq!(counts, vec![1, 2, 3, 4]);
}

#[test]
fn polls_once_per_tick() {
    let mut rig = make_rig();
    rig.run_for(1_000);
    assert_eq!(rig.hw.polls as u64, rig.app.tick_count());
    assert_eq!(rig.app.tick_count(), 10);
}
