//! End-to-end lockout tests against the in-process attempt authority.
//!
//! The device and the simulated server share one [`ManualClock`], so the
//! server's 60 s lockout and the device's countdown run on the same
//! timeline.

use crate::mock_hw::Rig;

use touchlock::adapters::sim_authority::SimAuthority;
use touchlock::adapters::time::ManualClock;
use touchlock::app::events::AppEvent;
use touchlock::app::ports::HttpPort;
use touchlock::authority::Outcome;
use touchlock::fsm::StateId;

fn make_rig() -> Rig<SimAuthority<ManualClock>> {
    let clock = ManualClock::new(0);
    Rig::new(SimAuthority::new(clock.clone()), clock)
}

/// Enter a wrong code and wait out the blink sequence.
fn fail_once(rig: &mut Rig<SimAuthority<ManualClock>>, code: &str) {
    rig.enter(code);
    rig.run_for(1_200);
}

#[test]
fn third_failure_locks_device_for_sixty_seconds() {
    let mut rig = make_rig();

    fail_once(&mut rig, "5678");
    fail_once(&mut rig, "5678");
    assert_eq!(rig.sink.count(&AppEvent::LockoutApplied { secs: 60 }), 0);

    rig.enter("5678");
    assert_eq!(rig.sink.count(&AppEvent::LockoutApplied { secs: 60 }), 1);
    assert_eq!(rig.app.state(), StateId::Blinking, "blink still plays out");

    rig.run_for(1_200);
    rig.run_for(200);
    assert_eq!(rig.app.state(), StateId::LockedOut);
    let requests = rig.net.request_count();
    let digits = rig.sink.digits_reported();

    // Input is dead while locked out.
    rig.enter("1234");
    assert_eq!(rig.app.digits_entered(), 0);
    assert_eq!(rig.sink.digits_reported(), digits);
    assert_eq!(rig.net.request_count(), requests);

    // Deadline is 60 s after the reply arrived; checks run once a second.
    rig.run_for(57_800);
    assert_eq!(rig.app.state(), StateId::LockedOut);
    rig.run_for(600);
    assert_eq!(rig.app.state(), StateId::Idle);
    assert_eq!(rig.sink.count(&AppEvent::LockoutCleared), 1);

    rig.enter("1234");
    assert_eq!(rig.app.state(), StateId::Unlocking);
    assert_eq!(rig.net.failures("1234"), 0);
}

#[test]
fn lockout_sleeps_between_checks() {
    let mut rig = make_rig();
    for _ in 0..3 {
        fail_once(&mut rig, "2222");
    }
    rig.run_for(200);
    assert_eq!(rig.app.state(), StateId::LockedOut);
    assert!(rig.app.next_tick_delay_ms() >= 100);
    assert!(rig.app.next_tick_delay_ms() <= 1_000);
}

#[test]
fn first_failure_after_expiry_relocks() {
    let mut rig = make_rig();
    for _ in 0..3 {
        fail_once(&mut rig, "3333");
    }
    rig.run_for(61_000);
    assert_eq!(rig.app.state(), StateId::Idle);

    rig.enter("3333");
    assert_eq!(rig.sink.count(&AppEvent::LockoutApplied { secs: 60 }), 2);
}

#[test]
fn denial_reply_applies_remaining_time() {
    let clock = ManualClock::new(0);
    let mut authority = SimAuthority::new(clock.clone());
    for _ in 0..3 {
        authority
            .get("http://lockdash.local:5000/?status=attempt&code=5678")
            .unwrap();
    }
    clock.set(17_500);

    // A device that rebooted mid-lockout learns about it on the next try.
    let mut rig = Rig::new(authority, clock);
    rig.enter("5678");

    // Reply arrives at 18.2 s: 41.8 s left, truncated.
    assert_eq!(rig.sink.count(&AppEvent::LockoutApplied { secs: 41 }), 1);
    assert!(rig.app.lockout_remaining_ms() > 40_000);
}

#[test]
fn offline_authority_never_locks_out() {
    let mut rig = make_rig();
    rig.net.set_online(false);

    for _ in 0..5 {
        fail_once(&mut rig, "6666");
    }

    assert_eq!(rig.sink.count(&AppEvent::ReportFailed(Outcome::Attempt)), 5);
    assert_eq!(rig.app.state(), StateId::Idle);
    assert_eq!(rig.app.lockout_remaining_ms(), 0);
}

#[test]
fn attempt_log_records_device_reports() {
    let mut rig = make_rig();
    fail_once(&mut rig, "1111");
    rig.enter("1234");

    let log = rig.net.attempt_log();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].status.as_deref(), Some("attempt"));
    assert_eq!(log[0].note, "Suspicious pattern detected: 1111");
    assert_eq!(log[1].status.as_deref(), Some("unlocked"));
    assert_eq!(log[1].code.as_deref(), Some("1234"));
}
