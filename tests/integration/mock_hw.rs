//! Mock adapters for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO/PWM registers, and replays a
//! scripted sequence of touch samples.

use std::collections::VecDeque;

use touchlock::adapters::time::ManualClock;
use touchlock::app::events::AppEvent;
use touchlock::app::ports::{
    ClockPort, EventSink, HttpPort, HttpResponse, IndicatorChannel, IndicatorPort,
    LockActuatorPort, TouchPort, TransportError,
};
use touchlock::app::service::AppService;
use touchlock::config::LockConfig;
use touchlock::error::TouchError;

/// Milliseconds the test harness advances per control tick.
pub const TICK_MS: u64 = 100;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwCall {
    Servo(u8),
    Led(IndicatorChannel, bool),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub touches: VecDeque<Result<u8, TouchError>>,
    pub calls: Vec<HwCall>,
    pub polls: usize,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            touches: VecDeque::new(),
            calls: Vec::new(),
            polls: 0,
        }
    }

    pub fn queue(&mut self, sample: Result<u8, TouchError>) {
        self.touches.push_back(sample);
    }

    pub fn servo_angle(&self) -> Option<u8> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::Servo(a) => Some(*a),
            HwCall::Led(..) => None,
        })
    }

    pub fn led(&self, channel: IndicatorChannel) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                HwCall::Led(ch, on) if *ch == channel => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn count(&self, call: HwCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

impl TouchPort for MockHardware {
    fn poll(&mut self) -> Result<u8, TouchError> {
        self.polls += 1;
        self.touches.pop_front().unwrap_or(Ok(0))
    }
}

impl LockActuatorPort for MockHardware {
    fn set_position(&mut self, angle: u8) {
        self.calls.push(HwCall::Servo(angle));
    }
}

impl IndicatorPort for MockHardware {
    fn set(&mut self, channel: IndicatorChannel, on: bool) {
        self.calls.push(HwCall::Led(channel, on));
    }
}

// ── MockHttp ──────────────────────────────────────────────────

/// Replays canned replies; once they run out the link looks down.
pub struct MockHttp {
    pub replies: VecDeque<Result<HttpResponse, TransportError>>,
    pub requests: Vec<String>,
}

#[allow(dead_code)]
impl MockHttp {
    pub fn new() -> Self {
        Self {
            replies: VecDeque::new(),
            requests: Vec::new(),
        }
    }

    pub fn reply(&mut self, body: &str) {
        self.replies.push_back(Ok(HttpResponse {
            status: 200,
            body: body.to_owned(),
        }));
    }
}

impl HttpPort for MockHttp {
    fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        self.requests.push(url.to_owned());
        self.replies
            .pop_front()
            .unwrap_or(Err(TransportError::NotConnected))
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, event: &AppEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }

    pub fn digits_reported(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::DigitEntered { .. }))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig ───────────────────────────────────────────────────────

/// A started service plus all of its mock adapters on one timeline.
pub struct Rig<N> {
    pub app: AppService,
    pub hw: MockHardware,
    pub net: N,
    pub clock: ManualClock,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl<N: HttpPort> Rig<N> {
    pub fn new(net: N, clock: ManualClock) -> Self {
        let mut app = AppService::new(LockConfig::default());
        let mut hw = MockHardware::new();
        let mut sink = RecordingSink::new();
        app.start(&mut hw, &clock, &mut sink);
        Self {
            app,
            hw,
            net,
            clock,
            sink,
        }
    }

    /// Advance the clock one tick interval and run one control cycle.
    pub fn tick(&mut self) {
        self.clock.advance(TICK_MS);
        self.app
            .tick(&mut self.hw, &mut self.net, &self.clock, &mut self.sink);
    }

    /// Keep ticking until `ms` of simulated time have passed.
    pub fn run_for(&mut self, ms: u64) {
        let until = self.clock.now_ms() + ms;
        while self.clock.now_ms() < until {
            self.tick();
        }
    }

    /// Touch and release sensor `digit` (1–8): one tick down, one tick up.
    pub fn press(&mut self, digit: u8) {
        self.hw.queue(Ok(1 << (digit - 1)));
        self.tick();
        self.hw.queue(Ok(0));
        self.tick();
    }

    /// Enter every digit of `code`.  The report for a complete code is
    /// sent during the tick that registers the last digit.
    pub fn enter(&mut self, code: &str) {
        for b in code.bytes() {
            self.press(b - b'0');
        }
    }
}
