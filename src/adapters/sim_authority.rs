//! In-process attempt authority for host simulation and tests.
//!
//! Answers the same `GET /?status=…&code=…` requests as the lock
//! dashboard server and applies its policy:
//!
//! - each failed `attempt` bumps a per-code counter;
//! - reaching [`MAX_FAILED_ATTEMPTS`] locks that code out for
//!   [`LOCKOUT_SECS`];
//! - attempts on a locked code are denied with the remaining time;
//! - an `unlocked` report resets the code's counter and lockout.
//!
//! The counter is not reset when a lockout expires, so the first failure
//! afterwards locks the code out again.
//!
//! Every answered request except a denial is appended to an attempt log
//! that can be exported as JSON for a dashboard.

use std::collections::HashMap;

use log::{info, warn};
use serde::Serialize;

use crate::app::ports::{ClockPort, HttpPort, HttpResponse, TransportError};

pub const MAX_FAILED_ATTEMPTS: u32 = 3;
pub const LOCKOUT_SECS: u64 = 60;

const SUSPICIOUS_PATTERNS: [&str; 3] = ["0000", "1111", "8888"];

/// One row of the dashboard log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    pub timestamp_ms: u64,
    pub status: Option<String>,
    pub code: Option<String>,
    pub note: String,
}

pub struct SimAuthority<C> {
    clock: C,
    online: bool,
    fail_counter: HashMap<String, u32>,
    lockout_until_ms: HashMap<String, u64>,
    log: Vec<AttemptRecord>,
    requests: usize,
}

impl<C: ClockPort> SimAuthority<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            online: true,
            fail_counter: HashMap::new(),
            lockout_until_ms: HashMap::new(),
            log: Vec::new(),
            requests: 0,
        }
    }

    /// While offline every request fails at the transport level.
    pub fn set_online(&mut self, online: bool) {
        self.online = online;
    }

    /// Requests that reached the server (including denials).
    pub fn request_count(&self) -> usize {
        self.requests
    }

    pub fn failures(&self, code: &str) -> u32 {
        self.fail_counter.get(code).copied().unwrap_or(0)
    }

    pub fn is_locked_out(&self, code: &str) -> bool {
        self.lockout_until_ms
            .get(code)
            .is_some_and(|&until| self.clock.now_ms() < until)
    }

    pub fn attempt_log(&self) -> &[AttemptRecord] {
        &self.log
    }

    pub fn export_log_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.log)
    }

    /// Apply the policy to one request and produce the reply body.
    fn handle(&mut self, status: Option<&str>, code: Option<&str>) -> String {
        let now = self.clock.now_ms();
        let code_key = code.unwrap_or_default().to_owned();
        let mut note = String::new();

        match status {
            Some("attempt") => {
                if let Some(&until) = self.lockout_until_ms.get(&code_key) {
                    if now < until {
                        let wait_secs = (until - now) / 1000;
                        let note = format!(
                            "LOCKED OUT for {} seconds due to repeated failures.",
                            wait_secs
                        );
                        info!("AUTHORITY | {}", note);
                        return format!("Access denied: {}", note);
                    }
                }

                let failures = self.fail_counter.entry(code_key.clone()).or_insert(0);
                *failures += 1;

                if *failures >= MAX_FAILED_ATTEMPTS {
                    self.lockout_until_ms
                        .insert(code_key.clone(), now + LOCKOUT_SECS * 1000);
                    note = format!(
                        "Code {} has been LOCKED OUT for {:.1} seconds",
                        code_key, LOCKOUT_SECS as f64
                    );
                    info!("AUTHORITY | {}", note);
                } else if SUSPICIOUS_PATTERNS.contains(&code_key.as_str()) {
                    note = format!("Suspicious pattern detected: {}", code_key);
                    info!("AUTHORITY | {}", note);
                }
            }
            Some("unlocked") => {
                self.fail_counter.insert(code_key.clone(), 0);
                self.lockout_until_ms.remove(&code_key);
            }
            _ => {}
        }

        self.log.push(AttemptRecord {
            timestamp_ms: now,
            status: status.map(str::to_owned),
            code: code.map(str::to_owned),
            note: note.clone(),
        });

        format!(
            "Received: Status={}, Code={} at {}. {}",
            status.unwrap_or("None"),
            code.unwrap_or("None"),
            format_timestamp(now),
            note
        )
    }
}

impl<C: ClockPort> HttpPort for SimAuthority<C> {
    fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        if !self.online {
            warn!("AUTHORITY(sim): offline, refusing {}", url);
            return Err(TransportError::RequestFailed(-1));
        }
        let Some((_, query)) = url.split_once('?') else {
            return Err(TransportError::InvalidUrl);
        };
        self.requests += 1;

        let (status, code) = parse_query(query);
        let body = self.handle(status, code);
        Ok(HttpResponse { status: 200, body })
    }
}

fn parse_query(query: &str) -> (Option<&str>, Option<&str>) {
    let mut status = None;
    let mut code = None;
    for pair in query.split('&') {
        match pair.split_once('=') {
            Some(("status", v)) => status = Some(v),
            Some(("code", v)) => code = Some(v),
            _ => {}
        }
    }
    (status, code)
}

/// `H:MM:SS` since boot; the simulation has no wall clock.
fn format_timestamp(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
