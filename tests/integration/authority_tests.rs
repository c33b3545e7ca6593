//! Authority client + directive scanner against the simulated server.

use crate::mock_hw::MockHttp;

use touchlock::adapters::sim_authority::SimAuthority;
use touchlock::adapters::time::ManualClock;
use touchlock::app::ports::{HttpResponse, TransportError};
use touchlock::authority::{AuthorityClient, Outcome, parse_directive};
use touchlock::keypad::Code;

const BASE: &str = "http://lockdash.local:5000";

fn code(s: &str) -> Code {
    Code::try_from(s).unwrap()
}

fn directive_secs(reply: Option<String>) -> Option<u32> {
    reply.and_then(|r| parse_directive(&r)).map(|d| d.duration_secs)
}

#[test]
fn directives_follow_server_policy() {
    let clock = ManualClock::new(0);
    let mut server = SimAuthority::new(clock.clone());
    let client = AuthorityClient::new(BASE);
    let wrong = code("7777");

    assert_eq!(directive_secs(client.report(&mut server, Outcome::Attempt, &wrong)), None);
    assert_eq!(directive_secs(client.report(&mut server, Outcome::Attempt, &wrong)), None);
    assert_eq!(
        directive_secs(client.report(&mut server, Outcome::Attempt, &wrong)),
        Some(60)
    );

    clock.advance(30_000);
    assert_eq!(
        directive_secs(client.report(&mut server, Outcome::Attempt, &wrong)),
        Some(30)
    );

    clock.advance(29_999);
    assert_eq!(
        directive_secs(client.report(&mut server, Outcome::Attempt, &wrong)),
        Some(0),
        "sub-second remainder truncates to zero"
    );
}

#[test]
fn unlock_report_clears_server_state() {
    let clock = ManualClock::new(0);
    let mut server = SimAuthority::new(clock);
    let client = AuthorityClient::new(BASE);
    let c = code("2468");

    client.report(&mut server, Outcome::Attempt, &c);
    client.report(&mut server, Outcome::Attempt, &c);
    let reply = client.report(&mut server, Outcome::Unlocked, &c);

    assert!(reply.is_some_and(|r| r.starts_with("Received: Status=unlocked, Code=2468")));
    assert_eq!(server.failures("2468"), 0);
}

#[test]
fn error_status_body_is_still_a_reply() {
    let mut http = MockHttp::new();
    http.replies.push_back(Ok(HttpResponse {
        status: 503,
        body: "Access denied: LOCKED OUT for 9 seconds due to repeated failures.".to_owned(),
    }));
    let client = AuthorityClient::new(BASE);

    let reply = client.report(&mut http, Outcome::Attempt, &code("1111"));
    assert_eq!(directive_secs(reply), Some(9));
}

#[test]
fn transport_error_yields_no_reply() {
    let mut http = MockHttp::new();
    http.replies.push_back(Err(TransportError::RequestFailed(-1)));
    let client = AuthorityClient::new(BASE);

    assert_eq!(client.report(&mut http, Outcome::Attempt, &code("1111")), None);
    assert_eq!(http.requests, vec![format!("{}/?status=attempt&code=1111", BASE)]);
}
