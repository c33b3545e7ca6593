//! HTTP client for the attempt authority.
//!
//! One blocking GET per report, no retries, no authentication.  The
//! caller gets the reply body or `None`; transport problems end here as
//! a log line.

use core::fmt::Write;

use log::{info, warn};

use super::{AttemptReport, Outcome};
use crate::app::ports::HttpPort;
use crate::keypad::Code;

/// Request URL buffer: base URL (96) + query string.
const URL_CAP: usize = 160;

/// Builds and sends outcome reports.
pub struct AuthorityClient {
    base_url: heapless::String<96>,
}

impl AuthorityClient {
    /// `base_url` has no trailing slash (validated by `LockConfig`).
    pub fn new(base_url: &str) -> Self {
        let mut url = heapless::String::new();
        if url.push_str(base_url).is_err() {
            warn!("authority: base URL truncated to empty (too long)");
        }
        Self { base_url: url }
    }

    /// `{base}/?status={outcome}&code={code}`
    pub fn request_url(&self, report: &AttemptReport) -> Option<heapless::String<URL_CAP>> {
        let mut url = heapless::String::new();
        write!(
            url,
            "{}/?status={}&code={}",
            self.base_url,
            report.outcome.as_query(),
            report.code.as_str()
        )
        .ok()?;
        Some(url)
    }

    /// Send one report and return the raw reply body.
    ///
    /// Any HTTP status counts as a reply; only failing to get a response
    /// at all yields `None`.
    pub fn report(&self, http: &mut impl HttpPort, outcome: Outcome, code: &Code) -> Option<String> {
        let report = AttemptReport {
            outcome,
            code: code.clone(),
        };
        let Some(url) = self.request_url(&report) else {
            warn!("REPORT | {} not sent: URL exceeds {} bytes", outcome, URL_CAP);
            return None;
        };

        info!("REPORT | sending status={}", outcome);
        match http.get(&url) {
            Ok(resp) => {
                info!("REPORT | HTTP {} ({} bytes)", resp.status, resp.body.len());
                Some(resp.body)
            }
            Err(e) => {
                warn!("REPORT | {} not delivered: {}", outcome, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::{HttpResponse, TransportError};

    struct FixedHttp {
        result: Result<HttpResponse, TransportError>,
        last_url: Option<String>,
    }

    impl HttpPort for FixedHttp {
        fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
            self.last_url = Some(url.to_string());
            self.result.clone()
        }
    }

    fn code(s: &str) -> Code {
        Code::try_from(s).unwrap()
    }

    #[test]
    fn builds_query_url() {
        let client = AuthorityClient::new("http://10.0.0.5:5000");
        let report = AttemptReport {
            outcome: Outcome::Attempt,
            code: code("8888"),
        };
        assert_eq!(
            client.request_url(&report).unwrap().as_str(),
            "http://10.0.0.5:5000/?status=attempt&code=8888"
        );
    }

    #[test]
    fn returns_body_for_any_status() {
        let client = AuthorityClient::new("http://a");
        let mut http = FixedHttp {
            result: Ok(HttpResponse {
                status: 500,
                body: "oops".into(),
            }),
            last_url: None,
        };
        assert_eq!(
            client.report(&mut http, Outcome::Unlocked, &code("1234")).as_deref(),
            Some("oops")
        );
        assert_eq!(
            http.last_url.as_deref(),
            Some("http://a/?status=unlocked&code=1234")
        );
    }

    #[test]
    fn transport_failure_is_absent_reply() {
        let client = AuthorityClient::new("http://a");
        let mut http = FixedHttp {
            result: Err(TransportError::NotConnected),
            last_url: None,
        };
        assert!(client.report(&mut http, Outcome::Attempt, &code("1111")).is_none());
    }
}
