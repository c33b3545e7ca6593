//! HTTP transport adapter.
//!
//! Implements [`HttpPort`] for the attempt-authority client.  Each report
//! opens a fresh connection, issues one GET and reads the body.  Requests
//! are refused up front while the link is down so a dead network costs
//! nothing but a log line.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::http::client::EspHttpConnection`.
//! - **all other targets**: no HTTP stack; every request fails with
//!   [`TransportError::RequestFailed`].  Host tests use
//!   [`SimAuthority`](super::sim_authority::SimAuthority) instead.

use log::debug;

use crate::app::ports::{HttpPort, HttpResponse, TransportError};

use super::wifi::ConnectivityPort;

#[cfg(target_os = "espidf")]
use esp_idf_svc::http::{
    Method,
    client::{Configuration as HttpConfiguration, EspHttpConnection},
};

/// Replies longer than this are truncated; authority replies are one line.
pub const MAX_BODY_BYTES: usize = 1024;

pub struct HttpAdapter<L> {
    link: L,
    timeout_ms: u32,
}

impl<L: ConnectivityPort> HttpAdapter<L> {
    pub fn new(link: L, timeout_ms: u32) -> Self {
        Self { link, timeout_ms }
    }

    /// The control loop polls the link through this.
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    #[cfg(target_os = "espidf")]
    fn platform_get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        let config = HttpConfiguration {
            timeout: Some(core::time::Duration::from_millis(u64::from(self.timeout_ms))),
            ..Default::default()
        };
        let mut conn =
            EspHttpConnection::new(&config).map_err(|e| TransportError::RequestFailed(e.code()))?;

        conn.initiate_request(Method::Get, url, &[])
            .map_err(|e| TransportError::RequestFailed(e.code()))?;
        conn.initiate_response()
            .map_err(|e| TransportError::RequestFailed(e.code()))?;
        let status = conn.status();

        let mut body = Vec::new();
        let mut buf = [0u8; 256];
        while body.len() < MAX_BODY_BYTES {
            let n = conn
                .read(&mut buf)
                .map_err(|e| TransportError::RequestFailed(e.code()))?;
            if n == 0 {
                break;
            }
            body.extend_from_slice(&buf[..n]);
        }
        body.truncate(MAX_BODY_BYTES);

        Ok(HttpResponse {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        log::warn!("HTTP(sim): no HTTP stack, dropping GET {}", url);
        Err(TransportError::RequestFailed(-1))
    }
}

impl<L: ConnectivityPort> HttpPort for HttpAdapter<L> {
    fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(TransportError::InvalidUrl);
        }
        if !self.link.is_connected() {
            debug!("HTTP: link down, request skipped");
            return Err(TransportError::NotConnected);
        }
        self.platform_get(url)
    }
}
