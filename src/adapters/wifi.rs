//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`], the hexagonal boundary for network
//! connectivity.  The HTTP transport consults it before every request.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via
//!   `esp_idf_svc::wifi::BlockingWifi`.
//! - **all other targets**: an in-memory link whose reachability tests
//!   can toggle.
//!
//! ## Reconnection policy
//!
//! On disconnect the adapter waits an exponential backoff (2 s → 4 s →
//! 8 s … capped at 60 s) between retries.  Retries are driven by
//! [`ConnectivityPort::poll`] from the control loop and never block
//! longer than one connect attempt.

use core::fmt;
use log::{error, info, warn};

#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::modem::Modem,
    nvs::EspDefaultNvsPartition,
    wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi},
};

#[cfg(target_os = "espidf")]
use crate::error::CommsError;

// ───────────────────────────────────────────────────────────────
// Port trait
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
    AlreadyConnected,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => f.write_str("station has no SSID set"),
            Self::InvalidSsid => write!(f, "SSID must be 1..={SSID_MAX_LEN} printable ASCII bytes"),
            Self::InvalidPassword => write!(
                f,
                "passphrase must be empty or {}..={} bytes",
                PASSPHRASE_LEN.start(),
                PASSPHRASE_LEN.end()
            ),
            Self::ConnectionFailed => f.write_str("association with the access point failed"),
            Self::AlreadyConnected => f.write_str("station is already associated"),
        }
    }
}

pub trait ConnectivityPort {
    fn connect(&mut self) -> Result<(), ConnectivityError>;
    fn disconnect(&mut self);
    fn is_connected(&self) -> bool;
    /// Drive reconnection.  Call once per control-loop iteration.
    fn poll(&mut self, now_ms: u64);
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError>;
    fn rssi(&self) -> Option<i8>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
}

const INITIAL_BACKOFF_SECS: u32 = 2;
const MAX_BACKOFF_SECS: u32 = 60;

const SSID_MAX_LEN: usize = 32;
/// WPA2-PSK passphrase bounds; an empty passphrase selects an open network.
const PASSPHRASE_LEN: core::ops::RangeInclusive<usize> = 8..=64;

fn check_credentials(ssid: &str, password: &str) -> Result<(), ConnectivityError> {
    let ssid_ok = (1..=SSID_MAX_LEN).contains(&ssid.len())
        && ssid.bytes().all(|b| b == b' ' || b.is_ascii_graphic());
    if !ssid_ok {
        return Err(ConnectivityError::InvalidSsid);
    }
    if !password.is_empty() && !PASSPHRASE_LEN.contains(&password.len()) {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    state: WifiState,
    ssid: heapless::String<SSID_MAX_LEN>,
    password: heapless::String<64>,
    backoff_secs: u32,
    /// When the next reconnect attempt is due; scheduled lazily on the
    /// first poll after a failure.
    retry_at_ms: Option<u64>,
    last_rssi: Option<i8>,
    #[cfg(target_os = "espidf")]
    driver: Option<BlockingWifi<EspWifi<'static>>>,
    #[cfg(not(target_os = "espidf"))]
    sim_reachable: bool,
}

impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl WifiAdapter {
    pub fn new() -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            backoff_secs: INITIAL_BACKOFF_SECS,
            retry_at_ms: None,
            last_rssi: None,
            #[cfg(target_os = "espidf")]
            driver: None,
            #[cfg(not(target_os = "espidf"))]
            sim_reachable: true,
        }
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    pub fn backoff_secs(&self) -> u32 {
        self.backoff_secs
    }

    /// Bind the radio.  Must be called once before [`connect`](ConnectivityPort::connect).
    #[cfg(target_os = "espidf")]
    pub fn attach(
        &mut self,
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
    ) -> Result<(), CommsError> {
        let esp_wifi =
            EspWifi::new(modem, sysloop.clone(), nvs).map_err(|_| CommsError::WifiInitFailed)?;
        let wifi = BlockingWifi::wrap(esp_wifi, sysloop).map_err(|_| CommsError::WifiInitFailed)?;
        self.driver = Some(wifi);
        info!("WiFi: STA driver attached");
        Ok(())
    }

    /// Simulation: make the access point (un)reachable.  Dropping
    /// reachability while connected looks like a lost link on next poll.
    #[cfg(not(target_os = "espidf"))]
    pub fn set_sim_reachable(&mut self, reachable: bool) {
        self.sim_reachable = reachable;
    }

    fn on_connected(&mut self) {
        self.state = WifiState::Connected;
        self.backoff_secs = INITIAL_BACKOFF_SECS;
        self.retry_at_ms = None;
        self.last_rssi = self.platform_rssi();
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        let Some(wifi) = self.driver.as_mut() else {
            error!("WiFi(espidf): connect before attach");
            return Err(ConnectivityError::ConnectionFailed);
        };

        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let config = Configuration::Client(ClientConfiguration {
            ssid: self
                .ssid
                .as_str()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidSsid)?,
            password: self
                .password
                .as_str()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidPassword)?,
            auth_method,
            ..Default::default()
        });

        wifi.set_configuration(&config)
            .map_err(|_| ConnectivityError::ConnectionFailed)?;
        if !wifi.is_started().unwrap_or(false) {
            wifi.start().map_err(|_| ConnectivityError::ConnectionFailed)?;
        }
        wifi.connect().map_err(|_| ConnectivityError::ConnectionFailed)?;
        wifi.wait_netif_up()
            .map_err(|_| ConnectivityError::ConnectionFailed)?;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        if !self.sim_reachable {
            warn!("WiFi(sim): AP '{}' unreachable", self.ssid);
            return Err(ConnectivityError::ConnectionFailed);
        }
        info!("WiFi(sim): associated with '{}'", self.ssid);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_disconnect(&mut self) {
        if let Some(wifi) = self.driver.as_mut() {
            if let Err(e) = wifi.disconnect() {
                warn!("WiFi(espidf): disconnect failed: {}", e);
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_disconnect(&mut self) {}

    #[cfg(target_os = "espidf")]
    fn platform_is_connected(&self) -> bool {
        self.driver
            .as_ref()
            .is_some_and(|w| w.is_connected().unwrap_or(false))
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.state == WifiState::Connected && self.sim_reachable
    }

    #[cfg(target_os = "espidf")]
    fn platform_rssi(&self) -> Option<i8> {
        let mut ap_info = esp_idf_svc::sys::wifi_ap_record_t::default();
        // SAFETY: ap_info is a valid out-pointer for the duration of the call.
        let ret = unsafe { esp_idf_svc::sys::esp_wifi_sta_get_ap_info(&mut ap_info) };
        (ret == esp_idf_svc::sys::ESP_OK).then_some(ap_info.rssi)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_rssi(&self) -> Option<i8> {
        (self.state == WifiState::Connected).then_some(-60)
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn connect(&mut self) -> Result<(), ConnectivityError> {
        if self.ssid.is_empty() {
            return Err(ConnectivityError::NoCredentials);
        }
        if self.state == WifiState::Connected {
            return Err(ConnectivityError::AlreadyConnected);
        }

        info!("WiFi: joining '{}'", self.ssid);
        self.state = WifiState::Connecting;

        match self.platform_connect() {
            Ok(()) => {
                self.on_connected();
                info!("WiFi: link up, rssi={:?}", self.last_rssi);
                Ok(())
            }
            Err(e) => {
                error!("WiFi: connection failed: {}", e);
                self.state = WifiState::Reconnecting { attempt: 0 };
                self.retry_at_ms = None;
                Err(e)
            }
        }
    }

    fn disconnect(&mut self) {
        self.platform_disconnect();
        self.state = WifiState::Disconnected;
        self.retry_at_ms = None;
        self.last_rssi = None;
        info!("WiFi: left network");
    }

    fn is_connected(&self) -> bool {
        self.platform_is_connected()
    }

    fn poll(&mut self, now_ms: u64) {
        match self.state {
            WifiState::Reconnecting { attempt } => {
                let backoff_ms = u64::from(self.backoff_secs) * 1000;
                let due = *self
                    .retry_at_ms
                    .get_or_insert(now_ms.saturating_add(backoff_ms));
                if now_ms < due {
                    return;
                }

                info!("WiFi: reconnect attempt {} (backoff {}s)", attempt + 1, self.backoff_secs);
                if self.platform_connect().is_ok() {
                    self.on_connected();
                    info!("WiFi: link restored, rssi={:?}", self.last_rssi);
                } else {
                    self.backoff_secs = (self.backoff_secs * 2).min(MAX_BACKOFF_SECS);
                    self.retry_at_ms =
                        Some(now_ms.saturating_add(u64::from(self.backoff_secs) * 1000));
                    self.state = WifiState::Reconnecting {
                        attempt: attempt + 1,
                    };
                }
            }
            WifiState::Connected => {
                if self.platform_is_connected() {
                    self.last_rssi = self.platform_rssi();
                } else {
                    warn!("WiFi: link lost, scheduling reconnect");
                    self.state = WifiState::Reconnecting { attempt: 0 };
                    self.retry_at_ms = None;
                    self.last_rssi = None;
                }
            }
            WifiState::Disconnected | WifiState::Connecting => {}
        }
    }

    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        check_credentials(ssid, password)?;
        self.ssid.clear();
        self.ssid
            .push_str(ssid)
            .map_err(|()| ConnectivityError::InvalidSsid)?;
        self.password.clear();
        self.password
            .push_str(password)
            .map_err(|()| ConnectivityError::InvalidPassword)?;
        info!("WiFi: station ssid set to '{}'", self.ssid);
        Ok(())
    }

    fn rssi(&self) -> Option<i8> {
        self.last_rssi
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
