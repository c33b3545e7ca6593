//! TouchLock Firmware: Main Entry Point
//!
//! Hexagonal architecture with a single cooperative control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter          LogEventSink     MonotonicClock      │
//! │  (Touch+Lock+Indicator)   (EventSink)      (ClockPort)         │
//! │  HttpAdapter<WifiAdapter>                                      │
//! │  (HttpPort over ConnectivityPort)                              │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Keypad · FSM · Lockout · Authority client             │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Result, anyhow};
use log::{info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use touchlock::adapters::hardware::HardwareAdapter;
use touchlock::adapters::http::HttpAdapter;
use touchlock::adapters::log_sink::LogEventSink;
use touchlock::adapters::time::MonotonicClock;
use touchlock::adapters::wifi::{ConnectivityPort, WifiAdapter};
use touchlock::app::ports::{ClockPort, ConfigError};
use touchlock::app::service::AppService;
use touchlock::config::LockConfig;
use touchlock::drivers::cap1188::{self, Cap1188};
use touchlock::drivers::indicator::IndicatorLeds;
use touchlock::drivers::servo::ServoDriver;
use touchlock::drivers::{hw_init, watchdog::Watchdog};
use touchlock::error::{CommsError, Error};
use touchlock::pins;

/// Watchdog floor; raised further when the HTTP timeout is long.
const MIN_WATCHDOG_MS: u32 = 10_000;

fn load_config() -> core::result::Result<LockConfig, ConfigError> {
    match option_env!("TOUCHLOCK_CONFIG_JSON") {
        Some(json) => {
            info!("Config: applying build-time override");
            LockConfig::from_json(json)
        }
        None => {
            let config = LockConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  TouchLock v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config().map_err(Error::from)?;
    info!(
        "Config: authority={} dwell={}ms tick={}ms",
        config.authority_url, config.unlock_dwell_ms, config.tick_interval_ms
    );

    // ── 3. Hardware ───────────────────────────────────────────
    hw_init::init_peripherals().map_err(Error::from)?;

    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21,
        peripherals.pins.gpio22,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ)),
    )
    .map_err(|e| anyhow!("{} ({})", Error::Init("I2C bus for the keypad"), e))?;
    info!(
        "I2C: SDA=GPIO{} SCL=GPIO{} @ {}Hz",
        pins::I2C_SDA_GPIO,
        pins::I2C_SCL_GPIO,
        pins::I2C_FREQ_HZ
    );

    // Without a keypad the lock cannot be operated; refuse to start.
    let mut keypad = Cap1188::new(i2c, cap1188::DEFAULT_ADDRESS);
    keypad.begin().map_err(Error::from)?;

    let mut hw = HardwareAdapter::new(keypad, ServoDriver::new(), IndicatorLeds::new());

    let watchdog = Watchdog::new(config.http_timeout_ms.saturating_mul(2).max(MIN_WATCHDOG_MS));

    // ── 4. Network ────────────────────────────────────────────
    let mut wifi = WifiAdapter::new();
    wifi.attach(peripherals.modem, sysloop, Some(nvs))
        .map_err(Error::from)?;

    match option_env!("TOUCHLOCK_WIFI_SSID") {
        Some(ssid) => {
            let password = option_env!("TOUCHLOCK_WIFI_PASS").unwrap_or("");
            let joined = wifi
                .set_credentials(ssid, password)
                .and_then(|()| wifi.connect());
            if let Err(e) = joined {
                // The lock works offline; reports fail until the link is up.
                warn!("{}: {}", Error::from(CommsError::WifiConnectFailed), e);
            }
        }
        None => warn!("WiFi: no build-time credentials, running offline"),
    }

    let mut http = HttpAdapter::new(wifi, config.http_timeout_ms);
    info!(
        "HTTP: report timeout {}ms, watchdog {}ms",
        http.timeout_ms(),
        watchdog.timeout_ms()
    );

    // ── 5. Application service ────────────────────────────────
    let clock = MonotonicClock::new();
    let mut sink = LogEventSink::new();
    let mut app = AppService::new(config);
    app.start(&mut hw, &clock, &mut sink);

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        app.tick(&mut hw, &mut http, &clock, &mut sink);
        watchdog.feed();
        http.link_mut().poll(clock.now_ms());
        FreeRtos::delay_ms(app.next_tick_delay_ms());
    }
}
