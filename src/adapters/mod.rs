//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements          | Connects to                |
//! |-----------------|---------------------|----------------------------|
//! | `hardware`      | TouchPort           | CAP1188 over I²C           |
//! |                 | LockActuatorPort    | Servo on LEDC PWM          |
//! |                 | IndicatorPort       | Red / green LED GPIO       |
//! | `http`          | HttpPort            | ESP-IDF HTTP client        |
//! | `log_sink`      | EventSink           | Serial log output          |
//! | `sim_authority` | HttpPort            | In-process authority (host)|
//! | `time`          | ClockPort           | ESP32 system timer         |
//! | `wifi`          | ConnectivityPort    | ESP-IDF WiFi STA           |

pub mod hardware;
pub mod http;
pub mod log_sink;
#[cfg(not(target_os = "espidf"))]
pub mod sim_authority;
pub mod time;
pub mod wifi;
