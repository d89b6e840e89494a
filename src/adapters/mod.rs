//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements     | Connects to              |
//! |-------------|----------------|--------------------------|
//! | `hardware`  | PeripheralPort | PIR, DHT11, MFRC522      |
//! |             | ActuatorPort   | relay, buzzer, LED GPIO  |
//! | `network`   | NetworkPort    | `wifi` + `http` below    |
//! | `wifi`      |                | ESP-IDF WiFi STA         |
//! | `http`      |                | ESP-IDF HTTP client      |
//! | `log_sink`  | EventSink      | Serial log output        |
//! | `time`      | ClockPort      | ESP32 system timer       |
//! | `device_id` |                | eFuse factory MAC        |

pub mod device_id;
pub mod hardware;
pub mod http;
pub mod log_sink;
pub mod network;
pub mod time;
pub mod wifi;
