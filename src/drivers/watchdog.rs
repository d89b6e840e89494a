//! Task Watchdog Timer (TWDT) driver.
//!
//! Resets the node if the scheduler loop stops iterating.  The timeout is
//! the sum of every bounded blocking step a single iteration may contain:
//! a full reconnect window followed by a slow HTTP exchange, a DHT11 read
//! and the loop yield.
//!
//! The main loop calls `feed()` once per scheduler iteration.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::adapters::http::HTTP_EXCHANGE_MAX_MS;
use crate::scheduler::LOOP_YIELD_MS;
use crate::sensors::temperature::READ_WINDOW_MS;

/// Headroom for the unbounded-but-short work: SPI polls, logging, JSON.
pub const WATCHDOG_MARGIN_MS: u32 = 5_000;

/// Blocking budget of one iteration on top of the reconnect window.
pub const WATCHDOG_SLACK_MS: u32 =
    HTTP_EXCHANGE_MAX_MS + READ_WINDOW_MS + LOOP_YIELD_MS + WATCHDOG_MARGIN_MS;

/// Timeout covering the worst iteration: a reconnect that succeeds at the
/// end of its window, then a send that hits every socket timeout.
pub fn timeout_for(connect_timeout_ms: u32) -> u32 {
    connect_timeout_ms.saturating_add(WATCHDOG_SLACK_MS)
}

pub struct Watchdog {
    timeout_ms: u32,
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    /// Reconfigure the TWDT to `timeout_ms` and subscribe the current task.
    pub fn new(timeout_ms: u32) -> Self {
        #[cfg(target_os = "espidf")]
        {
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK {
                    log::warn!(
                        "TWDT reconfigure returned {} (may already be configured)",
                        ret
                    );
                }

                let ret = esp_task_wdt_add(core::ptr::null_mut());
                let subscribed = ret == ESP_OK;
                if subscribed {
                    info!("Watchdog: subscribed ({}ms timeout, panic on trigger)", timeout_ms);
                } else {
                    log::warn!("Watchdog: failed to subscribe ({})", ret);
                }

                Self { timeout_ms, subscribed }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::info!("Watchdog(sim): no-op ({}ms)", timeout_ms);
            Self { timeout_ms }
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Feed the watchdog.  Must be called at least every `timeout_ms`.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }
    }
}
