fn main() {
    println!("cargo:rerun-if-env-changed=ATM_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=ATM_WIFI_PASS");
    println!("cargo:rerun-if-env-changed=ATM_API_URL");
    println!("cargo:rerun-if-env-changed=ATM_API_KEY");
    println!("cargo:rerun-if-env-changed=ATM_DEVICE_ID");
    println!("cargo:rerun-if-env-changed=ATM_SENSOR_PERIOD_MS");
    println!("cargo:rerun-if-env-changed=ATM_TELEMETRY_PERIOD_MS");
    println!("cargo:rerun-if-env-changed=ATM_RELAY_PULSE_MS");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
