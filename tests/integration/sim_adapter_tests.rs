//! End-to-end run over the host simulation of the real adapters.

use atmguard::adapters::hardware::HardwareAdapter;
use atmguard::adapters::http::HttpTransport;
use atmguard::adapters::log_sink::LogEventSink;
use atmguard::adapters::network::NetworkAdapter;
use atmguard::adapters::wifi::WifiAdapter;
use atmguard::app::ports::NetworkPort;
use atmguard::app::state::DeviceState;
use atmguard::config::NodeConfig;
use atmguard::scheduler::Scheduler;
use atmguard::sensors::credential::CredentialReader;

fn config() -> NodeConfig {
    let mut c = NodeConfig::default();
    c.wifi_ssid = "BranchNet".try_into().unwrap();
    c.wifi_password = "s3cretpass".try_into().unwrap();
    c
}

#[test]
fn tap_and_reading_reach_the_collector_as_json() {
    let config = config();
    let mut hw = HardwareAdapter::new(CredentialReader::new().unwrap());
    let mut net = NetworkAdapter::new(WifiAdapter::new(&config), HttpTransport::new(&config));
    let mut sink = LogEventSink::new();
    let mut sched = Scheduler::new(&config, DeviceState::new());

    assert!(net.connect(config.connect_timeout_ms));
    hw.dht_mut().sim_set_celsius(23.5);

    let mut now = 0;
    while now <= 5_000 {
        if now == 1_000 {
            hw.reader_mut().sim_present(&[0x04, 0xA1, 0x2B, 0x9C]);
        }
        sched.run_iteration(now, &mut hw, &mut net, &mut sink);
        if now == 1_000 {
            assert!(hw.relay_on());
        }
        now += 10;
    }

    assert!(!hw.relay_on());
    assert_eq!(hw.reader_mut().sim_releases(), 1);
    assert_eq!(
        net.http().sim_bodies(),
        &[br#"{"device":"atm-node-01","motion":false,"temp":23.5,"uid":"04 A1 2B 9C"}"#.to_vec()]
    );
}

#[test]
fn link_loss_skips_send_then_recovers() {
    let config = config();
    let mut hw = HardwareAdapter::new(CredentialReader::new().unwrap());
    let mut net = NetworkAdapter::new(WifiAdapter::new(&config), HttpTransport::new(&config));
    let mut sink = LogEventSink::new();
    let mut sched = Scheduler::new(&config, DeviceState::new());

    net.wifi_mut().sim_set_reachable(false);
    hw.pir_mut().sim_set_level(true);
    sched.run_iteration(5_000, &mut hw, &mut net, &mut sink);
    assert!(net.http().sim_bodies().is_empty());
    assert!(hw.buzzer_on() && hw.indicator_on());

    net.wifi_mut().sim_set_reachable(true);
    sched.run_iteration(10_000, &mut hw, &mut net, &mut sink);
    assert_eq!(net.http().sim_bodies().len(), 1);
    assert_eq!(net.wifi().attempts(), 2);
    assert_eq!(sched.service().metrics().telemetry_skipped, 1);
}
