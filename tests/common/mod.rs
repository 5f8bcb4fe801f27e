use openvox_client::{OpenVoxClient, PuppetCaClient};
use serde_json::{json, Value};
use url::Url;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Set up a client pointed at the mock server.
#[allow(dead_code)]
pub fn setup_test_client(server_url: &str) -> OpenVoxClient {
    init_logging();
    OpenVoxClient::builder()
        .base_url(server_url)
        .build()
        .expect("Failed to build OpenVoxClient")
}

/// Set up a Puppet CA client pointed at the mock server, without TLS.
#[allow(dead_code)]
pub fn setup_puppet_ca_client(server_url: &str) -> PuppetCaClient {
    init_logging();
    let address = Url::parse(server_url).expect("Invalid mock server URL");
    PuppetCaClient::with_http_client(address, reqwest::Client::new())
}

/// A certificate status record as returned by the Puppet CA.
#[allow(dead_code)]
pub fn certificate_json(name: &str, state: &str) -> Value {
    json!({
        "name": name,
        "state": state,
        "fingerprint": format!("FP:{name}"),
        "fingerprints": { "default": format!("FP:{name}") },
        "dns_alt_names": [format!("DNS:{name}")],
        "subject_alt_names": [],
        "authorization_extensions": {}
    })
}
