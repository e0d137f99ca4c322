//! Shared utilities for integration tests.

use std::net::SocketAddr;

use adtech_server::config::AdtechConfig;
use adtech_server::{AdtechServer, Shutdown};
use tokio::net::TcpListener;

#[allow(dead_code)]
pub const ADVERTISER_URL: &str = "https://shop.example";

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub fn test_config() -> AdtechConfig {
    let mut config = AdtechConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.origins.adtech_url = "https://adtech.example".into();
    config.origins.advertiser_url = ADVERTISER_URL.into();
    config
}

/// Start the server and return once it is accepting connections.
pub async fn start_server(config: AdtechConfig) -> TestServer {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = AdtechServer::new(config);

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer { addr, shutdown }
}

/// Client that does not follow redirects or use system proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

/// Parse a JSON registration header.
#[allow(dead_code)]
pub fn json_header(response: &reqwest::Response, name: &str) -> serde_json::Value {
    let raw = response
        .headers()
        .get(name)
        .unwrap_or_else(|| panic!("missing header {name}"));
    serde_json::from_slice(raw.as_bytes()).unwrap()
}
