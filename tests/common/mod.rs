//! A mock VIP server for the blocking client.
//!
//! The mock server lives on a tokio runtime while the client is driven from
//! the test thread, outside of any async context.

#![allow(dead_code)]

use carmin::{CarminClient, ClientConfig};
use serde_json::{json, Value};
use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer, Request};

pub const API_KEY: &str = "test-api-key";

pub struct MockVip {
    pub server: MockServer,
    runtime: Runtime,
}

impl MockVip {
    pub fn start() -> Self {
        let runtime = Runtime::new().unwrap();
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server))
    }

    /// The REST root, e.g. `http://127.0.0.1:12345/rest/`
    pub fn api_url(&self) -> String {
        format!("{}/rest/", self.server.uri())
    }

    pub fn client(&self) -> CarminClient {
        self.client_with_key(API_KEY)
    }

    pub fn client_with_key(&self, api_key: &str) -> CarminClient {
        let config = ClientConfig::default()
            .with_api_url(self.api_url())
            .with_api_key(api_key)
            .without_certificate();
        CarminClient::new(config).unwrap()
    }

    pub fn received_requests(&self) -> Vec<Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }
}

/// Error document of VIP.
pub fn error_envelope(code: i64, message: &str) -> Value {
    json!({"errorCode": code, "errorMessage": message})
}
