use cyrest::DEFAULT_BASE_URL;
use std::time::Duration;

pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:9529";
pub const DEFAULT_RELAY_CHANNEL: u32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Command service root, e.g. `http://localhost:1234/v1`.
    pub base_url: String,
    pub relay_url: String,
    pub channel: u32,
    /// Whole-request deadline applied to every HTTP call, relay polls included.
    /// `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    /// Log parameters, bodies and headers, not just the request line.
    pub log_content: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            relay_url: DEFAULT_RELAY_URL.to_string(),
            channel: DEFAULT_RELAY_CHANNEL,
            request_timeout: None,
            log_content: false,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_relay_url(mut self, relay_url: impl Into<String>) -> Self {
        self.relay_url = relay_url.into();
        self
    }

    pub fn with_channel(mut self, channel: u32) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_log_content(mut self, log_content: bool) -> Self {
        self.log_content = log_content;
        self
    }

    pub(crate) fn build_http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}
