//! Configuration for the tracking-service connection

use crate::error::{Result, SourceError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Streaming endpoint of a locally running Leap Motion service (JSON protocol v6).
pub const DEFAULT_URL: &str = "ws://localhost:6437/v6.json";

/// Origin presented during the WebSocket upgrade.
pub const DEFAULT_ORIGIN: &str = "http://localhost/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// WebSocket URL of the tracking service
    pub url: String,
    /// Value of the `Origin` header, omitted when `None`
    pub origin: Option<String>,
    /// Additional headers for the upgrade request
    pub headers: Vec<(String, String)>,
    /// Ask the service to run gesture recognition
    pub enable_gestures: bool,
    /// Keep receiving frames while the application is not focused
    pub background: bool,
    /// Upper bound for dialing plus the WebSocket upgrade (milliseconds, 0 = unbounded)
    pub connect_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            origin: Some(DEFAULT_ORIGIN.to_string()),
            headers: Vec::new(),
            enable_gestures: true,
            background: true,
            connect_timeout_ms: 5000,
        }
    }
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_origin(mut self, origin: Option<String>) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_gestures(mut self, enable: bool) -> Self {
        self.enable_gestures = enable;
        self
    }

    pub fn with_background(mut self, enable: bool) -> Self {
        self.background = enable;
        self
    }

    pub fn with_connect_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.connect_timeout_ms = timeout_ms;
        self
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout_ms > 0).then(|| Duration::from_millis(self.connect_timeout_ms))
    }

    /// Parse the URL and reject anything that is not `ws` or `wss`.
    pub fn validate(&self) -> Result<url::Url> {
        let url = url::Url::parse(&self.url)
            .map_err(|e| SourceError::ConfigError(format!("Invalid WebSocket URL: {}", e)))?;

        match url.scheme() {
            "ws" | "wss" => Ok(url),
            other => Err(SourceError::ConfigError(format!(
                "Unsupported URL scheme '{}' (expected ws or wss)",
                other
            ))),
        }
    }
}
