//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable with the `host:port` of the geometry service.
pub const SERVICE_HOST_ENV: &str = "GEOMETRY_SERVICE_HOST";
/// Address used when the environment variable is not set.
pub const DEFAULT_ADDRESS: &str = "localhost:8980";
/// Default deadline of every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// Default number of geometries sent in one streaming union call.
pub const DEFAULT_BATCH_SIZE: usize = 25;

/// Configuration of a [`GeometryClient`](crate::GeometryClient).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// `host:port` of the geometry service.
    pub address: String,
    /// Deadline of every call.
    pub timeout: Duration,
    /// Number of geometries sent in one streaming union call.
    pub batch_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            timeout: DEFAULT_TIMEOUT,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ClientConfig {
    /// Default configuration with the address taken from `GEOMETRY_SERVICE_HOST`, if set.
    pub fn from_env() -> Self {
        Self::default().with_env_address(std::env::var(SERVICE_HOST_ENV).ok())
    }

    fn with_env_address(self, value: Option<String>) -> Self {
        match value.map(|v| v.trim().to_string()) {
            Some(address) if !address.is_empty() => self.with_address(address),
            _ => self,
        }
    }

    /// Sets the service address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Sets the deadline of every call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the streaming union batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}
