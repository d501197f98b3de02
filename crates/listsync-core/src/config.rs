//! Configuration types for the listsync system
//!
//! The daemon builds these from environment variables; libraries only ever
//! receive the already-validated structs.

use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Remote API credentials and endpoint
    pub remote: RemoteApiConfig,

    /// HTTP surface settings
    #[serde(default)]
    pub http: HttpConfig,
}

impl SyncConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.remote.validate()?;
        self.http.validate()?;
        Ok(())
    }
}

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteApiConfig {
    /// API key for the remote marketing platform
    pub api_key: String,

    /// Base URL override; when unset the client derives the endpoint from
    /// the API key
    #[serde(default)]
    pub base_url: Option<String>,
}

impl RemoteApiConfig {
    /// Validate the remote API configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_key.is_empty() {
            return Err(crate::Error::config("remote API key cannot be empty"));
        }
        if let Some(url) = &self.base_url {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(crate::Error::config(format!(
                    "remote base URL must use HTTP or HTTPS scheme, got: {url}"
                )));
            }
        }
        Ok(())
    }
}

/// HTTP surface configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Socket address the daemon binds to
    pub bind_addr: String,
}

impl HttpConfig {
    /// Validate the HTTP configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|_| {
                crate::Error::config(format!(
                    "bind address '{}' is not a valid socket address",
                    self.bind_addr
                ))
            })?;
        Ok(())
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
        }
    }
}
