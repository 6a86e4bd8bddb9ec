//! WHOIS protocol client.
//!
//! WHOIS (RFC 3912) is a plain TCP exchange on port 43: send the query
//! followed by CRLF, then read until the server closes the connection. The
//! response is unstructured text; picking an expiry date out of it is the
//! job of [`crate::expiry`].

use crate::error::ProbeError;
use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// Default WHOIS TCP port.
pub const WHOIS_PORT: u16 = 43;

/// WHOIS capability consumed by the inspector.
pub trait WhoisLookup: Send + Sync {
    /// Fetch the raw WHOIS text for `domain` from `server`.
    fn query(
        &self,
        domain: &str,
        server: &str,
    ) -> impl Future<Output = Result<String, ProbeError>> + Send;
}

/// WHOIS client talking directly to a server over TCP.
#[derive(Debug, Clone)]
pub struct WhoisClient {
    /// Timeout for the whole exchange (connect + write + read)
    timeout: Duration,
    port: u16,
}

impl WhoisClient {
    /// Create a new WHOIS client with default settings.
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(90),
            port: WHOIS_PORT,
        }
    }

    /// Create a new WHOIS client with custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::new()
        }
    }

    /// Use a non-standard port (handy for local test servers).
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    async fn exchange(&self, domain: &str, server: &str) -> Result<String, ProbeError> {
        let mut stream = TcpStream::connect((server, self.port)).await.map_err(|e| {
            ProbeError::whois(domain, server, format!("Failed to connect: {}", e))
        })?;

        stream
            .write_all(format!("{}\r\n", domain).as_bytes())
            .await
            .map_err(|e| ProbeError::whois(domain, server, format!("Failed to send query: {}", e)))?;

        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.map_err(|e| {
            ProbeError::whois(domain, server, format!("Failed to read response: {}", e))
        })?;

        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Default for WhoisClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WhoisLookup for WhoisClient {
    /// Single attempt, no retry; the caller decides what a failure means.
    async fn query(&self, domain: &str, server: &str) -> Result<String, ProbeError> {
        debug!("WHOIS query for {} via {}:{}", domain, server, self.port);

        let response = tokio::time::timeout(self.timeout, self.exchange(domain, server))
            .await
            .map_err(|_| ProbeError::timeout("WHOIS query", self.timeout))??;

        debug!("WHOIS response for {}: {} bytes", domain, response.len());
        Ok(response)
    }
}
