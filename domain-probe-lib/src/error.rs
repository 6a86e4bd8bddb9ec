//! Error handling for domain probing operations.
//!
//! This module defines a single error type that covers the ways a probe can
//! fail, from bad input and configuration to DNS, WHOIS and date parsing issues.

use std::fmt;

/// Main error type for domain probing operations.
///
/// Every failure inside a per-input workflow is surfaced as one of these values
/// and reported to the user; none of them is fatal to the read loop.
#[derive(Debug, Clone)]
pub enum ProbeError {
    /// Invalid domain name format
    InvalidDomain { domain: String, reason: String },

    /// DNS resolver failures (NXDOMAIN is not included, see `DnsLookup::query_soa`)
    DnsError { domain: String, message: String },

    /// WHOIS query failures
    WhoisError {
        domain: String,
        server: String,
        message: String,
    },

    /// Resolver setup failures (unreadable system configuration)
    NetworkError {
        message: String,
        source: Option<String>,
    },

    /// An expiry field was found but could not be parsed
    ParseError { message: String, content: String },

    /// Configuration errors (invalid settings, unreadable TOML, etc.)
    ConfigError { message: String },

    /// File I/O errors when reading configuration
    FileError { path: String, message: String },

    /// Timeout errors when operations take too long
    Timeout {
        operation: String,
        duration: std::time::Duration,
    },
}

impl ProbeError {
    /// Create a new invalid domain error.
    pub fn invalid_domain<D: Into<String>, R: Into<String>>(domain: D, reason: R) -> Self {
        Self::InvalidDomain {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Create a new DNS error.
    pub fn dns<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::DnsError {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a new WHOIS error.
    pub fn whois<D: Into<String>, S: Into<String>, M: Into<String>>(
        domain: D,
        server: S,
        message: M,
    ) -> Self {
        Self::WhoisError {
            domain: domain.into(),
            server: server.into(),
            message: message.into(),
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a new parse error for an unparsable expiry value.
    pub fn parse<M: Into<String>, C: Into<String>>(message: M, content: C) -> Self {
        Self::ParseError {
            message: message.into(),
            content: content.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDomain { domain, reason } => {
                write!(f, "Invalid domain '{}': {}", domain, reason)
            }
            Self::DnsError { domain, message } => {
                write!(f, "DNS error for '{}': {}", domain, message)
            }
            Self::WhoisError {
                domain,
                server,
                message,
            } => {
                write!(f, "WHOIS error for '{}' via {}: {}", domain, server, message)
            }
            Self::NetworkError { message, source } => {
                if let Some(source) = source {
                    write!(f, "Network error: {} (source: {})", message, source)
                } else {
                    write!(f, "Network error: {}", message)
                }
            }
            Self::ParseError { message, content } => {
                write!(f, "Parse error: {} ('{}')", message, content)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
        }
    }
}

impl std::error::Error for ProbeError {}

impl From<hickory_resolver::error::ResolveError> for ProbeError {
    fn from(err: hickory_resolver::error::ResolveError) -> Self {
        Self::network_with_source("DNS resolution failed", err.to_string())
    }
}

impl From<toml::de::Error> for ProbeError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError {
            message: format!("Failed to parse TOML configuration: {}", err),
        }
    }
}
