//! Core data types for domain probing.
//!
//! This module defines the main data structures used throughout the library:
//! name classification, SOA snapshots, expiry results and runtime configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default WHOIS server queried for registrable domains.
pub const DEFAULT_WHOIS_SERVER: &str = "whois.verisign-grs.com";

/// How a name is treated by the lookup workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Three or more labels; only DNS records are queried.
    Subdomain,
    /// Two labels or fewer; SOA and WHOIS expiry are queried.
    RegistrableDomain,
}

/// Fields of a DNS SOA answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoaSnapshot {
    /// Primary authoritative nameserver (MNAME)
    pub primary_ns: String,
    /// Responsible party mailbox (RNAME)
    pub responsible: String,
    pub serial: u32,
    pub refresh: i32,
    pub retry: i32,
    pub expire: i32,
    pub minimum_ttl: u32,
}

/// Which strategy produced a parsed expiry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMethod {
    /// One of the general ISO 8601 / WHOIS layouts matched.
    Standard,
    /// Only the strict `yyyy-MM-ddTHH` layout matched.
    Fallback,
}

/// Outcome of scanning a WHOIS response for an expiry date.
///
/// Parse failures are not represented here; they are returned as
/// [`ProbeError::ParseError`](crate::ProbeError).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpiryLookup {
    Found {
        expires_at: DateTime<Utc>,
        method: ParseMethod,
    },
    NotFound,
}

/// Expired or not, relative to a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryVerdict {
    /// Expired this many whole days ago.
    Expired { days_ago: i64 },
    /// Still registered for this many whole days.
    Active { days_left: i64 },
}

impl ExpiryVerdict {
    /// Compare an expiry instant against `now`. Equal instants count as not expired.
    pub fn evaluate(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if expires_at < now {
            Self::Expired {
                days_ago: (now - expires_at).num_days(),
            }
        } else {
            Self::Active {
                days_left: (expires_at - now).num_days(),
            }
        }
    }
}

/// Which upstream nameservers the DNS collaborator talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResolverChoice {
    /// Use the host's resolver configuration (/etc/resolv.conf etc.)
    #[default]
    System,
    Google,
    Cloudflare,
    Quad9,
}

impl std::str::FromStr for ResolverChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "system" => Ok(Self::System),
            "google" => Ok(Self::Google),
            "cloudflare" => Ok(Self::Cloudflare),
            "quad9" => Ok(Self::Quad9),
            other => Err(format!(
                "unknown resolver '{}', expected one of: system, google, cloudflare, quad9",
                other
            )),
        }
    }
}

impl std::fmt::Display for ResolverChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolverChoice::System => write!(f, "system"),
            ResolverChoice::Google => write!(f, "google"),
            ResolverChoice::Cloudflare => write!(f, "cloudflare"),
            ResolverChoice::Quad9 => write!(f, "quad9"),
        }
    }
}

/// Runtime configuration for an [`Inspector`](crate::Inspector).
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    /// WHOIS server used for every expiry query
    /// Default: whois.verisign-grs.com
    pub whois_server: String,

    /// WHOIS TCP port
    /// Default: 43
    pub whois_port: u16,

    /// Socket-level timeout for a single WHOIS exchange
    /// Default: 90 seconds
    pub whois_timeout: Duration,

    /// How long a domain lookup may run before the "still working" notice is shown
    /// Default: 60 seconds
    pub notice_after: Duration,

    /// Spinner redraw interval
    /// Default: 100 milliseconds
    pub progress_interval: Duration,

    /// Upstream DNS servers
    /// Default: system configuration
    pub resolver: ResolverChoice,

    /// Whether to draw the spinner at all
    /// Default: true
    pub show_progress: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            whois_server: DEFAULT_WHOIS_SERVER.to_string(),
            whois_port: 43,
            whois_timeout: Duration::from_secs(90),
            notice_after: Duration::from_secs(60),
            progress_interval: Duration::from_millis(100),
            resolver: ResolverChoice::System,
            show_progress: true,
        }
    }
}

impl ProbeConfig {
    /// Set the WHOIS server override.
    pub fn with_whois_server<S: Into<String>>(mut self, server: S) -> Self {
        self.whois_server = server.into();
        self
    }

    /// Set the WHOIS socket timeout.
    pub fn with_whois_timeout(mut self, timeout: Duration) -> Self {
        self.whois_timeout = timeout;
        self
    }

    /// Set the delay before the "still working" notice.
    pub fn with_notice_after(mut self, after: Duration) -> Self {
        self.notice_after = after;
        self
    }

    /// Set the upstream resolver.
    pub fn with_resolver(mut self, resolver: ResolverChoice) -> Self {
        self.resolver = resolver;
        self
    }

    /// Enable or disable the spinner.
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }
}

impl std::fmt::Display for ParseMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseMethod::Standard => write!(f, "standard"),
            ParseMethod::Fallback => write!(f, "fallback"),
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Subdomain => write!(f, "subdomain"),
            Classification::RegistrableDomain => write!(f, "domain"),
        }
    }
}
