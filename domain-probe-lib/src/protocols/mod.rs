//! Network collaborators used by the inspector.
//!
//! This module contains the DNS and WHOIS clients. Each is exposed through a
//! small trait so the lookup workflow never depends on a concrete transport.

/// DNS lookups (SOA and ANY) via hickory-resolver
pub mod dns;

/// WHOIS protocol implementation
pub mod whois;

// Re-export commonly used functions and types
pub use dns::{DnsLookup, HickoryDns};
pub use whois::{WhoisClient, WhoisLookup, WHOIS_PORT};
