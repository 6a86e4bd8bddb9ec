//! # Domain Probe Library
//!
//! Classify a name as a subdomain or a registrable domain, then look it up:
//! DNS records for subdomains, SOA data plus the WHOIS expiry date for
//! domains.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_probe_lib::{BufferedReporter, Inspector, ProbeConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let inspector = Inspector::from_config(ProbeConfig::default())?;
//!     let out = BufferedReporter::new();
//!     inspector.handle_line("example.com", &out).await;
//!
//!     for (level, line) in out.lines() {
//!         println!("{:?}: {}", level, line);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Pieces
//!
//! - **Classifier**: label-count heuristic, see [`classify`]
//! - **Expiry extraction**: [`extract_expiry`] with a strict fallback format
//! - **Spinner**: [`Spinner`], a cooperative background progress line
//! - **Workflow**: [`Inspector`], which ties it together behind the
//!   [`DnsLookup`], [`WhoisLookup`] and [`Reporter`] traits

// Re-export main public API types and functions
// This makes them available as domain_probe_lib::TypeName
pub use checker::{Inspector, Step, STILL_WORKING_NOTICE};
pub use config::{
    load_env_config, load_env_config_from, parse_duration_string, ConfigManager,
    DefaultsConfig, EnvConfig, FileConfig,
};
pub use error::ProbeError;
pub use expiry::{extract_expiry, find_expiry_line, parse_expiry_date, EXPIRY_LABELS};
pub use output::{BufferedReporter, Level, Reporter};
pub use progress::{ProgressSink, Spinner, MIN_PROGRESS_INTERVAL};
pub use protocols::{DnsLookup, HickoryDns, WhoisClient, WhoisLookup, WHOIS_PORT};
pub use types::{
    Classification, ExpiryLookup, ExpiryVerdict, ParseMethod, ProbeConfig, ResolverChoice,
    SoaSnapshot, DEFAULT_WHOIS_SERVER,
};
pub use utils::{classify, label_count, parse_input, InputCommand, QueryTarget};

// Internal modules - these are not part of the public API
mod checker;
mod config;
mod error;
mod expiry;
mod output;
mod progress;
mod protocols;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ProbeError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
