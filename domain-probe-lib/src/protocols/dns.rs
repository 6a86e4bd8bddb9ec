//! DNS lookups backed by `hickory-resolver`.
//!
//! The workflow only needs two questions answered: the SOA record of a
//! registrable domain, and "everything" (an ANY query) for a subdomain.
//! Both are behind the [`DnsLookup`] trait so the inspector can be driven
//! by a fake resolver in tests.

use crate::error::ProbeError;
use crate::types::{ResolverChoice, SoaSnapshot};
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::TokioAsyncResolver;
use std::future::Future;
use tracing::debug;

/// DNS capability consumed by the inspector.
pub trait DnsLookup: Send + Sync {
    /// Query the SOA record set for `name`.
    ///
    /// Returns `Ok(None)` when the name exists but has no SOA answer.
    fn query_soa(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<SoaSnapshot>, ProbeError>> + Send;

    /// Query all record types for `name`, one presentation-format line per record.
    fn query_any(&self, name: &str) -> impl Future<Output = Result<Vec<String>, ProbeError>> + Send;
}

/// [`DnsLookup`] implementation using a tokio-based hickory resolver.
#[derive(Clone)]
pub struct HickoryDns {
    resolver: TokioAsyncResolver,
}

impl HickoryDns {
    /// Build a resolver for the chosen upstream.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::NetworkError` if the system resolver configuration
    /// cannot be read (only possible with `ResolverChoice::System`).
    pub fn new(choice: ResolverChoice) -> Result<Self, ProbeError> {
        let resolver = match choice {
            ResolverChoice::System => TokioAsyncResolver::tokio_from_system_conf()?,
            ResolverChoice::Google => {
                TokioAsyncResolver::tokio(ResolverConfig::google(), ResolverOpts::default())
            }
            ResolverChoice::Cloudflare => {
                TokioAsyncResolver::tokio(ResolverConfig::cloudflare(), ResolverOpts::default())
            }
            ResolverChoice::Quad9 => {
                TokioAsyncResolver::tokio(ResolverConfig::quad9(), ResolverOpts::default())
            }
        };

        debug!("DNS resolver ready ({})", choice);
        Ok(Self { resolver })
    }
}

impl DnsLookup for HickoryDns {
    async fn query_soa(&self, name: &str) -> Result<Option<SoaSnapshot>, ProbeError> {
        debug!("SOA query for {}", name);
        match self.resolver.soa_lookup(name).await {
            Ok(lookup) => Ok(lookup.iter().next().map(|soa| SoaSnapshot {
                primary_ns: soa.mname().to_string(),
                responsible: soa.rname().to_string(),
                serial: soa.serial(),
                refresh: soa.refresh(),
                retry: soa.retry(),
                expire: soa.expire(),
                minimum_ttl: soa.minimum(),
            })),
            Err(e) if is_no_records(&e) => Ok(None),
            Err(e) => Err(ProbeError::dns(name, e.to_string())),
        }
    }

    async fn query_any(&self, name: &str) -> Result<Vec<String>, ProbeError> {
        debug!("ANY query for {}", name);
        match self.resolver.lookup(name, RecordType::ANY).await {
            Ok(lookup) => Ok(lookup.record_iter().map(|r| r.to_string()).collect()),
            Err(e) if is_no_records(&e) => Ok(Vec::new()),
            Err(e) => Err(ProbeError::dns(name, e.to_string())),
        }
    }
}

fn is_no_records(err: &ResolveError) -> bool {
    matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. })
}
