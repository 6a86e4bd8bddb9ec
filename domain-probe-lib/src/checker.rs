//! Per-input lookup workflow.
//!
//! This module provides the [`Inspector`], which takes one line of input
//! through validation, classification and the matching lookup path:
//!
//! - subdomains get a single DNS ANY query, every record printed;
//! - registrable domains get an SOA query followed by a WHOIS expiry lookup,
//!   raced against an advisory timer that only prints a "still working"
//!   notice and never cancels the lookup.
//!
//! A spinner runs for the duration of each lookup and is always finished
//! before the workflow returns.

use crate::error::ProbeError;
use crate::expiry::extract_expiry;
use crate::output::Reporter;
use crate::progress::Spinner;
use crate::protocols::{DnsLookup, HickoryDns, WhoisClient, WhoisLookup};
use crate::types::{
    Classification, ExpiryLookup, ExpiryVerdict, ParseMethod, ProbeConfig, SoaSnapshot,
};
use crate::utils::{parse_input, InputCommand, QueryTarget};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Shown once when a domain lookup runs past `ProbeConfig::notice_after`.
pub const STILL_WORKING_NOTICE: &str = "Querying the domain expiry date, please wait...";

/// What the read loop should do after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Exit,
}

/// Runs the lookup workflow for one input at a time.
///
/// # Example
///
/// ```rust,no_run
/// use domain_probe_lib::{BufferedReporter, Inspector, ProbeConfig, Step};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let inspector = Inspector::from_config(ProbeConfig::default())?;
///     let out = BufferedReporter::new();
///     assert_eq!(inspector.handle_line("example.com", &out).await, Step::Continue);
///     Ok(())
/// }
/// ```
pub struct Inspector<D, W> {
    config: ProbeConfig,
    dns: D,
    whois: W,
}

impl Inspector<HickoryDns, WhoisClient> {
    /// Create an inspector backed by hickory-resolver and a TCP WHOIS client.
    ///
    /// # Errors
    ///
    /// Fails if the DNS resolver cannot be constructed.
    pub fn from_config(config: ProbeConfig) -> Result<Self, ProbeError> {
        let dns = HickoryDns::new(config.resolver)?;
        let whois = WhoisClient::with_timeout(config.whois_timeout).with_port(config.whois_port);
        Ok(Self::with_clients(config, dns, whois))
    }
}

impl<D: DnsLookup, W: WhoisLookup> Inspector<D, W> {
    /// Create an inspector with explicit collaborators.
    pub fn with_clients(config: ProbeConfig, dns: D, whois: W) -> Self {
        Self { config, dns, whois }
    }

    /// Validate one line of input and run the workflow for it.
    ///
    /// Input errors are reported and the loop continues; `exit` in any case
    /// returns [`Step::Exit`] without printing anything.
    pub async fn handle_line<R: Reporter>(&self, line: &str, out: &R) -> Step {
        match parse_input(line) {
            Ok(InputCommand::Exit) => Step::Exit,
            Ok(InputCommand::Lookup(target)) => {
                self.inspect(&target, out).await;
                Step::Continue
            }
            Err(ProbeError::InvalidDomain { reason, .. }) => {
                out.error(&reason);
                Step::Continue
            }
            Err(e) => {
                out.error(&e.to_string());
                Step::Continue
            }
        }
    }

    /// Run the lookup for a validated target, with a spinner while it is outstanding.
    pub async fn inspect<R: Reporter>(&self, target: &QueryTarget, out: &R) {
        let classification = target.classification();
        info!("Inspecting {} as {}", target.name(), classification);

        let spinner = if self.config.show_progress {
            out.progress_sink()
                .map(|sink| Spinner::start(sink, self.config.progress_interval))
        } else {
            None
        };

        match classification {
            Classification::Subdomain => self.check_dns_records(target.name(), out).await,
            Classification::RegistrableDomain => {
                self.check_domain_details(target.name(), out).await
            }
        }

        if let Some(spinner) = spinner {
            spinner.finish().await;
        }
    }

    /// Subdomain path: one ANY query, every record on its own line.
    async fn check_dns_records<R: Reporter>(&self, name: &str, out: &R) {
        match self.dns.query_any(name).await {
            Ok(records) => {
                out.plain("");
                out.info(&format!("--- DNS records for {} ---", name));
                if records.is_empty() {
                    out.info("No records returned.");
                }
                for record in &records {
                    out.plain(record);
                }
                out.success("DNS records retrieved successfully.");
            }
            Err(e) => {
                warn!("DNS query for {} failed: {}", name, e);
                out.plain("");
                out.error(&format!("Error while retrieving DNS records: {}", e));
            }
        }
    }

    /// Domain path: race the detail lookup against the notice timer.
    async fn check_domain_details<R: Reporter>(&self, name: &str, out: &R) {
        let details = self.domain_details(name, out);
        tokio::pin!(details);

        let result = tokio::select! {
            biased;
            res = &mut details => res,
            _ = tokio::time::sleep(self.config.notice_after) => {
                info!("{} still running after {:?}", name, self.config.notice_after);
                out.info(STILL_WORKING_NOTICE);
                details.await
            }
        };

        if let Err(e) = result {
            warn!("Domain lookup for {} failed: {}", name, e);
            out.plain("");
            out.error(&format!("Error while retrieving domain information: {}", e));
        }
    }

    /// SOA section followed by the WHOIS expiry section. The first failure ends the lookup.
    async fn domain_details<R: Reporter>(&self, name: &str, out: &R) -> Result<(), ProbeError> {
        out.plain("");
        out.info("--- DNS SOA records ---");

        if let Some(soa) = self.dns.query_soa(name).await? {
            print_soa(name, &soa, out);
        } else {
            debug!("No SOA record for {}", name);
        }

        out.plain("");
        out.info("--- Domain expiry date ---");

        match self.expiry_for(name).await? {
            ExpiryLookup::Found { expires_at, method } => {
                report_expiry(name, expires_at, method, Utc::now(), out);
            }
            ExpiryLookup::NotFound => {
                out.error(&format!("No expiry information found for {}.", name));
            }
        }

        Ok(())
    }

    /// Query the configured WHOIS server once and extract the expiry date.
    pub async fn expiry_for(&self, name: &str) -> Result<ExpiryLookup, ProbeError> {
        let raw = self.whois.query(name, &self.config.whois_server).await?;
        extract_expiry(&raw)
    }
}

fn print_soa<R: Reporter>(name: &str, soa: &SoaSnapshot, out: &R) {
    out.plain(&format!("Domain: {}", name));
    out.plain(&format!("Primary Name Server: {}", soa.primary_ns));
    out.plain(&format!("Responsible Email: {}", soa.responsible));
    out.plain(&format!("Serial Number: {}", soa.serial));
    out.plain(&format!("Refresh Rate: {}", soa.refresh));
    out.plain(&format!("Retry Rate: {}", soa.retry));
    out.plain(&format!("Expire Rate: {}", soa.expire));
    out.plain(&format!("Minimum TTL: {}", soa.minimum_ttl));
}

fn report_expiry<R: Reporter>(
    name: &str,
    expires_at: DateTime<Utc>,
    method: ParseMethod,
    now: DateTime<Utc>,
    out: &R,
) {
    let date = expires_at.format("%Y-%m-%d %H:%M:%S UTC");

    match method {
        ParseMethod::Standard => {
            out.success(&format!("Date parsed with the standard parser: {}", date))
        }
        ParseMethod::Fallback => {
            out.success(&format!("Date parsed with the strict fallback format: {}", date))
        }
    }

    match ExpiryVerdict::evaluate(expires_at, now) {
        ExpiryVerdict::Expired { days_ago } => out.error(&format!(
            "{} has expired. ({}, {} days ago)",
            name, date, days_ago
        )),
        ExpiryVerdict::Active { days_left } => out.success(&format!(
            "{} has not expired. Expiry date: {} ({} days left)",
            name, date, days_left
        )),
    }
}
