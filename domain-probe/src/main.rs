//! Domain Probe CLI Application
//!
//! Interactive front end for domain-probe-lib: reads names one per line,
//! prints DNS records for subdomains and SOA data plus the WHOIS expiry date
//! for registrable domains.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use domain_probe_lib::{
    load_env_config, parse_duration_string, ConfigManager, DnsLookup, Inspector, ProbeConfig,
    ResolverChoice, Reporter, Step, WhoisLookup,
};
use std::io::BufRead;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use ui::{ConsoleReporter, FAREWELL};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domain-probe
#[derive(Parser, Debug)]
#[command(name = "domain-probe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Sai Dutt G.V <gvs46@protonmail.com>")]
#[command(about = "Check DNS records for subdomains and WHOIS expiry for domains")]
#[command(
    long_about = "Check DNS records for subdomains and SOA data plus WHOIS expiry for domains.\n\nWithout NAMES an interactive prompt is started; type 'exit' to quit."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Names to check once, then exit (interactive prompt when omitted)
    #[arg(value_name = "NAMES", help_heading = "Input")]
    pub names: Vec<String>,

    /// WHOIS server queried for domain expiry
    #[arg(long = "whois-server", value_name = "HOST", help_heading = "Lookup")]
    pub whois_server: Option<String>,

    /// Show a "still working" notice after this long (e.g. 60s, 2m)
    #[arg(
        long = "notice-after",
        value_name = "DURATION",
        value_parser = parse_duration_arg,
        help_heading = "Lookup"
    )]
    pub notice_after: Option<Duration>,

    /// Upstream DNS resolver: system, google, cloudflare, quad9
    #[arg(long = "resolver", value_name = "NAME", help_heading = "Lookup")]
    pub resolver: Option<ResolverChoice>,

    /// Don't draw the progress spinner
    #[arg(long = "no-progress", help_heading = "Output")]
    pub no_progress: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Show debug logging on stderr
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

fn parse_duration_arg(value: &str) -> Result<Duration, String> {
    parse_duration_string(value)
        .ok_or_else(|| format!("invalid duration '{}', use format like '30s', '2m'", value))
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_tracing(&args);

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Install the stderr tracing subscriber. `RUST_LOG` wins over the flags.
fn init_tracing(args: &Args) {
    let default_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(&args)?;
    tracing::debug!("Effective configuration: {:?}", config);

    let out = ConsoleReporter::new(config.show_progress);
    let inspector = Inspector::from_config(config)?;

    if args.names.is_empty() {
        interactive_loop(&inspector, &out, std::io::stdin().lock()).await?;
    } else {
        run_names(&inspector, &out, &args.names).await;
    }

    out.success(FAREWELL);
    Ok(())
}

/// Prompt, read one line, run it; until `exit` or end of input.
async fn interactive_loop<D, W, I>(
    inspector: &Inspector<D, W>,
    out: &ConsoleReporter,
    mut input: I,
) -> Result<(), std::io::Error>
where
    D: DnsLookup,
    W: WhoisLookup,
    I: BufRead,
{
    let mut line = String::new();

    loop {
        out.prompt();
        line.clear();
        if input.read_line(&mut line)? == 0 {
            // End of input behaves like `exit`.
            out.plain("");
            break;
        }

        if inspector.handle_line(&line, out).await == Step::Exit {
            break;
        }
    }

    Ok(())
}

/// One-shot mode: run each name through the same validation as the prompt.
async fn run_names<D, W>(inspector: &Inspector<D, W>, out: &ConsoleReporter, names: &[String])
where
    D: DnsLookup,
    W: WhoisLookup,
{
    for name in names {
        if inspector.handle_line(name, out).await == Step::Exit {
            break;
        }
    }
}

/// Build the effective configuration.
///
/// Precedence: defaults < config files < DP_* environment < CLI flags.
fn build_config(args: &Args) -> Result<ProbeConfig, Box<dyn std::error::Error>> {
    let env_config = load_env_config(args.verbose);
    let manager = ConfigManager::new(args.verbose);

    // An explicit file must exist; discovered files are optional.
    let explicit = args.config.clone().or_else(|| env_config.config.clone());
    let file_config = match explicit {
        Some(path) => manager.load_file(path)?,
        None => manager.discover_and_load()?,
    };

    let config = file_config.apply_to(ProbeConfig::default())?;
    let config = env_config.apply_to(config);
    Ok(apply_cli_args_to_config(config, args))
}

/// Apply CLI arguments to config (highest precedence).
///
/// Boolean flags only ever switch things off, so an unset flag never
/// overrides a file or environment value.
fn apply_cli_args_to_config(mut config: ProbeConfig, args: &Args) -> ProbeConfig {
    if let Some(server) = &args.whois_server {
        config.whois_server = server.trim().to_string();
    }
    if let Some(after) = args.notice_after {
        config.notice_after = after;
    }
    if let Some(resolver) = args.resolver {
        config.resolver = resolver;
    }
    if args.no_progress {
        config.show_progress = false;
    }
    config
}
