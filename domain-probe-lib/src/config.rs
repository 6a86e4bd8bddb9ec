//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and `DP_*`
//! environment variables, and folding them into a [`ProbeConfig`] with
//! proper precedence rules (defaults < files < environment; CLI flags are
//! applied by the binary on top).

use crate::error::ProbeError;
use crate::progress::MIN_PROGRESS_INTERVAL;
use crate::types::{ProbeConfig, ResolverChoice};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DefaultsConfig {
    /// WHOIS server override (e.g. "whois.verisign-grs.com")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whois_server: Option<String>,

    /// WHOIS socket timeout (e.g. "90s", "2m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whois_timeout: Option<String>,

    /// Delay before the "still working" notice (e.g. "60s")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice_after: Option<String>,

    /// Spinner redraw interval (e.g. "100ms")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_interval: Option<String>,

    /// Upstream resolver: system, google, cloudflare or quad9
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolver: Option<String>,

    /// Whether to draw the spinner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<bool>,
}

impl FileConfig {
    /// Overlay the file values onto `config`.
    ///
    /// Values are validated by [`ConfigManager::load_file`], but this re-checks
    /// them so hand-built `FileConfig`s can't sneak bad durations through.
    pub fn apply_to(&self, mut config: ProbeConfig) -> Result<ProbeConfig, ProbeError> {
        let Some(defaults) = &self.defaults else {
            return Ok(config);
        };

        if let Some(server) = &defaults.whois_server {
            config.whois_server = server.trim().to_string();
        }
        if let Some(timeout) = &defaults.whois_timeout {
            config.whois_timeout = parse_duration_field("whois_timeout", timeout)?;
        }
        if let Some(after) = &defaults.notice_after {
            config.notice_after = parse_duration_field("notice_after", after)?;
        }
        if let Some(interval) = &defaults.progress_interval {
            config.progress_interval = parse_progress_interval(interval)?;
        }
        if let Some(resolver) = &defaults.resolver {
            config.resolver = resolver.parse().map_err(ProbeError::config)?;
        }
        if let Some(progress) = defaults.progress {
            config.show_progress = progress;
        }

        Ok(config)
    }
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to log which files were picked up
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// `FileError` if the file is missing or unreadable, `ConfigError` if it
    /// is not valid TOML or contains invalid values.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, ProbeError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ProbeError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ProbeError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content)?;

        // Validate the loaded configuration
        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// Files that fail to load are skipped with a warning.
    pub fn discover_and_load(&self) -> Result<FileConfig, ProbeError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        // Lowest precedence first
        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    merged_config = self.merge_configs(merged_config, config);
                    loaded_files.push(path);
                }
                Err(e) => warn!("Ignoring config file {}: {}", path.display(), e),
            }
        }

        if self.verbose {
            for path in &loaded_files {
                info!("Loaded config file {}", path.display());
            }
        }

        Ok(merged_config)
    }

    /// Get the local configuration file path.
    ///
    /// Looks for configuration files in the current directory.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./domain-probe.toml", "./.domain-probe.toml"];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Some(path.to_path_buf());
            }
        }

        None
    }

    /// Get the global configuration file path.
    ///
    /// Looks for configuration files in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        if let Some(home) = env::var_os("HOME") {
            let candidates = [".domain-probe.toml", "domain-probe.toml"];

            for candidate in &candidates {
                let path = Path::new(&home).join(candidate);
                if path.exists() {
                    return Some(path);
                }
            }
        }

        None
    }

    /// Get the XDG configuration file path.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("domain-probe").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations with proper precedence.
    ///
    /// Values from `higher` take precedence over values from `lower`.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(mut lower_defaults), Some(higher_defaults)) => {
                    if higher_defaults.whois_server.is_some() {
                        lower_defaults.whois_server = higher_defaults.whois_server;
                    }
                    if higher_defaults.whois_timeout.is_some() {
                        lower_defaults.whois_timeout = higher_defaults.whois_timeout;
                    }
                    if higher_defaults.notice_after.is_some() {
                        lower_defaults.notice_after = higher_defaults.notice_after;
                    }
                    if higher_defaults.progress_interval.is_some() {
                        lower_defaults.progress_interval = higher_defaults.progress_interval;
                    }
                    if higher_defaults.resolver.is_some() {
                        lower_defaults.resolver = higher_defaults.resolver;
                    }
                    if higher_defaults.progress.is_some() {
                        lower_defaults.progress = higher_defaults.progress;
                    }
                    Some(lower_defaults)
                }
                (None, Some(higher_defaults)) => Some(higher_defaults),
                (Some(lower_defaults), None) => Some(lower_defaults),
                (None, None) => None,
            },
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), ProbeError> {
        if let Some(defaults) = &config.defaults {
            if let Some(server) = &defaults.whois_server {
                if server.trim().is_empty() || server.contains(char::is_whitespace) {
                    return Err(ProbeError::config(format!(
                        "Invalid whois_server '{}'",
                        server
                    )));
                }
            }

            for (field, value) in [
                ("whois_timeout", &defaults.whois_timeout),
                ("notice_after", &defaults.notice_after),
            ] {
                if let Some(value) = value {
                    parse_duration_field(field, value)?;
                }
            }
            if let Some(interval) = &defaults.progress_interval {
                parse_progress_interval(interval)?;
            }

            if let Some(resolver) = &defaults.resolver {
                resolver
                    .parse::<ResolverChoice>()
                    .map_err(ProbeError::config)?;
            }
        }

        Ok(())
    }
}

/// Environment variable configuration that mirrors CLI options.
///
/// This represents configuration values that can be set via DP_* environment variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub whois_server: Option<String>,
    pub whois_timeout: Option<Duration>,
    pub notice_after: Option<Duration>,
    pub resolver: Option<ResolverChoice>,
    pub progress: Option<bool>,
    pub config: Option<String>,
}

impl EnvConfig {
    /// Overlay the environment values onto `config`.
    pub fn apply_to(&self, mut config: ProbeConfig) -> ProbeConfig {
        if let Some(server) = &self.whois_server {
            config.whois_server = server.clone();
        }
        if let Some(timeout) = self.whois_timeout {
            config.whois_timeout = timeout;
        }
        if let Some(after) = self.notice_after {
            config.notice_after = after;
        }
        if let Some(resolver) = self.resolver {
            config.resolver = resolver;
        }
        if let Some(progress) = self.progress {
            config.show_progress = progress;
        }
        config
    }
}

/// Load configuration from the process environment.
///
/// Invalid values are logged as warnings and ignored.
pub fn load_env_config(verbose: bool) -> EnvConfig {
    load_env_config_from(|key| env::var(key).ok(), verbose)
}

/// Same as [`load_env_config`] but reads variables through `lookup`.
pub fn load_env_config_from<F>(lookup: F, verbose: bool) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    // DP_WHOIS_SERVER - WHOIS server override
    if let Some(server) = lookup("DP_WHOIS_SERVER") {
        let server = server.trim();
        if !server.is_empty() {
            env_config.whois_server = Some(server.to_string());
            if verbose {
                info!("Using DP_WHOIS_SERVER={}", server);
            }
        }
    }

    // DP_WHOIS_TIMEOUT - WHOIS socket timeout
    if let Some(val) = lookup("DP_WHOIS_TIMEOUT") {
        match parse_duration_string(&val) {
            Some(timeout) => {
                env_config.whois_timeout = Some(timeout);
                if verbose {
                    info!("Using DP_WHOIS_TIMEOUT={}", val);
                }
            }
            None => warn!(
                "Invalid DP_WHOIS_TIMEOUT='{}', use format like '30s', '2m'",
                val
            ),
        }
    }

    // DP_NOTICE_AFTER - delay before the "still working" notice
    if let Some(val) = lookup("DP_NOTICE_AFTER") {
        match parse_duration_string(&val) {
            Some(after) => {
                env_config.notice_after = Some(after);
                if verbose {
                    info!("Using DP_NOTICE_AFTER={}", val);
                }
            }
            None => warn!(
                "Invalid DP_NOTICE_AFTER='{}', use format like '30s', '2m'",
                val
            ),
        }
    }

    // DP_RESOLVER - upstream DNS servers
    if let Some(val) = lookup("DP_RESOLVER") {
        match val.parse::<ResolverChoice>() {
            Ok(resolver) => {
                env_config.resolver = Some(resolver);
                if verbose {
                    info!("Using DP_RESOLVER={}", resolver);
                }
            }
            Err(e) => warn!("Invalid DP_RESOLVER: {}", e),
        }
    }

    // DP_PROGRESS - enable/disable the spinner
    if let Some(val) = lookup("DP_PROGRESS") {
        match parse_bool(&val) {
            Some(progress) => {
                env_config.progress = Some(progress);
                if verbose {
                    info!("Using DP_PROGRESS={}", progress);
                }
            }
            None => warn!("Invalid DP_PROGRESS='{}', use true/false", val),
        }
    }

    // DP_CONFIG - explicit config file
    if let Some(path) = lookup("DP_CONFIG") {
        if !path.trim().is_empty() {
            if verbose {
                info!("Using DP_CONFIG={}", path);
            }
            env_config.config = Some(path);
        }
    }

    env_config
}

/// Parse a duration string like "100ms", "5s", "2m" (bare numbers are seconds).
pub fn parse_duration_string(value: &str) -> Option<Duration> {
    let value = value.trim().to_lowercase();

    if let Some(ms) = value.strip_suffix("ms") {
        ms.trim().parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = value.strip_suffix('s') {
        secs.trim().parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(mins) = value.strip_suffix('m') {
        mins.trim()
            .parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        value.parse::<u64>().ok().map(Duration::from_secs)
    }
}

fn parse_duration_field(field: &str, value: &str) -> Result<Duration, ProbeError> {
    parse_duration_string(value).ok_or_else(|| {
        ProbeError::config(format!(
            "Invalid {} '{}'. Use format like '100ms', '30s', '2m'",
            field, value
        ))
    })
}

fn parse_progress_interval(value: &str) -> Result<Duration, ProbeError> {
    let interval = parse_duration_field("progress_interval", value)?;
    if interval < MIN_PROGRESS_INTERVAL {
        return Err(ProbeError::config(format!(
            "progress_interval '{}' is below the {:?} minimum",
            value, MIN_PROGRESS_INTERVAL
        )));
    }
    Ok(interval)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
