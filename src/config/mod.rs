//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::infra::error::InfraError;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "vitrina";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 4000;
const DEFAULT_GRACEFUL_SHUTDOWN_SECS: u64 = 30;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 15;
const DEFAULT_COMPANY_CODE: i64 = 1;
const DEFAULT_SESSION_TTL_MINUTES: u64 = 60;
const DEFAULT_SESSION_SWEEP_INTERVAL_SECS: u64 = 300;
const DEFAULT_CACHE_SWEEP_INTERVAL_SECS: u64 = 60;

/// Command-line arguments for the Vitrina binary.
#[derive(Debug, Parser)]
#[command(name = "vitrina", version, about = "Vitrina storefront server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "VITRINA_CONFIG_FILE", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the Vitrina HTTP service.
    Serve(ServeArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the upstream catalog API base URL.
    #[arg(long = "upstream-base-url", value_name = "URL", value_hint = ValueHint::Url)]
    pub upstream_base_url: Option<String>,

    /// Override the storefront company code.
    #[arg(long = "upstream-company-code", value_name = "CODE")]
    pub upstream_company_code: Option<i64>,

    /// Toggle the object cache.
    #[arg(
        long = "cache-enabled",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub cache_enabled: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub upstream: UpstreamSettings,
    pub cache: CacheSettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub graceful_shutdown_seconds: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            graceful_shutdown_seconds: DEFAULT_GRACEFUL_SHUTDOWN_SECS,
        }
    }
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, InfraError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|err| {
                InfraError::configuration(format!(
                    "invalid server address `{}:{}`: {err}",
                    self.host, self.port
                ))
            })
    }

    pub fn graceful_shutdown(&self) -> Duration {
        Duration::from_secs(self.graceful_shutdown_seconds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl LoggingSettings {
    pub fn level_filter(&self) -> Result<LevelFilter, InfraError> {
        LevelFilter::from_str(&self.level).map_err(|err| {
            InfraError::configuration(format!("invalid log level `{}`: {err}", self.level))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    /// Base URL of the remote catalog API.
    pub base_url: String,
    /// Company whose storefront this instance serves.
    pub company_code: i64,
    pub timeout_secs: u64,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5200/api".to_string(),
            company_code: DEFAULT_COMPANY_CODE,
            timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
        }
    }
}

impl UpstreamSettings {
    pub fn base_url(&self) -> Result<Url, InfraError> {
        Url::parse(&self.base_url).map_err(|err| {
            InfraError::configuration(format!(
                "invalid upstream base url `{}`: {err}",
                self.base_url
            ))
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub sweep_interval_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            sweep_interval_secs: DEFAULT_CACHE_SWEEP_INTERVAL_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HS256 secret shared with the upstream token issuer.
    pub jwt_secret: String,
    pub session_ttl_minutes: u64,
    pub session_sweep_interval_secs: u64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            session_ttl_minutes: DEFAULT_SESSION_TTL_MINUTES,
            session_sweep_interval_secs: DEFAULT_SESSION_SWEEP_INTERVAL_SECS,
        }
    }
}

impl AuthSettings {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_minutes * 60)
    }

    pub fn session_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session_sweep_interval_secs.max(1))
    }
}

/// Parse the command line and load settings with the standard precedence.
pub fn load_with_cli() -> Result<(CliArgs, Settings), InfraError> {
    let cli = CliArgs::parse();
    let settings = load(&cli)?;
    Ok((cli, settings))
}

/// Load settings: defaults file, local file, explicit file, environment, then
/// CLI overrides on top.
pub fn load(cli: &CliArgs) -> Result<Settings, InfraError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = &cli.config_file {
        builder = builder.add_source(File::from(path.clone()));
    }

    builder = builder.add_source(
        Environment::with_prefix("VITRINA")
            .separator("__")
            .try_parsing(true),
    );

    let mut settings: Settings = builder
        .build()
        .and_then(|config| config.try_deserialize())
        .map_err(|err| InfraError::configuration(err.to_string()))?;

    if let Some(Command::Serve(args)) = &cli.command {
        apply_serve_overrides(&mut settings, &args.overrides);
    }

    Ok(settings)
}

fn apply_serve_overrides(settings: &mut Settings, overrides: &ServeOverrides) {
    if let Some(host) = &overrides.server_host {
        settings.server.host = host.clone();
    }
    if let Some(port) = overrides.server_port {
        settings.server.port = port;
    }
    if let Some(seconds) = overrides.server_graceful_shutdown_seconds {
        settings.server.graceful_shutdown_seconds = seconds;
    }
    if let Some(level) = &overrides.log_level {
        settings.logging.level = level.clone();
    }
    if let Some(json) = overrides.log_json {
        settings.logging.format = if json {
            LogFormat::Json
        } else {
            LogFormat::Compact
        };
    }
    if let Some(url) = &overrides.upstream_base_url {
        settings.upstream.base_url = url.clone();
    }
    if let Some(code) = overrides.upstream_company_code {
        settings.upstream.company_code = code;
    }
    if let Some(enabled) = overrides.cache_enabled {
        settings.cache.enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, DEFAULT_PORT);
        assert!(settings.server.bind_addr().is_ok());
        assert!(settings.upstream.base_url().is_ok());
        assert!(settings.cache.enabled);
        assert_eq!(settings.auth.session_ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn serve_overrides_take_precedence() {
        let mut settings = Settings::default();
        apply_serve_overrides(
            &mut settings,
            &ServeOverrides {
                server_port: Some(8080),
                log_level: Some("debug".to_string()),
                log_json: Some(true),
                upstream_company_code: Some(9),
                cache_enabled: Some(false),
                ..Default::default()
            },
        );

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.upstream.company_code, 9);
        assert!(!settings.cache.enabled);
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let logging = LoggingSettings {
            level: "noisy".to_string(),
            ..Default::default()
        };
        assert!(logging.level_filter().is_err());
    }
}
