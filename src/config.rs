use clap::Parser;
use serde::Deserialize;
use std::{fs, net::SocketAddr, path::Path, path::PathBuf, time::Duration};

use crate::error::{GatewayError, Result};

pub const DEFAULT_LISTEN: &str = "0.0.0.0:3000";
pub const DEFAULT_UPSTREAM: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_TOTAL_COUNT_HEADER: &str = "x-total-count";

#[derive(Parser, Debug, Default)]
#[command(name = "posts-gateway")]
#[command(about = "GraphQL facade over a REST blog-post API")]
#[command(version)]
pub struct Args {
    /// YAML configuration file; command-line flags take precedence over it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long)]
    pub listen: Option<SocketAddr>,

    /// Base URL of the upstream posts API
    #[arg(short, long)]
    pub upstream: Option<String>,

    /// Per-request timeout for upstream calls, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Print the schema SDL and exit
    #[arg(long)]
    pub print_schema: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    listen: Option<SocketAddr>,
    upstream: UpstreamFileConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UpstreamFileConfig {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    total_count_header: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub total_count_header: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        UpstreamConfig {
            base_url: DEFAULT_UPSTREAM.to_string(),
            timeout: None,
            total_count_header: DEFAULT_TOTAL_COUNT_HEADER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub listen: SocketAddr,
    pub upstream: UpstreamConfig,
}

impl GatewayConfig {
    pub fn load(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => read_config_file(path)?,
            None => FileConfig::default(),
        };

        Self::merge(args, file)
    }

    fn merge(args: &Args, file: FileConfig) -> Result<Self> {
        let listen = match args.listen.or(file.listen) {
            Some(listen) => listen,
            None => DEFAULT_LISTEN
                .parse()
                .map_err(|e| GatewayError::Config(format!("bad default listen address: {}", e)))?,
        };

        let base_url = args
            .upstream
            .clone()
            .or(file.upstream.base_url)
            .unwrap_or_else(|| DEFAULT_UPSTREAM.to_string());
        validate_base_url(&base_url)?;

        let timeout = args
            .timeout_secs
            .or(file.upstream.timeout_secs)
            .map(Duration::from_secs);

        let total_count_header = file
            .upstream
            .total_count_header
            .unwrap_or_else(|| DEFAULT_TOTAL_COUNT_HEADER.to_string());
        reqwest::header::HeaderName::from_bytes(total_count_header.as_bytes()).map_err(|e| {
            GatewayError::Config(format!(
                "invalid total-count header name {:?}: {}",
                total_count_header, e
            ))
        })?;

        Ok(GatewayConfig {
            listen,
            upstream: UpstreamConfig {
                base_url,
                timeout,
                total_count_header,
            },
        })
    }
}

fn read_config_file(path: &Path) -> Result<FileConfig> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}

fn validate_base_url(base_url: &str) -> Result<()> {
    let url = reqwest::Url::parse(base_url)
        .map_err(|e| GatewayError::Config(format!("invalid upstream URL {:?}: {}", base_url, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(GatewayError::Config(format!(
            "upstream URL must use http or https, got {:?}",
            scheme
        ))),
    }
}
