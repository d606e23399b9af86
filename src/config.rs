use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:9001";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Command-line flags. Each one overrides the file and environment.
#[derive(Debug, Default, Parser)]
#[command(name = "pipeline-server")]
#[command(about = "HTTP pipelining test server", long_about = None)]
pub struct Cli {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:9001
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Port to listen on (keeps the configured host)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Log filter, e.g. "debug" or "pipeline_server=trace"
    #[arg(long)]
    pub log: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Defaults, with `LISTEN` from the environment applied.
    pub fn load() -> Self {
        Self::default().with_env_listen(std::env::var("LISTEN").ok())
    }

    pub fn from_yaml(src: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(src).context("invalid configuration")
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_yaml(&src).with_context(|| format!("in {}", path.display()))
    }

    /// Full startup resolution: file (if given), then `LISTEN`, then flags.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let base = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        let cfg = base
            .with_env_listen(std::env::var("LISTEN").ok())
            .with_cli(cli);
        // Fail at startup rather than at bind time.
        cfg.socket_addr()?;
        Ok(cfg)
    }

    pub fn with_env_listen(mut self, listen: Option<String>) -> Self {
        if let Some(addr) = listen.filter(|a| !a.is_empty()) {
            self.listen_addr = addr;
        }
        self
    }

    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(addr) = &cli.listen {
            self.listen_addr = addr.clone();
        }
        if let Some(port) = cli.port {
            self.listen_addr = match self.listen_addr.parse::<SocketAddr>() {
                Ok(mut addr) => {
                    addr.set_port(port);
                    addr.to_string()
                }
                Err(_) => format!("{}:{}", host_part(&self.listen_addr), port),
            };
        }
        if let Some(level) = &cli.log {
            self.log_level = level.clone();
        }
        self
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listen_addr
            .parse()
            .with_context(|| format!("invalid listen address {:?}", self.listen_addr))
    }
}

fn host_part(addr: &str) -> &str {
    match addr.rsplit_once(':') {
        Some((host, _)) => host,
        None => addr,
    }
}
