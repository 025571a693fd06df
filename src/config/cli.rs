//! Command-line flags.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{read_config, ConfigError};
use crate::config::schema::{GatewayConfig, Mode};
use crate::config::validation::validate_config;

#[derive(Debug, Parser)]
#[command(name = "ssr-gateway")]
#[command(about = "Language-aware SSR gateway for the frontend", long_about = None)]
pub struct Cli {
    /// Run in development mode (proxy to the frontend dev server)
    #[arg(long)]
    pub dev: bool,

    /// Port to run the server on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory of <lang>.json translation files
    #[arg(long)]
    pub locales: Option<PathBuf>,

    /// Built frontend directory served in production mode
    #[arg(long)]
    pub dist: Option<PathBuf>,

    /// Frontend dev server origin
    #[arg(long)]
    pub dev_origin: Option<String>,
}

impl Cli {
    /// Build the effective configuration: defaults, then file, then flags.
    pub fn resolve(&self) -> Result<GatewayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => GatewayConfig::default(),
        };
        self.apply(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    /// Overlay flags that were given on the command line.
    pub fn apply(&self, config: &mut GatewayConfig) {
        if self.dev {
            config.mode = Mode::Dev;
        }
        if let Some(port) = self.port {
            let current = config.listener.bind_address.parse::<SocketAddr>();
            config.listener.bind_address = match current {
                Ok(mut addr) => {
                    addr.set_port(port);
                    addr.to_string()
                }
                Err(_) => format!("0.0.0.0:{port}"),
            };
        }
        if let Some(locales) = &self.locales {
            config.translations.locales_dir = locales.clone();
        }
        if let Some(dist) = &self.dist {
            config.frontend.dist_dir = dist.clone();
        }
        if let Some(origin) = &self.dev_origin {
            config.frontend.dev_origin = origin.clone();
        }
    }
}
