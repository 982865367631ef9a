use clap::Parser;

use crate::config::AppConfig;

/// Command-line overrides for the server. Anything left unset falls back to
/// the environment-derived configuration.
#[derive(Debug, Parser)]
#[command(name = "company-api")]
#[command(about = "Company registry API server")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "PostgreSQL connection URL")]
    pub pgurl: Option<String>,

    #[arg(long, help = "Comma separated gates for create and delete: 1 = geo, 2 = basic")]
    pub opts: Option<String>,

    #[arg(long, help = "Port to listen on")]
    pub port: Option<u16>,
}

impl Cli {
    /// Layer the flags that were given on top of `config`
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(url) = &self.pgurl {
            config.database.url = url.clone();
        }
        if let Some(opts) = &self.opts {
            config.gates = opts.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        config
    }
}
