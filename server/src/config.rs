//! Command-line and environment configuration.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::error::Error;

/// Every flag can also be set through the environment variable named beside it.
#[derive(Debug, Clone, Parser)]
#[command(name = "todo-server", version, about = "HTTP CRUD service for todo items")]
pub struct Config {
    /// MongoDB connection string.
    #[arg(long, env = "TODO_MONGO_URI", default_value = "mongodb://localhost:27017")]
    pub mongo_uri: String,

    #[arg(long, env = "TODO_DATABASE", default_value = "demo_todo")]
    pub database: String,

    #[arg(long, env = "TODO_COLLECTION", default_value = "todo")]
    pub collection: String,

    #[arg(long, env = "TODO_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 9000)]
    pub port: u16,

    /// Seconds to wait for the document store before giving up at startup.
    #[arg(long, env = "TODO_CONNECT_TIMEOUT_SECS", default_value_t = 5)]
    pub connect_timeout_secs: u64,

    /// Keep todos in process memory instead of MongoDB.
    #[arg(long, env = "TODO_IN_MEMORY")]
    pub in_memory: bool,
}

impl Config {
    pub fn listen_addr(&self) -> Result<SocketAddr, Error> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| Error::InvalidAddress(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Installs the global `fmt` subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("todo_server=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
