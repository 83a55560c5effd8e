use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::error::{Error, Result};

/// Process configuration for the cinema booking server.
///
/// Values are taken from CLI flags, falling back to environment
/// variables (`CINEMA_BIND_ADDR`, `CINEMA_SEED_PATH`) when a flag is
/// omitted, so the process can be configured entirely through the
/// environment in containers or CI where passing flags is awkward.
#[derive(Debug, Parser)]
#[command(name = "cinema-server", about = "In-memory cinema seat-booking service")]
pub struct Cli {
    /// Address to bind the HTTP listener to.
    #[arg(long, env = "CINEMA_BIND_ADDR")]
    pub bind_addr: Option<SocketAddr>,

    /// Optional JSON seed file (movies/theaters/assignments) loaded at startup.
    #[arg(long, env = "CINEMA_SEED_PATH")]
    pub seed_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub seed_path: Option<PathBuf>,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let bind_addr = match cli.bind_addr {
            Some(addr) => addr,
            None => "127.0.0.1:8080".parse().map_err(|e| Error::Config(format!("invalid default bind address: {e}")))?,
        };

        Ok(Config { bind_addr, seed_path: cli.seed_path })
    }
}
