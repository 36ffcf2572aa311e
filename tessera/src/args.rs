use std::path::PathBuf;

use clap::Parser;

/// Tessera generation gateway
#[derive(Debug, Parser)]
#[command(name = "tessera", about = "Multi-provider image and video generation gateway")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "tessera.toml", env = "TESSERA_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "TESSERA_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
