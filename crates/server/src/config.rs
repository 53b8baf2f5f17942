//! Server settings from flags or environment.

use clap::Parser;
use std::net::SocketAddr;

/// apptmerge-server - merge appointment and remarks spreadsheets over HTTP
#[derive(Debug, Clone, Parser)]
#[command(name = "apptmerge-server")]
#[command(version, about = "Merge appointment and remarks spreadsheets over HTTP", long_about = None)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "APPTMERGE_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Merged results kept in memory before the oldest is evicted
    #[arg(long, env = "APPTMERGE_MAX_RESULTS", default_value_t = 64)]
    pub max_results: usize,

    /// Largest accepted upload request, in megabytes
    #[arg(long, env = "APPTMERGE_MAX_UPLOAD_MB", default_value_t = 16)]
    pub max_upload_mb: usize,
}

impl ServerConfig {
    /// Request body limit in bytes.
    #[must_use]
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            max_results: 64,
            max_upload_mb: 16,
        }
    }
}
