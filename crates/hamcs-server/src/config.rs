//! Server configuration (command line, environment, `.env`).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;

use hamcs_core::MissingFieldPolicy;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "hamcs_server=info,hamcs_core=info,tower_http=info";

#[derive(Debug, Clone, Parser)]
#[command(name = "hamcs-server")]
#[command(about = "Decision memory backend for HAMCS")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "HAMCS_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// HTTP port
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Skip stored records without decision text during similarity lookups
    /// instead of failing the lookup
    #[arg(long, env = "HAMCS_SKIP_MALFORMED")]
    pub skip_malformed: bool,
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn missing_field_policy(&self) -> MissingFieldPolicy {
        if self.skip_malformed {
            MissingFieldPolicy::Skip
        } else {
            MissingFieldPolicy::FailFast
        }
    }
}
