use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::roots::ROOT_SERVERS;

pub const DEFAULT_PORT: u16 = 4321;
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_DEPTH: usize = 8;
pub const DEFAULT_MAX_REFERRALS: usize = 16;
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Runtime settings of the server, resolver and cache
#[derive(Debug, Clone)]
pub struct Config {
    /// Local address the server answers queries on
    pub listen: SocketAddr,
    /// Servers a top-level lookup starts from, one picked at random
    pub root_servers: Vec<Ipv4Addr>,
    /// Longest wait for one upstream response, `None` waits forever
    pub upstream_timeout: Option<Duration>,
    /// How many CNAME chases and glueless lookups may nest
    pub max_depth: usize,
    /// How many referrals one lookup may follow, so referral cycles end
    pub max_referrals: usize,
    pub sweep_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen: SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), DEFAULT_PORT),
            root_servers: ROOT_SERVERS.to_vec(),
            upstream_timeout: Some(DEFAULT_UPSTREAM_TIMEOUT),
            max_depth: DEFAULT_MAX_DEPTH,
            max_referrals: DEFAULT_MAX_REFERRALS,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}
