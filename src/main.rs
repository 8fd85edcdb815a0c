use std::net::SocketAddr;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::{error, info};
use recursor::{Config, Server};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "recursor")]
#[command(version)]
#[command(about = "Recursive DNS resolver and caching nameserver")]
struct Cli {
    /// Address to answer queries on
    #[arg(short = 'l', long, default_value = "0.0.0.0:4321")]
    listen: SocketAddr,

    /// Seconds to wait for an upstream server, 0 waits forever
    #[arg(short = 't', long, default_value_t = 5)]
    timeout_secs: u64,

    /// How many CNAME chases and glueless lookups may nest
    #[arg(long)]
    max_depth: Option<usize>,

    /// How many referrals a single lookup may follow
    #[arg(long)]
    max_referrals: Option<usize>,

    /// Log level (trace, debug, info, warn, error), overrides RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config {
            listen: self.listen,
            ..Config::default()
        };
        config.upstream_timeout = match self.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(max_referrals) = self.max_referrals {
            config.max_referrals = max_referrals;
        }
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let env = env_logger::Env::default().default_filter_or("info");
    let mut logger = env_logger::Builder::from_env(env);
    if let Some(ref level) = cli.log_level {
        logger.parse_filters(level);
    }
    logger.init();

    let config = cli.config();
    let server = match Server::bind(&config) {
        Ok(server) => server,
        Err(err) => {
            error!("couldn't bind {}: {}", config.listen, err);
            return ExitCode::FAILURE;
        }
    };

    let shutdown = CancellationToken::new();
    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupted");
                ctrl_c.cancel();
            }
            Err(err) => error!("couldn't listen for ctrl-c: {}", err),
        }
    });

    match server.run(shutdown).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("server failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
