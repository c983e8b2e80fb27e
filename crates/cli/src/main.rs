//! Relay DNS server binary.
//!
//! Wires the zone store, response cache, racing resolver and resolution
//! engine together, then runs the DNS listeners and the HTTP debug endpoint
//! until a shutdown signal arrives.

mod bootstrap;
mod server;

use clap::Parser;
use relay_dns_api::AppState;
use relay_dns_application::ports::{ResponseCache, UpstreamResolver, ZoneReloader};
use relay_dns_application::use_cases::{GetServerStatsUseCase, ReloadZonesUseCase};
use relay_dns_domain::{CliOverrides, Config};
use relay_dns_infrastructure::dns::{
    DnsRequestHandler, HealthMonitor, MessageCache, QueryMetrics, RacingResolver,
    ResolutionEngine, StatsCollector, ZoneStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "relay-dns")]
#[command(version)]
#[command(about = "Forwarding DNS server with local zone overrides and a racing upstream resolver")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Directory scanned for *.dns-conf zone files
    #[arg(short = 'd', long)]
    conf_dir: Option<String>,

    /// Address the DNS listeners bind to (UDP and TCP)
    #[arg(short, long)]
    addr: Option<String>,

    /// Address of the HTTP debug endpoint
    #[arg(long)]
    http_addr: Option<String>,

    /// Seconds an upstream answer stays fresh in the cache
    #[arg(long)]
    cache_ttl: Option<u64>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long)]
    log_level: Option<String>,
}

impl Cli {
    fn into_overrides(self) -> (Option<String>, CliOverrides) {
        let overrides = CliOverrides {
            conf_dir: self.conf_dir,
            bind_addr: self.addr,
            http_addr: self.http_addr,
            cache_ttl: self.cache_ttl,
            log_level: self.log_level,
        };
        (self.config, overrides)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config_path, overrides) = Cli::parse().into_overrides();
    let config = Config::load(config_path.as_deref(), overrides)?;

    bootstrap::logging::init_logging(&config);

    info!(version = env!("CARGO_PKG_VERSION"), "Relay DNS starting");

    // Zone files first; a resolv.conf found alongside them overrides the
    // configured one.
    let (zones, zone_resolv_conf) = ZoneStore::load(&config.zone.conf_dir);
    let zones = Arc::new(zones);

    let resolv_conf =
        zone_resolv_conf.unwrap_or_else(|| PathBuf::from(&config.upstream.resolv_conf));
    let resolver = Arc::new(RacingResolver::from_file(&resolv_conf)?);
    info!(
        resolv_conf = %resolv_conf.display(),
        nameservers = ?resolver.nameserver_list(),
        "Upstream resolver configured"
    );

    let cache: Arc<dyn ResponseCache> = Arc::new(MessageCache::new(&config.cache));
    let upstream: Arc<dyn UpstreamResolver> = resolver.clone();
    let engine = Arc::new(ResolutionEngine::new(
        Arc::clone(&zones),
        Arc::clone(&cache),
        upstream,
    ));

    let metrics = QueryMetrics::new();
    let _sampler = metrics.spawn_sampler();

    let health = HealthMonitor::new(resolver.nameserver_list().to_vec());
    health.spawn();

    let stats = Arc::new(StatsCollector::new(
        Arc::clone(&zones),
        Arc::clone(&cache),
        Arc::clone(&metrics),
        Arc::clone(&health),
    ));
    let reloader: Arc<dyn ZoneReloader> = Arc::clone(&zones) as Arc<dyn ZoneReloader>;
    let state = AppState {
        get_stats: Arc::new(GetServerStatsUseCase::new(stats)),
        reload_zones: Arc::new(ReloadZonesUseCase::new(reloader)),
    };

    let handler = DnsRequestHandler::new(engine, Arc::clone(&metrics));

    let dns_addr = config.server.bind_addr.clone();
    tokio::spawn(async move {
        if let Err(e) = server::dns::start_dns_server(dns_addr, handler).await {
            error!(error = %e, "DNS server terminated");
            std::process::exit(1);
        }
    });

    let http_addr = config.server.http_addr.clone();
    tokio::spawn(async move {
        if let Err(e) = server::http::start_http_server(http_addr, state).await {
            error!(error = %e, "HTTP debug endpoint terminated");
        }
    });

    shutdown_signal().await;
    info!("Shutdown signal received, exiting");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
