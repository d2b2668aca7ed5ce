mod cli;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use wdlconfig::Config;
use wdlcontrol::{FolderFilter, SnapshotCache, UpstreamFolderSource};
use wdlserver::{ListingState, LoggingOptions, Server, init_logging, router};
use wdlupnp::ContentDirectoryClient;

use crate::cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // ========== PHASE 1 : Configuration ==========
    let config = Config::load_config(args.config_dir.as_deref().unwrap_or(""))?;

    init_logging(LoggingOptions {
        min_level: config.log_min_level(),
        enable_console: config.log_enable_console(),
    })?;
    info!(config_dir = config.config_dir(), "⚙️ Configuration loaded");

    // La ligne de commande prime sur la configuration
    let upstream = args
        .minidlna
        .unwrap_or_else(|| config.upstream_base_url());
    let listen_addr = args.listen_addr.unwrap_or_else(|| config.listen_addr());

    // ========== PHASE 2 : Chaîne de traitement ==========
    let client = ContentDirectoryClient::new(&upstream).timeout(config.upstream_timeout());
    let filter = FolderFilter::new(config.skip_prefixes());
    info!(
        upstream = client.base_url(),
        skip_prefixes = ?filter.prefixes(),
        "📡 Using ContentDirectory server"
    );

    let source = UpstreamFolderSource::new(client, filter);
    let cache = SnapshotCache::new(Arc::new(source))
        .refresh_interval(config.refresh_interval())
        .serve_stale_on_error(config.serve_stale_on_error());
    info!(
        refresh_interval = ?cache.interval(),
        refresh_deadline = ?config.refresh_deadline(),
        "🗂️ Snapshot cache ready"
    );

    let state = ListingState::new(Arc::new(cache), upstream, config.refresh_deadline());

    // ========== PHASE 3 : Serveur HTTP ==========
    let mut server = Server::new("WebDLNA", listen_addr, router(state));
    server.start().await?;

    info!("✅ WebDLNA is ready");
    server.wait().await;
    info!("👋 WebDLNA stopped");

    Ok(())
}
