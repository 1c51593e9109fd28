//! StarWarden runtime.
//!
//! Headless deployment: loads configuration, opens the durable ledger,
//! performs an initial star synchronization for every configured
//! repository, and optionally keeps resyncing on an interval. Chat-platform
//! embedders use `warden-core` directly and attach their own transport.

use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use warden_core::{GithubStarClient, NoOpTransport, VerificationService};
use warden_runtime::{RocksConfig, RocksStore, WardenConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "warden.toml".to_string());
    let config = WardenConfig::load(Path::new(&config_path))
        .with_context(|| format!("loading {config_path}"))?;
    let router = config.router().context("building repository routes")?;

    let store = Arc::new(
        RocksStore::open(RocksConfig::new(config.data_dir.clone()))
            .context("opening ledger store")?,
    );
    let stars = Arc::new(
        GithubStarClient::new(config.github()).context("building GitHub client")?,
    );
    let service = Arc::new(VerificationService::new(
        Arc::new(NoOpTransport),
        stars,
        store,
        router,
        config.templates.clone(),
        config.timing(),
    ));

    startup_report(&service);

    run_sync(&service).await;

    if let Some(interval) = config.resync_interval() {
        info!(interval_secs = interval.as_secs(), "periodic resync enabled");
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        ticker.tick().await; // the initial sync already ran
        loop {
            ticker.tick().await;
            run_sync(&service).await;
        }
    }

    Ok(())
}

/// Log ledger counts per configured repository before syncing.
fn startup_report(service: &VerificationService) {
    for repo in service.router().ordered_repos() {
        let status = service.status_of(repo);
        info!(
            repo = %repo,
            members = status.member_count,
            claimed = status.claimed_count,
            "ledger state"
        );
    }
    if let Some(repo) = service.router().default_repo() {
        if service.status_of(repo).member_count == 0 {
            info!(repo = %repo, "ledger is empty for the default repository, first sync will populate it");
        }
    }
}

async fn run_sync(service: &VerificationService) {
    for (repo, ok) in service.refresh_all().await {
        if ok {
            let status = service.status_of(&repo);
            info!(
                repo = %repo,
                members = status.member_count,
                claimed = status.claimed_count,
                "sync finished"
            );
        } else {
            warn!(repo = %repo, "sync failed, ledger left as it was");
        }
    }
}
