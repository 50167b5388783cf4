use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use bcw_core::{AppConfig, StoreBackend};
use bcw_notify::{DiscordWebhook, NoopNotifier, Notifier};
use bcw_worker::provider::SimulatedInstagram;
use bcw_worker::store::{PgStore, ProfileStore, RestStore};
use bcw_worker::{Scheduler, TaskKind, WorkerContext};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "bcw-worker")]
#[command(about = "BrandConnect background worker")]
struct Cli {
    /// Run the selected jobs once and exit instead of looping.
    #[arg(long)]
    once: bool,

    /// Restrict to these jobs (repeatable). Defaults to all.
    #[arg(long = "task", value_enum)]
    tasks: Vec<TaskKind>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = bcw_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(
        env = %config.env,
        store = config.store.kind(),
        "worker: starting"
    );

    let ctx = WorkerContext::new(
        build_store(&config).await?,
        build_notifier(&config)?,
        Arc::new(SimulatedInstagram::new(
            Duration::from_millis(config.provider_latency_ms),
            config.provider_reject_marker.clone(),
        )),
    );
    let mut scheduler = Scheduler::new(ctx, &config.intervals, config.scheduler_tick, &cli.tasks);

    if cli.once {
        scheduler.run_all().await;
        tracing::info!("worker: single pass complete");
        return Ok(());
    }

    tokio::select! {
        () = scheduler.run() => {},
        () = shutdown_signal() => {},
    }
    Ok(())
}

async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn ProfileStore>> {
    match &config.store {
        StoreBackend::Rest { url, service_key } => {
            let client = bcw_rest::RestClient::new(url, service_key, config.http_timeout_secs)
                .context("building REST gateway client")?;
            Ok(Arc::new(RestStore::new(client)))
        }
        StoreBackend::Postgres { database_url } => {
            let pool_config = bcw_db::PoolConfig::from_app_config(config);
            let pool = bcw_db::connect_pool(database_url, pool_config)
                .await
                .context("connecting to Postgres")?;
            bcw_db::ping(&pool).await.context("Postgres health check")?;
            if config.db_run_migrations {
                let applied = bcw_db::run_migrations(&pool).await?;
                tracing::info!(applied, "worker: migrations applied");
            }
            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}

fn build_notifier(config: &AppConfig) -> anyhow::Result<Arc<dyn Notifier>> {
    match &config.webhook_url {
        Some(url) => Ok(Arc::new(DiscordWebhook::new(
            url.clone(),
            config.http_timeout_secs,
        )?)),
        None => {
            tracing::warn!("worker: DISCORD_WEBHOOK_URL not set; notifications disabled");
            Ok(Arc::new(NoopNotifier))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "worker: failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "worker: failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("worker: received shutdown signal, stopping");
}
