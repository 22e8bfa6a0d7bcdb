//! Wiring & DI. Entry point: load settings, bootstrap adapters, inject into services, poll.
//! No business logic here.

use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tg_guard::adapters::enforcement::{BotApiGateway, LoggingGateway};
use tg_guard::adapters::persistence::SqliteStrikeStore;
use tg_guard::adapters::telegram::{BotApiClient, LongPollSource};
use tg_guard::domain::{ModerationEngine, PunishmentPolicy};
use tg_guard::ports::{EnforcementGateway, StrikeStore, UpdateSource};
use tg_guard::shared::config::AppConfig;
use tg_guard::usecases::{AdminService, EvictionWorker, ModerationService, UpdateDispatcher};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Extra HTTP time on top of the long-poll timeout.
const HTTP_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let settings = AppConfig::load()
        .and_then(|cfg| cfg.validate())
        .map_err(|e| anyhow::anyhow!("refusing to start: {}", e))?;
    info!(?settings, "configuration loaded");
    if settings.owner_ids.is_empty() {
        warn!("ADMIN_IDS is empty; no bot owners configured");
    }

    let store = Arc::new(
        SqliteStrikeStore::connect(&settings.db_path)
            .await
            .map_err(|e| anyhow::anyhow!("SQLite connect failed: {}", e))?,
    );
    info!(path = %store.path().display(), "strike store ready");
    let store: Arc<dyn StrikeStore> = store;

    let api = Arc::new(
        BotApiClient::new(
            &settings.bot_token,
            Duration::from_secs(settings.poll_timeout_secs) + HTTP_GRACE,
        )
        .map_err(|e| anyhow::anyhow!("{}", e))?,
    );
    // Polling and webhooks are exclusive; stale updates from downtime are dropped.
    api.delete_webhook(true)
        .await
        .map_err(|e| anyhow::anyhow!("deleteWebhook failed: {}", e))?;

    let gateway: Arc<dyn EnforcementGateway> = if settings.dry_run {
        warn!("DRY_RUN is set; directives are logged, not enforced");
        Arc::new(LoggingGateway::new())
    } else {
        Arc::new(BotApiGateway::new(Arc::clone(&api)))
    };

    let engine = Arc::new(ModerationEngine::new(&settings.engine));
    let moderation = Arc::new(ModerationService::new(
        engine,
        PunishmentPolicy::new(settings.tiers),
        Arc::clone(&store),
        Arc::clone(&gateway),
    ));

    let eviction = EvictionWorker::new(Arc::clone(&moderation), settings.eviction_interval);
    let eviction_task = tokio::spawn(eviction.run());

    let admin = Arc::new(AdminService::new(
        settings.owner_ids.clone(),
        Arc::clone(&store),
        Arc::clone(&gateway),
        settings.default_rules.clone(),
    ));
    let dispatcher = Arc::new(UpdateDispatcher::new(
        moderation,
        admin,
        store,
        gateway,
        settings.default_welcome.clone(),
    ));
    let source: Arc<dyn UpdateSource> =
        Arc::new(LongPollSource::new(api, settings.poll_timeout_secs));

    tokio::select! {
        _ = dispatcher.run(source) => {}
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                warn!(error = %e, "ctrl-c handler failed");
            }
            info!("shutdown requested");
        }
    }
    eviction_task.abort();

    Ok(())
}
