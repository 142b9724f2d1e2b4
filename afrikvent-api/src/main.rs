use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use afrikvent_api::{app, AppState};
use afrikvent_banner::{seed, DisplayGateway, InMemoryBannerStore};
use afrikvent_core::BannerRepository;
use afrikvent_shared::Banner;
use afrikvent_store::app_config::Config;
use afrikvent_store::{DbClient, PostgresBannerRepository, RedisClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "afrikvent_api=debug,afrikvent_banner=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Afrikvent API on port {}", config.server.port);

    let repo = banner_repository(&config).await?;

    let (events_tx, _) = tokio::sync::broadcast::channel(config.banners.event_buffer.max(1));
    let gateway = DisplayGateway::new(repo).with_event_channel(events_tx);

    let redis = match &config.redis.url {
        Some(url) => Some(Arc::new(
            RedisClient::new(url).await.context("Failed to connect to Redis")?,
        )),
        None => {
            tracing::info!("No Redis configured, rate limiting disabled");
            None
        }
    };

    let app_state = AppState {
        gateway: Arc::new(gateway),
        redis,
        rate_limit: config.rate_limit.clone(),
        default_limit: config.banners.default_limit,
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn banner_repository(config: &Config) -> anyhow::Result<Arc<dyn BannerRepository>> {
    if let Some(url) = &config.database.url {
        let db = DbClient::new(url, config.database.max_connections)
            .await
            .context("Failed to connect to database")?;
        db.migrate().await.context("Failed to run migrations")?;
        return Ok(Arc::new(PostgresBannerRepository::new(&db)));
    }

    let banners: Vec<Banner> = match &config.banners.seed_file {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read seed file {}", path))?;
            serde_json::from_str(&raw).with_context(|| format!("Invalid seed file {}", path))?
        }
        None => seed::sample_banners().context("Invalid built-in sample banners")?,
    };

    tracing::info!("Using in-memory banner store with {} banners", banners.len());
    Ok(Arc::new(InMemoryBannerStore::with_banners(banners)?))
}
