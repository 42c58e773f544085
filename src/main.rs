use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vigil::config::Config;
use vigil::services::{Broadcaster, SignalEngine, SignalPipeline, UserStore};
use vigil::sources::BinanceClient;
use vigil::telegram::{Dispatcher, TelegramClient};
use vigil::{api, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vigil=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env());
    info!("Starting Vigil on {}:{}", config.host, config.port);

    let user_store = Arc::new(
        UserStore::open(&config.database_path)
            .with_context(|| format!("open user database {}", config.database_path))?,
    );

    let engine = SignalEngine::new(config.engine);
    let pipeline = Arc::new(SignalPipeline::new(BinanceClient::new(), engine, &config));

    // Background tasks are tracked so shutdown can stop them explicitly.
    let mut background = Vec::new();

    match config.telegram_bot_token.clone() {
        Some(token) => {
            let telegram = Arc::new(TelegramClient::new(token));
            let broadcaster = Arc::new(Broadcaster::new(telegram.clone(), user_store.clone()));

            // Periodic broadcast scan
            {
                let pipeline = pipeline.clone();
                let broadcaster = broadcaster.clone();
                let interval_secs = config.scan_interval_secs;
                background.push(tokio::spawn(async move {
                    let mut ticker =
                        tokio::time::interval(Duration::from_secs(interval_secs));
                    // The first tick fires immediately; wait a full
                    // interval before the first scheduled scan.
                    ticker.tick().await;
                    loop {
                        ticker.tick().await;
                        info!("Scheduled scan starting");
                        if let Some(signals) = pipeline.scan_if_idle().await {
                            broadcaster.broadcast(&signals).await;
                        }
                    }
                }));
            }

            // Command dispatcher
            let dispatcher = Dispatcher::new(
                telegram,
                user_store.clone(),
                pipeline.clone(),
                broadcaster,
                config.telegram_admin_id,
            );
            if config.telegram_admin_id.is_none() {
                warn!("TELEGRAM_ADMIN_ID not set, access requests cannot be approved");
            }
            background.push(tokio::spawn(dispatcher.run()));
        }
        None => {
            warn!("TELEGRAM_BOT_TOKEN not set, bot and broadcasts disabled");
        }
    }

    // Create application state
    let state = AppState { pipeline };

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Vigil listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
        })
        .await?;

    for task in background {
        task.abort();
    }
    info!("Vigil stopped");

    Ok(())
}
