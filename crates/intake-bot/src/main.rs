//! Training registration intake bot - main entry point.

use anyhow::Context;
use intake_bot::api::{create_router, AppState, WebhookSecret};
use intake_bot::config::{Config, TransportMode};
use intake_bot::error::AppResult;
use intake_bot::{AdminRelay, Dispatcher, Registrar};
use secrecy::ExposeSecret;
use session_store::SessionStore;
use std::net::SocketAddr;
use std::sync::Arc;
use telegram_client::{TelegramClient, UpdateReceiver};
use tokio::net::TcpListener;
use tokio::signal;
use tokio_stream::StreamExt;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration; anything missing stops the process here.
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.bot.log_level);

    info!("Starting registration intake bot...");

    let admin_chat_id = config.admin_chat_id().context("Invalid configuration")?;
    let token = config.bot_token().context("Invalid configuration")?;

    let telegram = Arc::new(
        TelegramClient::new(
            &config.telegram.api_url,
            token.expose_secret().as_str(),
            config.telegram.timeout,
        )
        .context("Failed to create Telegram client")?,
    );

    // Health check
    match telegram.get_me().await {
        Ok(me) => info!(
            "Telegram API healthy - bot @{}",
            me.username.as_deref().unwrap_or(&me.first_name)
        ),
        Err(e) => {
            error!("Telegram API not reachable at {}: {}", config.telegram.api_url, e);
            return Err(e.into());
        }
    }

    let sessions = SessionStore::new();
    let relay = AdminRelay::new(telegram.clone(), admin_chat_id);
    let registrar = Arc::new(Registrar::new(sessions.clone(), relay));
    let dispatcher = Arc::new(Dispatcher::with_registrar(telegram.clone(), registrar));

    info!("Registered {} command handlers", dispatcher.handler_count());
    info!("Relaying registrations to admin chat {}", admin_chat_id);

    match config.telegram.mode {
        TransportMode::Webhook => serve_webhook(&config, telegram, dispatcher, sessions).await?,
        TransportMode::Polling => poll(&config, telegram, dispatcher).await?,
    }

    info!("Shutting down...");
    Ok(())
}

async fn serve_webhook(
    config: &Config,
    telegram: Arc<TelegramClient>,
    dispatcher: Arc<Dispatcher>,
    sessions: SessionStore,
) -> AppResult<()> {
    let webhook_url = config.webhook_url().context("Invalid configuration")?;
    telegram
        .set_webhook(&webhook_url, config.server.webhook_secret.as_deref())
        .await?;
    info!("Webhook registered at {}", webhook_url);

    let state = AppState::new(dispatcher, sessions);
    let app = create_router(state, WebhookSecret::new(config.server.webhook_secret.clone()));

    let addr = SocketAddr::new(
        config
            .server
            .listen_addr
            .parse()
            .unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}

async fn poll(
    config: &Config,
    telegram: Arc<TelegramClient>,
    dispatcher: Arc<Dispatcher>,
) -> AppResult<()> {
    // getUpdates is refused while a webhook is set.
    telegram.delete_webhook().await?;

    let receiver = UpdateReceiver::new((*telegram).clone(), config.telegram.poll_timeout);
    let mut stream = Box::pin(receiver.stream());

    info!("Polling for updates...");

    loop {
        tokio::select! {
            Some(message) = stream.next() => dispatcher.enqueue(message),
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
