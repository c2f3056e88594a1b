pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod qr;
pub mod registry;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

use std::sync::Arc;

use config::AppConfig;
use dispatch::get_update_handler;
use teloxide::{dptree, prelude::*};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Use RUST_LOG, fallback to info if not set.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

pub async fn run() -> Result<(), BoxError> {
    init_tracing();

    let cfg = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            return Err(Box::new(e) as BoxError);
        }
    };

    let bot = Bot::new(cfg.token.clone());

    let me = match bot.get_me().await {
        Ok(me) => me,
        Err(e) => {
            error!("Could not reach the Telegram API (is the token valid?): {e}");
            return Err(Box::new(e) as BoxError);
        }
    };
    info!("Start listening for @{}", me.username());

    let registry = Arc::new(handlers::default_registry(Arc::new(cfg)));

    // Cancelled on ctrl-c so in-flight handlers stop at their next I/O
    // boundary while the dispatcher shuts down.
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received, cancelling in-flight handlers.");
                shutdown.cancel();
            }
        });
    }

    let handler = get_update_handler();
    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![registry, shutdown])
        .enable_ctrlc_handler()
        .build();

    info!("Bot started");
    dispatcher.dispatch().await;
    info!("Dispatcher exited.");
    Ok(())
}
