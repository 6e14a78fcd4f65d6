mod calendar;
mod commands;
mod config;
mod delivery;
mod extract;
mod gate;
mod invitation;
mod locale;
mod ocr;
mod pipeline;
mod platform;
mod reply;
mod scheduler;
mod text;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use teloxide::Bot;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::delivery::DeliveryScheduler;
use crate::ocr::tesseract::TesseractCli;
use crate::ocr::OcrAdapter;
use crate::pipeline::InvitationPipeline;
use crate::platform::telegram::{self, AppState};
use crate::reply::ReplyTemplates;

#[tokio::main]
async fn main() -> Result<()> {
    let started_at = Instant::now();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,invitebot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  OCR: {} ({})", config.ocr.command, config.ocr.languages);
    info!("  OCR temp dir: {}", config.ocr.temp_dir.display());
    info!(
        "  Reply delay: {}s, backoff cap {}s, {} attempts",
        config.delivery.initial_delay_secs,
        config.delivery.max_delay_secs,
        config.delivery.max_attempts
    );
    info!("  Default locale: {}", config.reply.default_locale);

    let bot = Bot::new(&config.telegram.bot_token);
    let identity = telegram::fetch_identity(&bot).await?;

    let ocr = OcrAdapter::new(
        Arc::new(TesseractCli::new(config.ocr.command.clone())),
        config.ocr.clone(),
    );
    let templates = ReplyTemplates::new(config.reply.default_locale, &config.templates);
    let delivery = DeliveryScheduler::new(config.delivery.clone());
    let pipeline = InvitationPipeline::new(ocr, templates, delivery);

    let state = Arc::new(AppState {
        pipeline,
        identity,
        started_at,
    });

    // Background heartbeat
    let _heartbeat = scheduler::start_heartbeat(&config.general.heartbeat_cron, started_at).await?;

    info!("Bot is starting...");
    telegram::run(state, bot).await?;

    Ok(())
}
