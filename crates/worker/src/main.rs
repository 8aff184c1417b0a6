//! `warbot-worker` -- WarEra guild reconciliation daemon.
//!
//! Keeps guild roles in line with the game: economy / fight roles from skill
//! builds, military unit roles, and periodic reports of unidentified members
//! and countries open for takeover. See [`WorkerConfig::from_env`] for the
//! environment variables.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use warbot_gameapi::{UserResolver, WarEraApi};
use warbot_guild::{DiscordGuild, GuildService};
use warbot_worker::config::WorkerConfig;
use warbot_worker::engine::Engine;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "warbot_worker=info,warbot_gameapi=info,warbot_guild=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    tracing::info!(
        guild_id = config.guild.guild,
        config_path = %config.config_path.display(),
        military_units = config.guild.military_units.len(),
        excluded_countries = config.guild.active_countries.len(),
        "Loaded configuration"
    );

    let game = WarEraApi::new(config.warera_api_url.clone(), config.request_timeout)
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to build game API client");
            std::process::exit(1);
        });

    let guild = DiscordGuild::new(
        config.discord_api_url.clone(),
        config.discord_token.clone(),
        config.guild.guild,
        config.request_timeout,
    )
    .unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build Discord client");
        std::process::exit(1);
    });

    let resolver = Arc::new(UserResolver::new(Arc::new(game)));
    let guild: Arc<dyn GuildService> = Arc::new(guild);

    let engine = Engine::start(&config.guild, config.intervals, resolver, guild)
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to start jobs");
            std::process::exit(1);
        });

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }

    engine.shutdown(config.shutdown_timeout).await;
}
