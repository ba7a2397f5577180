// Hunted Bot
// A Discord bot for Fortnite squad stats tracking

mod api;
mod commands;
mod db;
mod error;
mod features;
mod models;
mod utils;
mod web;

use std::env;
use std::sync::Arc;

use poise::serenity_prelude as serenity;
use tokio::sync::RwLock;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::db::Database;
use crate::models::modes;
use crate::utils::config::AppConfig;

/// Currently selected season and game mode, shared across commands and
/// the webhook. Writers swap whole values under the lock.
#[derive(Debug)]
pub struct StatsSettings {
    pub season_id: i32,
    pub game_mode: String,
}

/// State injected into every command and the webhook service
#[derive(Debug)]
pub struct AppState {
    pub http_client: reqwest::Client,
    pub config: AppConfig,
    pub db: Database,
    pub settings: RwLock<StatsSettings>,
    /// Players currently in the squad voice channel
    pub active_players: RwLock<Vec<String>>,
}

pub type Data = Arc<AppState>;

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

/// Register all prefix commands
fn get_commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        commands::help::help(),
        commands::message::message(),
        commands::mode::mode(),
        commands::hunted::hunted(),
        commands::track::track(),
        commands::stats::stats(),
        commands::locations::upgrade(),
        commands::locations::hire(),
        commands::locations::chests(),
        commands::ask::ask(),
    ]
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "hunted_rs=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().expect("Failed to load configuration");
    modes::validate(&config.game_mode_for_stats)
        .expect("FORTNITE_GAME_MODE_FOR_STATS is not a supported game mode");

    info!("Starting Hunted Bot...");

    // Build HTTP client for API calls
    let http_client = reqwest::Client::builder()
        .user_agent("Hunted-Bot/1.0")
        .build()
        .expect("Failed to create HTTP client");

    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let settings = RwLock::new(StatsSettings {
        season_id: config.season_id,
        game_mode: config.game_mode_for_stats.clone(),
    });

    let token = config.discord_token.clone();
    let webhook_bind_addr = config.webhook_bind_addr.clone();

    let state: Data = Arc::new(AppState {
        http_client,
        config,
        db,
        settings,
        active_players: RwLock::new(Vec::new()),
    });

    // Setup framework
    let setup_state = state.clone();
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: get_commands(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some("!".into()),
                ..Default::default()
            },
            pre_command: |ctx| {
                Box::pin(async move {
                    let guild = ctx
                        .guild()
                        .map(|guild| guild.name.clone())
                        .unwrap_or_else(|| "DM".to_string());
                    info!(
                        identifier = %format!("{}:{}", guild, ctx.author().name),
                        "Command called: '{}{}'",
                        ctx.prefix(),
                        ctx.invoked_command_name()
                    );
                })
            },
            on_error: |error| {
                Box::pin(async move {
                    match error {
                        poise::FrameworkError::Command { error, ctx, .. } => {
                            error!("Command error: {:?}", error);
                            let _ = ctx.say(format!("❌ Error: {}", error)).await;
                        }
                        poise::FrameworkError::UnknownCommand { ctx, msg, .. } => {
                            let _ = msg
                                .reply(
                                    ctx,
                                    "Command does not exist. Use `!list` to see available commands.",
                                )
                                .await;
                        }
                        err => {
                            error!("Framework error: {:?}", err);
                        }
                    }
                })
            },
            event_handler: |ctx, event, _framework, data| {
                Box::pin(async move {
                    if let serenity::FullEvent::VoiceStateUpdate { old, new } = event {
                        features::session_tracker::handle_voice_state_update(
                            ctx,
                            data,
                            old.as_ref(),
                            new,
                        )
                        .await;
                    }
                    Ok(())
                })
            },
            ..Default::default()
        })
        .setup(|_ctx, ready, _framework| {
            Box::pin(async move {
                info!("Started up {}", ready.user.name);
                Ok(setup_state)
            })
        })
        .build();

    // MESSAGE_CONTENT is privileged, enable in the Discord Dev Portal
    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS
        | serenity::GatewayIntents::GUILD_VOICE_STATES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .expect("Failed to create client");

    // Webhook service runs alongside the gateway connection
    let web_state = web::WebState {
        app: state.clone(),
        discord_http: client.http.clone(),
    };
    tokio::spawn(async move {
        if let Err(exc) = web::serve(web_state, &webhook_bind_addr).await {
            error!("Webhook service failed: {:?}", exc);
        }
    });

    // Run with graceful shutdown
    let shard_manager = client.shard_manager.clone();

    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to register Ctrl+C handler");
        info!("Shutting down...");
        shard_manager.shutdown_all().await;
    });

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }

    info!("Goodbye!");
}
