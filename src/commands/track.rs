// Squad tracking command

use tracing::info;

use crate::features::stats_service;
use crate::{Context, Error};

/// Track and log the current stats of the active players
#[poise::command(prefix_command, rename = "track", aliases("squad", "squads"))]
pub async fn track(
    ctx: Context<'_>,
    #[rest] player_name: Option<String>,
) -> Result<(), Error> {
    let state = ctx.data();

    let players = if let Some(player_name) = player_name {
        vec![player_name]
    } else {
        let active = state.active_players.read().await;
        if active.is_empty() {
            info!("No players active on Discord, tracking all squad players instead");
            state.config.squad_players.clone()
        } else {
            active.clone()
        }
    };

    stats_service::track_players(
        state,
        &ctx.serenity_context().http,
        ctx.channel_id(),
        &players,
        false,
    )
    .await;

    Ok(())
}
