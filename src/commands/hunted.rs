// Player search command

use tracing::info;

use crate::features::stats_service;
use crate::models::modes;
use crate::{Context, Error};

/// Search for a player's stats, output to Discord, and log in database
#[poise::command(
    prefix_command,
    rename = "hunted",
    aliases("h", "player", "findnoob", "wreckedby")
)]
pub async fn hunted(
    ctx: Context<'_>,
    #[rest] player_name: Option<String>,
) -> Result<(), Error> {
    let Some(player_name) = player_name else {
        ctx.say(
            "Please specify an Epic username after the command, \
            ex: `!hunted LigmaBalls12`",
        )
        .await?;
        return Ok(());
    };

    info!("Searching for player stats: {}", player_name);

    let state = ctx.data();
    let family = {
        let settings = state.settings.read().await;
        modes::active_family(&settings.game_mode)
    };

    // Errors are classified, logged, and reported to the channel inside
    // the search itself.
    let outcome = stats_service::run_player_search(
        state,
        &ctx.serenity_context().http,
        ctx.channel_id(),
        &player_name,
        false,
        family,
        false,
    )
    .await;

    if outcome.is_ok() {
        info!("Returned player statistics for: {}", player_name);
    }

    Ok(())
}
