// Game mode selection command

use tracing::{info, warn};

use crate::models::modes;
use crate::{Context, Error};

/// Set the game mode used for stats lookups
#[poise::command(prefix_command, rename = "mode", aliases("m", "game_mode"))]
pub async fn mode(
    ctx: Context<'_>,
    #[rest] game_mode: Option<String>,
) -> Result<(), Error> {
    let Some(game_mode) = game_mode else {
        ctx.say("Please specify a game mode after the command, ex: `!mode ranked_reload`")
            .await?;
        return Ok(());
    };

    info!("Updating game mode to: {}", game_mode);

    let family = match modes::validate(&game_mode) {
        Ok(family) => family,
        Err(exc) => {
            warn!("{}", exc);
            ctx.say(exc.to_string()).await?;
            return Ok(());
        }
    };

    ctx.data().settings.write().await.game_mode = family.name.to_string();

    let msg = format!("Game mode set: {}", modes::readable(family.name));
    info!("{}", msg);
    ctx.say(msg).await?;

    Ok(())
}
