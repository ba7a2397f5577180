// Channel message relay
// Used by external callers to post into the squad text channel

use poise::serenity_prelude as serenity;

use crate::{Context, Error};

/// Send a message to the Discord text channel
#[poise::command(prefix_command, rename = "message", aliases("msg"))]
pub async fn message(ctx: Context<'_>, #[rest] text: Option<String>) -> Result<(), Error> {
    let Some(text) = text else {
        ctx.say("Please provide a message, ex: `!msg Hello`").await?;
        return Ok(());
    };

    let channel_id = serenity::ChannelId::new(ctx.data().config.text_channel_id);
    channel_id.say(&ctx.serenity_context().http, text).await?;

    Ok(())
}
