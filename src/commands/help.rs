// Help command - list available commands

use poise::serenity_prelude as serenity;

use crate::{Context, Error};

/// List available commands
#[poise::command(prefix_command, rename = "commands", aliases("list"))]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let embed = serenity::CreateEmbed::new()
        .title("Commands list")
        .colour(serenity::Colour::ORANGE)
        .field(
            "Help",
            "List available commands.\nUsage: commands, list\nExample: `!commands`",
            false,
        )
        .field(
            "Message",
            "Send message in the Discord text channel.\nUsage: message, msg\nExample: `!msg Hello`",
            false,
        )
        .field(
            "Stats Game Mode",
            "Set game mode for stats lookup\nUsage: mode, m, game_mode\n\
            Example: `!mode ranked_reload`, `!m ranked_br`, `!m unranked_br`",
            false,
        )
        .field(
            "Player Search",
            "Display player stats\nUsage: hunted, h, player, findnoob, wreckedby\n\
            Example: `!h LigmaBalls12`, `!hunted LigmaBalls12`",
            false,
        )
        .field(
            "Track Squad",
            "Display current stats for the squad. If a username is provided, \
            display only stats for that player.\nUsage: track, squad, squads\n\
            Example: `!track`, `!squad`, `!track LigmaBalls12`",
            false,
        )
        .field(
            "Stats",
            "Display stats `diff` of a player or the squad, or average stats of \
            the opponents `played` today.\nUsage: stats\n\
            Example: `!stats diff`, `!stats diff stoobish`, `!stats played`",
            false,
        )
        .field(
            "Upgrade Locations",
            "Show map of upgrade locations\nUsage: upgrade, up, gold\nExample: `!upgrade`",
            false,
        )
        .field(
            "Hireable NPC Locations",
            "Show map of hireable NPC locations\nUsage: hire\nExample: `!hire`",
            false,
        )
        .field(
            "Chest Locations",
            "Show map of bunker and regular chest locations\nUsage: chest, chests, loot\n\
            Example: `!chests`, `!loot`",
            false,
        )
        .field(
            "Ask",
            "Ask the chatbot a question\nUsage: ask, a, chatgpt\nExample: `!ask`",
            false,
        );

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
