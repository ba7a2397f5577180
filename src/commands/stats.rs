// Stats queries: session diffs and opponent averages

use std::collections::HashMap;

use futures::future::join_all;
use poise::serenity_prelude as serenity;
use tracing::{info, warn};

use crate::db::OpponentAverageRow;
use crate::features::stats_service;
use crate::models::modes;
use crate::models::snapshot::{self, ModeDiff};
use crate::models::stats::Bucket;
use crate::utils::embeds;
use crate::utils::formatters::format_number;
use crate::{Context, Error};

const DIFF_COMMANDS: [&str; 1] = ["diff"];
const OPPONENT_COMMANDS: [&str; 6] = ["played", "rate", "killed", "opponents", "enemy", "noobs"];

/// Output stats based on the parameters provided: session diffs for the
/// squad, or averages of the opponents faced today
#[poise::command(prefix_command, rename = "stats")]
pub async fn stats(ctx: Context<'_>, params: Vec<String>) -> Result<(), Error> {
    let mut params = params;
    if params.is_empty() {
        let message = "Please specify a command, ex: `!stats diff` or `!stats played`";
        warn!("{}", message);
        ctx.say(message).await?;
        return Ok(());
    }

    let command = params.remove(0);

    if DIFF_COMMANDS.contains(&command.as_str()) {
        let usernames = if params.is_empty() {
            let active = ctx.data().active_players.read().await;
            if active.is_empty() {
                ctx.data().config.squad_players.clone()
            } else {
                active.clone()
            }
        } else {
            params
        };
        info!("Querying stats diff today for {}", usernames.join(", "));
        stats_diff_today(&ctx, &usernames).await?;
    } else if OPPONENT_COMMANDS.contains(&command.as_str()) {
        info!("Querying opponent stats today");
        if command == "rate" {
            rate_opponents_today(&ctx).await?;
        } else {
            opponent_stats_today(&ctx).await?;
        }
    } else {
        ctx.say(format!("Command provided '{}' is not valid", command))
            .await?;
    }

    Ok(())
}

/// Refresh each player's snapshot silently, then post the diff between
/// the two most recent session dates.
async fn stats_diff_today(ctx: &Context<'_>, usernames: &[String]) -> Result<(), Error> {
    let state = ctx.data();
    let family = {
        let settings = state.settings.read().await;
        modes::active_family(&settings.game_mode)
    };

    // Snapshot updates run first so the diff sees today's numbers
    let updates = usernames.iter().map(|username| {
        stats_service::run_player_search(
            state,
            &ctx.serenity_context().http,
            ctx.channel_id(),
            username,
            false,
            family,
            true,
        )
    });
    join_all(updates).await;

    let season_id = state.settings.read().await.season_id;

    for username in usernames {
        let rows = state.db.fetch_stats_diff(username, season_id).await?;
        let breakdown = snapshot::breakdown_snapshots(&rows);

        if !breakdown.contains_key("all") {
            ctx.say(format!("No stats recorded yet for {}", username))
                .await?;
            continue;
        }

        let embed = stats_diff_message(username, &breakdown);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
    }

    Ok(())
}

fn stats_diff_message(
    username: &str,
    breakdown: &HashMap<String, ModeDiff>,
) -> serenity::CreateEmbed {
    let all = &breakdown["all"];
    let desc = format!(
        "Wins: {} ({}) / {} ({}) played",
        all.wins.current as i64,
        all.wins.diff,
        format_number(all.matches.current as i64),
        all.matches.diff
    );

    let mode_lines = Bucket::DISPLAY_ORDER
        .iter()
        .filter_map(|bucket| {
            breakdown
                .get(bucket.as_str())
                .map(|diff| (bucket.label(), diff.display_line()))
        })
        .collect();

    embeds::create_stats_message(
        &format!("Username: {}", username),
        &desc,
        all.kd.current,
        mode_lines,
        None,
        None,
        None,
    )
}

/// Post the average stats of the opponents faced today
async fn opponent_stats_today(ctx: &Context<'_>) -> Result<(), Error> {
    let state = ctx.data();
    let rows = state
        .db
        .fetch_opponent_averages(&state.config.squad_players)
        .await?;

    if rows.is_empty() {
        ctx.say("No opponents played today yet. Get some games in!")
            .await?;
        return Ok(());
    }

    let by_mode: HashMap<&str, &OpponentAverageRow> =
        rows.iter().map(|row| (row.mode.as_str(), row)).collect();

    let all = match by_mode.get("all") {
        Some(all) => all,
        None => {
            ctx.say("No opponents played today yet. Get some games in!")
                .await?;
            return Ok(());
        }
    };

    let mode_lines = Bucket::DISPLAY_ORDER
        .iter()
        .filter_map(|bucket| {
            by_mode
                .get(bucket.as_str())
                .map(|row| (bucket.label(), opponent_stats_line(row)))
        })
        .collect();

    let embed = embeds::create_stats_message(
        "Opponent Average Stats Today",
        &embeds::wins_str(all.wins as u64, all.games as u64),
        all.kd,
        mode_lines,
        None,
        None,
        None,
    );

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

fn opponent_stats_line(row: &OpponentAverageRow) -> String {
    format!(
        "KD: {:.2} • Wins: {} • Win Percentage: {:.1}% • Matches: {} • TRN: {}",
        row.kd,
        row.wins as i64,
        row.win_rate,
        row.games as i64,
        format_number(row.trn as i64)
    )
}

/// Post the skill rate keyword for the average opponent faced today
async fn rate_opponents_today(ctx: &Context<'_>) -> Result<(), Error> {
    let state = ctx.data();
    let rows = state
        .db
        .fetch_opponent_averages(&state.config.squad_players)
        .await?;

    let overall_kd = rows
        .iter()
        .find(|row| row.mode == "all")
        .map(|row| row.kd);

    match overall_kd {
        Some(kd) => {
            ctx.say(embeds::skill_rate_indicator(kd)).await?;
        }
        None => {
            ctx.say("No opponents played today yet. Get some games in!")
                .await?;
        }
    }

    Ok(())
}
