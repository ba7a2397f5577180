// Player stats orchestration: account resolution through persistence

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use poise::serenity_prelude as serenity;
use tracing::{error, info, info_span, warn, Instrument};

use crate::api::fortnite::{self, AccountInfo, PlayerRank};
use crate::api::twitch;
use crate::error::StatsError;
use crate::models::modes::{self, GameModeFamily};
use crate::models::snapshot::PlayerSnapshot;
use crate::models::stats::{self, Bucket, CanonicalModeStats};
use crate::utils::config::get_session_date;
use crate::utils::embeds;
use crate::AppState;

/// Everything needed to render and persist one player's stats
#[derive(Debug)]
pub struct PlayerStatsReport {
    pub account: AccountInfo,
    pub breakdown: BTreeMap<Bucket, CanonicalModeStats>,
    pub rank: Option<PlayerRank>,
    pub twitch_stream: Option<String>,
    pub season_id: i32,
    pub sub_mode_label: String,
}

/// Run the full lookup pipeline for one player and persist a snapshot
/// per bucket. The snapshot insert completes before this returns so
/// diff queries issued afterwards see the new rows.
pub async fn lookup_player(
    state: &AppState,
    identifier: &str,
    is_direct_id: bool,
    family: &'static GameModeFamily,
) -> Result<PlayerStatsReport, StatsError> {
    let account = fortnite::get_account_info(
        &state.http_client,
        &state.config.fortnite_api_token,
        identifier,
        is_direct_id,
    )
    .await?;

    let season_id = state.settings.read().await.season_id;
    let mut season_stats = fortnite::get_season_stats(
        &state.http_client,
        &state.config.fortnite_api_token,
        &account,
        season_id,
    )
    .await?;

    // The configured season can fall behind when a new season ships;
    // trust the player's own season history and advance the shared cell.
    let mut effective_season = season_id;
    if season_stats.latest_season_id != season_id {
        effective_season = season_stats.latest_season_id;
        state.settings.write().await.season_id = effective_season;
        info!(
            "Found new season ID, setting latest season ID to: {}",
            effective_season
        );
        season_stats = fortnite::get_season_stats(
            &state.http_client,
            &state.config.fortnite_api_token,
            &account,
            effective_season,
        )
        .await?;
    }

    let sub_mode_label = modes::readable(family.name);
    let breakdown = stats::aggregate(&season_stats.global_stats, family);
    if breakdown.is_empty() {
        return Err(StatsError::NoStatsForMode(sub_mode_label));
    }

    let (rank_result, twitch_stream) = futures::join!(
        fortnite::get_player_rank(
            &state.http_client,
            &state.config.fortnite_api_token,
            &account,
            family,
        ),
        twitch::get_twitch_stream(
            &state.http_client,
            state.config.twitch_client_id.as_deref(),
            state.config.twitch_client_secret.as_deref(),
            &account.platform_username,
        ),
    );

    let rank = match rank_result {
        Ok(rank) => Some(rank),
        Err(exc) if exc.is_not_found() => {
            warn!("{}", exc);
            None
        }
        Err(exc) => {
            error!("Rank lookup failed for {}: {}", account.readable_name, exc);
            None
        }
    };

    let report = PlayerStatsReport {
        account,
        breakdown,
        rank,
        twitch_stream,
        season_id: effective_season,
        sub_mode_label,
    };

    state.db.insert_snapshots(&snapshot_rows(&report)).await?;

    Ok(report)
}

/// One snapshot row per canonical bucket present in the breakdown
fn snapshot_rows(report: &PlayerStatsReport) -> Vec<PlayerSnapshot> {
    report
        .breakdown
        .iter()
        .map(|(bucket, stats)| PlayerSnapshot {
            username: report.account.platform_username.clone(),
            season: report.season_id,
            mode: bucket.as_str().to_string(),
            sub_mode: report.sub_mode_label.clone(),
            kd: stats.kd,
            games: stats.matchesplayed as i64,
            wins: stats.placetop1 as i64,
            win_rate: stats.winrate,
            trn: stats.score as i64,
            rank_name: report.rank.as_ref().map(|r| r.rank_name.clone()),
            rank_progress: report.rank.as_ref().map(|r| r.rank_progress),
            date_added: get_session_date(),
        })
        .collect()
}

/// Stats embed for one player's report
pub fn report_embed(report: &PlayerStatsReport) -> serenity::CreateEmbed {
    let all = report
        .breakdown
        .get(&Bucket::All)
        .cloned()
        .unwrap_or_default();

    embeds::create_stats_message(
        &format!("Username: {}", report.account.readable_name),
        &embeds::wins_str(all.placetop1, all.matchesplayed),
        all.kd,
        embeds::ordered_mode_lines(&report.breakdown),
        Some(embeds::account_profile_url(
            &report.account.platform_username,
            report.season_id,
        )),
        report.rank.as_ref(),
        report.twitch_stream.as_deref(),
    )
}

/// Search one player, deliver the embed unless silent, and report
/// classified failures to the channel. Returns the error for callers
/// that collect per-player outcomes.
pub async fn run_player_search(
    state: &AppState,
    http: &Arc<serenity::Http>,
    channel_id: serenity::ChannelId,
    identifier: &str,
    is_direct_id: bool,
    family: &'static GameModeFamily,
    silent: bool,
) -> Result<(), StatsError> {
    let result = lookup_player(state, identifier, is_direct_id, family)
        .instrument(info_span!("player_search", player = %identifier))
        .await;

    match result {
        Ok(report) => {
            if !silent {
                let message = serenity::CreateMessage::new().embed(report_embed(&report));
                if let Err(exc) = channel_id.send_message(http, message).await {
                    error!("Failed to deliver stats message: {}", exc);
                }
            } else {
                info!("Tracked player statistics for: {}", identifier);
            }
            Ok(())
        }
        Err(exc) => {
            if exc.is_not_found() {
                warn!("Unable to retrieve statistics for '{}': {}", identifier, exc);
                let _ = channel_id.say(http, exc.to_string()).await;
            } else {
                error!("Failed to retrieve player statistics for '{}': {}", identifier, exc);
                let _ = channel_id
                    .say(http, "Failed to retrieve player statistics")
                    .await;
            }
            Err(exc)
        }
    }
}

/// Fan out one search task per player and wait for all of them.
/// One player's failure never cancels the others.
pub async fn track_players(
    state: &AppState,
    http: &Arc<serenity::Http>,
    channel_id: serenity::ChannelId,
    players: &[String],
    silent: bool,
) -> Vec<(String, Result<(), StatsError>)> {
    let family = {
        let settings = state.settings.read().await;
        modes::active_family(&settings.game_mode)
    };

    let tasks = players.iter().map(|player| {
        let player = player.clone();
        async move {
            let outcome =
                run_player_search(state, http, channel_id, &player, false, family, silent).await;
            (player, outcome)
        }
    });

    join_all(tasks).await
}
