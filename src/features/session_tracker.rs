// Voice-channel session tracking
// Players joining the squad voice channel are added to the active
// session; the first joiner is offered a squad stats run.

use std::time::Duration;

use poise::serenity_prelude as serenity;
use tracing::{info, warn};

use crate::features::stats_service;
use crate::AppState;

const YES_EMOJI: char = '✅';
const NO_EMOJI: char = '❌';
const WAIT_FOR_TIMEOUT_SEC: u64 = 180;

pub async fn handle_voice_state_update(
    ctx: &serenity::Context,
    state: &AppState,
    old: Option<&serenity::VoiceState>,
    new: &serenity::VoiceState,
) {
    let member = match &new.member {
        Some(member) => member,
        None => return,
    };
    if member.user.bot {
        return;
    }

    info!(
        "Voice channel update detected for member: {}",
        member.display_name()
    );

    let should_prompt = match update_active_players(ctx, state, member, old, new).await {
        Ok(prompt) => prompt,
        Err(exc) => {
            // A stale partial list is worse than tracking everyone, so
            // any bookkeeping failure resets the session.
            warn!("Failed to process voice state update: {}", exc);
            state.active_players.write().await.clear();
            false
        }
    };

    if !should_prompt {
        return;
    }

    let silent = send_track_question_and_wait(ctx, state, member.display_name()).await;

    let players = {
        let active = state.active_players.read().await;
        if active.is_empty() {
            info!("No players active on Discord, tracking all squad players instead");
            state.config.squad_players.clone()
        } else {
            active.clone()
        }
    };

    let channel_id = serenity::ChannelId::new(state.config.text_channel_id);
    stats_service::track_players(state, &ctx.http, channel_id, &players, silent).await;
}

/// Apply the join/leave transition rules and report whether the track
/// prompt should be sent (genuine join by a squad member who is first
/// into the channel).
async fn update_active_players(
    ctx: &serenity::Context,
    state: &AppState,
    member: &serenity::Member,
    old: Option<&serenity::VoiceState>,
    new: &serenity::VoiceState,
) -> anyhow::Result<bool> {
    if !in_squad_role(ctx, state, member) {
        return Ok(false);
    }

    let before = channel_name(ctx, old.and_then(|voice| voice.channel_id)).await?;
    let after = channel_name(ctx, new.channel_id).await?;
    let target = &state.config.voice_channel_name;

    // A mute/deafen toggle fires the same event without a channel change
    let switched = before != after;
    let joined = switched && after.as_deref() == Some(target.as_str());
    let left = before.as_deref() == Some(target.as_str()) && after.is_none();

    let display_name = member.display_name().to_string();
    let player = state.config.discord_user_to_player.get(&display_name);

    if joined {
        if let Some(player) = player {
            let mut active = state.active_players.write().await;
            if !active.contains(player) {
                active.push(player.clone());
            }
        }
        return Ok(is_first_joiner(ctx, new));
    }

    if left {
        if let Some(player) = player {
            state.active_players.write().await.retain(|name| name != player);
        }
    }

    Ok(false)
}

fn in_squad_role(ctx: &serenity::Context, state: &AppState, member: &serenity::Member) -> bool {
    ctx.cache
        .guild(member.guild_id)
        .map(|guild| {
            guild.roles.iter().any(|(role_id, role)| {
                role.name == state.config.squad_role_name && member.roles.contains(role_id)
            })
        })
        .unwrap_or(false)
}

fn is_first_joiner(ctx: &serenity::Context, voice_state: &serenity::VoiceState) -> bool {
    let (guild_id, channel_id) = match (voice_state.guild_id, voice_state.channel_id) {
        (Some(guild_id), Some(channel_id)) => (guild_id, channel_id),
        _ => return false,
    };
    ctx.cache
        .guild(guild_id)
        .map(|guild| {
            guild
                .voice_states
                .values()
                .filter(|vs| vs.channel_id == Some(channel_id))
                .count()
                == 1
        })
        .unwrap_or(false)
}

async fn channel_name(
    ctx: &serenity::Context,
    channel_id: Option<serenity::ChannelId>,
) -> anyhow::Result<Option<String>> {
    match channel_id {
        Some(channel_id) => Ok(Some(channel_id.name(ctx).await?)),
        None => Ok(None),
    }
}

/// Ask whether the squad wants the current stats posted. Returns the
/// silent flag: true unless someone reacts with the yes emoji before
/// the timeout.
async fn send_track_question_and_wait(
    ctx: &serenity::Context,
    state: &AppState,
    display_name: &str,
) -> bool {
    let embed = serenity::CreateEmbed::new()
        .title(format!("Welcome, {}", display_name))
        .description("Get good, noob!")
        .colour(serenity::Colour::ORANGE)
        .field(
            "Do you want to see the current squad stats?",
            "Select Yes or No using the emojis below",
            false,
        );

    let channel_id = serenity::ChannelId::new(state.config.text_channel_id);
    let message = match channel_id
        .send_message(&ctx.http, serenity::CreateMessage::new().embed(embed))
        .await
    {
        Ok(message) => message,
        Err(exc) => {
            warn!("Failed to send track question: {}", exc);
            return true;
        }
    };

    for emoji in [YES_EMOJI, NO_EMOJI] {
        if let Err(exc) = message
            .react(&ctx.http, serenity::ReactionType::Unicode(emoji.to_string()))
            .await
        {
            warn!("Failed to add reaction: {}", exc);
        }
    }

    let bot_id = ctx.cache.current_user().id;
    let reaction = message
        .await_reaction(&ctx.shard)
        .filter(move |reaction| reaction.user_id != Some(bot_id))
        .timeout(Duration::from_secs(WAIT_FOR_TIMEOUT_SEC))
        .await;

    match reaction {
        Some(reaction) => reaction.emoji != serenity::ReactionType::Unicode(YES_EMOJI.to_string()),
        None => true,
    }
}
