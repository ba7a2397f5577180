// Centralized configuration, loaded once from the environment at startup

use std::collections::HashMap;
use std::env;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Timelike};

/// Hour at which a playing session rolls over to the next day.
/// Games played at 2:00 AM count toward the previous date.
pub const SESSION_END_HOUR: u32 = 3;

/// Process configuration sourced from environment variables.
/// Missing required variables abort startup; nothing here is read
/// again after `from_env` returns.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub discord_token: String,
    pub fortnite_api_token: String,
    pub database_url: String,
    /// SHA-512 hex digest the webhook `API-TOKEN` header is checked against.
    pub api_auth_digest: String,
    pub text_channel_id: u64,
    pub voice_channel_name: String,
    pub squad_role_name: String,
    /// Fortnite usernames tracked when nobody is in the voice channel.
    pub squad_players: Vec<String>,
    /// Discord display name -> Fortnite username.
    pub discord_user_to_player: HashMap<String, String>,
    pub season_id: i32,
    pub game_mode_for_stats: String,
    pub webhook_bind_addr: String,
    pub twitch_client_id: Option<String>,
    pub twitch_client_secret: Option<String>,
    pub openrouter_api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(AppConfig {
            discord_token: required("DISCORD_BOT_TOKEN")?,
            fortnite_api_token: required("FORTNITE_API_TOKEN")?,
            database_url: required("DATABASE_URL")?,
            api_auth_digest: required("REPLAY_ELIM_API_AUTH_DIGEST")?,
            text_channel_id: required("FORTNITE_TEXT_CHANNEL_ID")?
                .parse()
                .context("FORTNITE_TEXT_CHANNEL_ID must be a channel ID")?,
            voice_channel_name: required("FORTNITE_VOICE_CHANNEL_NAME")?,
            squad_role_name: required("FORTNITE_DISCORD_ROLE")?,
            squad_players: required("SQUAD_PLAYERS")?
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            discord_user_to_player: serde_json::from_str(
                &required("DISCORD_USER_TO_PLAYER")?,
            )
            .context("DISCORD_USER_TO_PLAYER must be a JSON object")?,
            season_id: required("FORTNITE_SEASON_ID")?
                .parse()
                .context("FORTNITE_SEASON_ID must be an integer")?,
            game_mode_for_stats: env::var("FORTNITE_GAME_MODE_FOR_STATS")
                .unwrap_or_else(|_| "ranked_br".to_string()),
            webhook_bind_addr: env::var("WEBHOOK_BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:5100".to_string()),
            twitch_client_id: env::var("TWITCH_CLIENT_ID").ok(),
            twitch_client_secret: env::var("TWITCH_CLIENT_SECRET").ok(),
            openrouter_api_key: env::var("OPENROUTER_API_KEY").ok(),
        })
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{} must be set", name))
}

/// Get the playing session date. A session includes the current day plus
/// a few hours past midnight, so late-night games count toward the prior
/// calendar date.
pub fn get_session_date() -> chrono::NaiveDate {
    session_date_from(Local::now())
}

pub fn get_session_date_string() -> String {
    get_session_date().format("%Y-%m-%d").to_string()
}

fn session_date_from(now: DateTime<Local>) -> chrono::NaiveDate {
    if now.hour() < SESSION_END_HOUR {
        now.date_naive() - chrono::Duration::days(1)
    } else {
        now.date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_late_night_counts_as_previous_day() {
        let night = Local.with_ymd_and_hms(2026, 8, 7, 1, 30, 0).unwrap();
        assert_eq!(
            session_date_from(night),
            chrono::NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()
        );
    }

    #[test]
    fn test_morning_is_same_day() {
        let morning = Local.with_ymd_and_hms(2026, 8, 7, 3, 0, 0).unwrap();
        assert_eq!(
            session_date_from(morning),
            chrono::NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
        );
    }
}
