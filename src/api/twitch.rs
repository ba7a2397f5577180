// Twitch Helix client
// Best-effort live stream lookup for a player; any failure means "no stream"

use serde::Deserialize;
use tracing::debug;

const TWITCH_AUTHENTICATION_URL: &str = "https://id.twitch.tv/oauth2/token";
const TWITCH_GAME_URL: &str = "https://api.twitch.tv/helix/games";
const TWITCH_STREAM_URL: &str = "https://api.twitch.tv/helix/streams";

/// Returns the stream URL if the player is live on Twitch. Errors and
/// missing credentials degrade to `None`; a stream lookup must never
/// fail a stats request.
pub async fn get_twitch_stream(
    client: &reqwest::Client,
    client_id: Option<&str>,
    client_secret: Option<&str>,
    username: &str,
) -> Option<String> {
    let (client_id, client_secret) = match (client_id, client_secret) {
        (Some(id), Some(secret)) => (id, secret),
        _ => return None,
    };

    match lookup_stream(client, client_id, client_secret, username).await {
        Ok(stream) => stream,
        Err(exc) => {
            debug!("Twitch stream lookup failed for {}: {}", username, exc);
            None
        }
    }
}

async fn lookup_stream(
    client: &reqwest::Client,
    client_id: &str,
    client_secret: &str,
    username: &str,
) -> Result<Option<String>, reqwest::Error> {
    // Streamers commonly tag their Epic name with TTV; their Twitch
    // login does not carry the tag.
    let user_login = username
        .trim_end_matches("TTV")
        .trim_end_matches("ttv")
        .trim();

    let auth: TwitchAuthResponse = client
        .post(TWITCH_AUTHENTICATION_URL)
        .query(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("grant_type", "client_credentials"),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let games: TwitchDataResponse = client
        .get(TWITCH_GAME_URL)
        .query(&[("name", "Fortnite")])
        .bearer_auth(&auth.access_token)
        .header("Client-ID", client_id)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let game_id = match games.data.first() {
        Some(game) => game.id.clone(),
        None => return Ok(None),
    };

    let streams: TwitchDataResponse = client
        .get(TWITCH_STREAM_URL)
        .query(&[
            ("game_id", game_id.as_str()),
            ("first", "100"),
            ("user_login", user_login),
        ])
        .bearer_auth(&auth.access_token)
        .header("Client-ID", client_id)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    if streams.data.is_empty() {
        return Ok(None);
    }

    Ok(Some(format!("https://www.twitch.tv/{}", user_login)))
}

#[derive(Debug, Deserialize)]
struct TwitchAuthResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TwitchDataResponse {
    #[serde(default)]
    data: Vec<TwitchDataEntry>,
}

#[derive(Debug, Deserialize)]
struct TwitchDataEntry {
    id: String,
}
