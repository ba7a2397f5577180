// fortniteapi.io client
// Account lookup, per-season stats, and ranked info

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::StatsError;
use crate::models::modes::GameModeFamily;
use crate::models::stats::RawModeStats;

const ACCOUNT_ID_ADVANCED_LOOKUP_URL: &str = "https://fortniteapi.io/v2/lookup/advanced";
const ACCOUNT_ID_LOOKUP_URL: &str = "https://fortniteapi.io/v2/lookup";
const PLAYER_STATS_BY_SEASON_URL: &str = "https://fortniteapi.io/v1/stats";
const RANKED_INFO_LOOKUP_URL: &str = "https://fortniteapi.io/v2/ranked/user";

/// Resolved account identity for a stats lookup
#[derive(Debug, Clone)]
pub struct AccountInfo {
    pub account_id: String,
    pub platform_username: String,
    /// Name shown to the user; carries the queried string alongside the
    /// matched platform name when the fuzzy match differs.
    pub readable_name: String,
}

#[derive(Debug, Clone)]
pub struct PlayerRank {
    pub rank_name: String,
    pub rank_progress: i32,
}

/// Season stats payload, already validated against the provider's
/// result flags.
#[derive(Debug)]
pub struct SeasonStats {
    pub global_stats: HashMap<String, RawModeStats>,
    pub latest_season_id: i32,
}

/// Resolve a player identifier to an account. Replay-derived GUIDs skip
/// the fuzzy search and hit the direct lookup endpoint instead.
pub async fn get_account_info(
    client: &reqwest::Client,
    api_token: &str,
    identifier: &str,
    is_direct_id: bool,
) -> Result<AccountInfo, StatsError> {
    if is_direct_id {
        return lookup_by_account_id(client, api_token, identifier).await;
    }
    lookup_by_username(client, api_token, identifier).await
}

async fn lookup_by_username(
    client: &reqwest::Client,
    api_token: &str,
    player_name: &str,
) -> Result<AccountInfo, StatsError> {
    let response = client
        .get(ACCOUNT_ID_ADVANCED_LOOKUP_URL)
        .query(&[("username", player_name)])
        .header("Authorization", api_token)
        .send()
        .await?;

    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Err(StatsError::PlayerNotFound(player_name.to_string()));
    }

    // The advanced lookup returns candidates ordered by match
    // confidence; the top candidate wins.
    let lookup: AdvancedLookupResponse = response
        .json()
        .await
        .map_err(|_| StatsError::PlayerNotFound(player_name.to_string()))?;

    let best_match = lookup
        .matches
        .first()
        .ok_or_else(|| StatsError::PlayerNotFound(player_name.to_string()))?;
    let platform_match = best_match
        .matches
        .first()
        .ok_or_else(|| StatsError::PlayerNotFound(player_name.to_string()))?;

    info!(
        "Closest username match for '{}': {} ({})",
        player_name, platform_match.value, platform_match.platform
    );

    let matched_username = platform_match.value.clone();
    let readable_name = if player_name.eq_ignore_ascii_case(&matched_username) {
        matched_username.clone()
    } else {
        format!(
            "{} ({}: {})",
            player_name,
            capitalize(&platform_match.platform),
            matched_username
        )
    };

    Ok(AccountInfo {
        account_id: best_match.account_id.clone(),
        platform_username: matched_username,
        readable_name,
    })
}

async fn lookup_by_account_id(
    client: &reqwest::Client,
    api_token: &str,
    account_id: &str,
) -> Result<AccountInfo, StatsError> {
    let response = client
        .get(ACCOUNT_ID_LOOKUP_URL)
        .query(&[("account", account_id)])
        .header("Authorization", api_token)
        .send()
        .await?;

    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Err(StatsError::PlayerNotFound(account_id.to_string()));
    }

    let lookup: DirectLookupResponse = response
        .json()
        .await
        .map_err(|_| StatsError::PlayerNotFound(account_id.to_string()))?;

    let name = lookup
        .account_name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| StatsError::PlayerNotFound(account_id.to_string()))?;

    Ok(AccountInfo {
        account_id: lookup.account_id.unwrap_or_else(|| account_id.to_string()),
        platform_username: name.clone(),
        readable_name: name,
    })
}

/// Fetch a player's stats for one season. The provider signals missing
/// data through a result flag plus a grab-bag of optional fields; every
/// combination classifies into a user-facing error rather than a parse
/// failure.
pub async fn get_season_stats(
    client: &reqwest::Client,
    api_token: &str,
    account: &AccountInfo,
    season_id: i32,
) -> Result<SeasonStats, StatsError> {
    let season = season_id.to_string();
    let response = client
        .get(PLAYER_STATS_BY_SEASON_URL)
        .query(&[
            ("account", account.account_id.as_str()),
            ("season", season.as_str()),
            ("playlistGrouping", "false"),
        ])
        .header("Authorization", api_token)
        .send()
        .await?
        .error_for_status()?;

    let stats: SeasonStatsResponse = response.json().await.map_err(|exc| {
        StatsError::UnexpectedResponse(format!("season stats body: {}", exc))
    })?;

    let readable = &account.readable_name;

    if !stats.result {
        return Err(match stats.name {
            None => StatsError::NoStatsForMode(format!(
                "Player statistics not available at the moment: {}",
                readable
            )),
            Some(None) => {
                StatsError::PlayerNotFound(format!("Player statistics not found: {}", readable))
            }
            Some(Some(_)) => StatsError::NoStatsForMode(format!(
                "Player has a private account: {}",
                readable
            )),
        });
    }

    // An empty stats object and a missing one both mean no usable data
    let global_stats = stats.global_stats.filter(|gs| !gs.is_empty()).ok_or_else(|| {
        StatsError::NoStatsForMode(format!("Player does not have sufficient data: {}", readable))
    })?;

    let account_section = stats.account.ok_or_else(|| {
        StatsError::NoStatsForMode(format!(
            "Player does not have available seasons data: {}",
            readable
        ))
    })?;
    if account_section.season.is_none() {
        return Err(StatsError::NoStatsForMode(format!(
            "Player does not have available seasons data: {}",
            readable
        )));
    }

    let latest_season_id = stats
        .account_level_history
        .iter()
        .map(|entry| entry.season)
        .max()
        .unwrap_or(season_id);

    Ok(SeasonStats {
        global_stats,
        latest_season_id,
    })
}

/// Fetch the player's rank for the family's ranking type. Missing rank
/// data comes back as a classified error the caller may downgrade.
pub async fn get_player_rank(
    client: &reqwest::Client,
    api_token: &str,
    account: &AccountInfo,
    family: &GameModeFamily,
) -> Result<PlayerRank, StatsError> {
    let response = client
        .get(RANKED_INFO_LOOKUP_URL)
        .query(&[("account", account.account_id.as_str())])
        .header("Authorization", api_token)
        .send()
        .await?
        .error_for_status()?;

    let ranked: RankedResponse = response
        .json()
        .await
        .map_err(|exc| StatsError::UnexpectedResponse(format!("ranked body: {}", exc)))?;

    if !ranked.result {
        return Err(StatsError::RankNotFound(account.readable_name.clone()));
    }

    for data in ranked.ranked_data {
        if data.game_id == "fortnite" && data.ranking_type == family.rank_code_name {
            return Ok(PlayerRank {
                rank_name: data.current_division.name,
                rank_progress: (data.promotion_progress * 100.0) as i32,
            });
        }
    }

    warn!(
        "No {} rank entry for {}",
        family.rank_code_name, account.readable_name
    );
    Err(StatsError::RankNotFound(account.readable_name.clone()))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// Response structures

#[derive(Debug, Deserialize)]
struct AdvancedLookupResponse {
    #[serde(default)]
    matches: Vec<AccountMatch>,
}

#[derive(Debug, Deserialize)]
struct AccountMatch {
    #[serde(rename = "accountId")]
    account_id: String,
    #[serde(default)]
    matches: Vec<PlatformMatch>,
}

#[derive(Debug, Deserialize)]
struct PlatformMatch {
    value: String,
    platform: String,
}

#[derive(Debug, Deserialize)]
struct DirectLookupResponse {
    #[serde(rename = "account_id")]
    account_id: Option<String>,
    #[serde(rename = "name")]
    account_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeasonStatsResponse {
    result: bool,
    /// Present-but-null and absent mean different failure modes
    #[serde(default, with = "serde_double_option")]
    name: Option<Option<String>>,
    #[serde(default)]
    global_stats: Option<HashMap<String, RawModeStats>>,
    #[serde(default)]
    account: Option<AccountSection>,
    #[serde(rename = "accountLevelHistory", default)]
    account_level_history: Vec<SeasonLevel>,
}

#[derive(Debug, Deserialize)]
struct AccountSection {
    #[serde(default)]
    season: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct SeasonLevel {
    season: i32,
}

#[derive(Debug, Deserialize)]
struct RankedResponse {
    result: bool,
    #[serde(rename = "rankedData", default)]
    ranked_data: Vec<RankedEntry>,
}

#[derive(Debug, Deserialize)]
struct RankedEntry {
    #[serde(rename = "gameId")]
    game_id: String,
    #[serde(rename = "rankingType")]
    ranking_type: String,
    #[serde(rename = "currentDivision")]
    current_division: Division,
    #[serde(rename = "promotionProgress", default)]
    promotion_progress: f64,
}

#[derive(Debug, Deserialize)]
struct Division {
    name: String,
}

/// Distinguishes a missing key from an explicit null
mod serde_double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Some(Option::<String>::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_stats_response_classifies_absent_vs_null_name() {
        let absent: SeasonStatsResponse = serde_json::from_str(r#"{"result": false}"#).unwrap();
        assert_eq!(absent.name, None);

        let null_name: SeasonStatsResponse =
            serde_json::from_str(r#"{"result": false, "name": null}"#).unwrap();
        assert_eq!(null_name.name, Some(None));

        let named: SeasonStatsResponse =
            serde_json::from_str(r#"{"result": false, "name": "stoobish"}"#).unwrap();
        assert_eq!(named.name, Some(Some("stoobish".to_string())));
    }

    #[test]
    fn test_latest_season_comes_from_level_history_max() {
        let body = r#"{
            "result": true,
            "global_stats": {"solo": {"matchesplayed": 1}},
            "account": {"season": 27, "level": 103},
            "accountLevelHistory": [
                {"season": 25}, {"season": 33}, {"season": 27}
            ]
        }"#;
        let stats: SeasonStatsResponse = serde_json::from_str(body).unwrap();
        let max = stats
            .account_level_history
            .iter()
            .map(|e| e.season)
            .max()
            .unwrap();
        assert_eq!(max, 33);
    }

    #[test]
    fn test_ranked_response_parses_division() {
        let body = r#"{
            "result": true,
            "rankedData": [{
                "gameId": "fortnite",
                "rankingType": "ranked-br",
                "currentDivision": {"name": "Platinum II"},
                "promotionProgress": 0.62
            }]
        }"#;
        let ranked: RankedResponse = serde_json::from_str(body).unwrap();
        assert_eq!(ranked.ranked_data[0].current_division.name, "Platinum II");
        assert_eq!(
            (ranked.ranked_data[0].promotion_progress * 100.0) as i32,
            62
        );
    }
}
