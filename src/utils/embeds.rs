// Discord embed construction for stats output

use std::collections::BTreeMap;

use poise::serenity_prelude as serenity;

use crate::api::fortnite::PlayerRank;
use crate::models::stats::{Bucket, CanonicalModeStats};
use crate::utils::formatters::format_number;

const ACCOUNT_PROFILE_URL: &str = "https://fortnitetracker.com/profile/all";

const RANK_ICONS_URL: &str = "https://static.wikia.nocookie.net/fortnite/images";
const RANK_ICONS_SIZE_PARAM: &str = "/revision/latest/scale-to-width-down/100";

/// Icon paths by division name, hand-maintained against the wiki
fn rank_icon_path(rank_name: &str) -> Option<&'static str> {
    match rank_name {
        "Unranked" => Some("/0/0d/Unknown_Rank_-_Icon_-_Fortnite.png"),
        "Bronze I" => Some("/4/44/Bronze_I_-_Icon_-_Fortnite.png"),
        "Bronze II" => Some("/9/92/Bronze_II_-_Icon_-_Fortnite.png"),
        "Bronze III" => Some("/7/74/Bronze_III_-_Icon_-_Fortnite.png"),
        "Silver I" => Some("/c/c3/Silver_I_-_Icon_-_Fortnite.png"),
        "Silver II" => Some("/1/1d/Silver_II_-_Icon_-_Fortnite.png"),
        "Silver III" => Some("/0/0a/Silver_III_-_Icon_-_Fortnite.png"),
        "Gold I" => Some("/3/37/Gold_I_-_Icon_-_Fortnite.png"),
        "Gold II" => Some("/f/fb/Gold_II_-_Icon_-_Fortnite.png"),
        "Gold III" => Some("/c/cf/Gold_III_-_Icon_-_Fortnite.png"),
        "Platinum I" => Some("/2/2a/Platinum_I_-_Icon_-_Fortnite.png"),
        "Platinum II" => Some("/3/3e/Platinum_II_-_Icon_-_Fortnite.png"),
        "Platinum III" => Some("/3/30/Platinum_III_-_Icon_-_Fortnite.png"),
        "Diamond I" => Some("/9/98/Diamond_I_-_Icon_-_Fortnite.png"),
        "Diamond II" => Some("/d/db/Diamond_II_-_Icon_-_Fortnite.png"),
        "Diamond III" => Some("/e/e1/Diamond_III_-_Icon_-_Fortnite.png"),
        "Elite" => Some("/2/2e/Elite_-_Icon_-_Fortnite.png"),
        "Champion" => Some("/2/2a/Champion_-_Icon_-_Fortnite.png"),
        "Unreal" => Some("/6/6c/Unreal_-_Icon_-_Fortnite.png"),
        _ => None,
    }
}

/// Skill color indicator from overall KD.
/// Thresholds are calibrated for ranked play; the stats API does not
/// split its overall numbers by ranked vs unranked playlists.
pub fn skill_color_indicator(overall_kd: f64) -> u32 {
    if overall_kd >= 2.25 {
        0x3a0357
    } else if overall_kd >= 2.00 {
        0xa600ff
    } else if overall_kd >= 1.75 {
        0xff0000
    } else if overall_kd >= 1.50 {
        0xff8800
    } else if overall_kd >= 1.25 {
        0xffff00
    } else {
        0xfffffe
    }
}

/// Skill rate keyword from overall KD, same thresholds as the colors
pub fn skill_rate_indicator(overall_kd: f64) -> &'static str {
    if overall_kd >= 2.25 {
        "Hackers"
    } else if overall_kd >= 2.00 {
        "Aim Botters"
    } else if overall_kd >= 1.75 {
        "Sweats"
    } else if overall_kd >= 1.50 {
        "High"
    } else if overall_kd >= 1.25 {
        "Medium"
    } else {
        "Bots"
    }
}

/// FN Tracker profile URL for the embed title link
pub fn account_profile_url(username: &str, season_id: i32) -> String {
    format!(
        "{}/{}?season={}",
        ACCOUNT_PROFILE_URL,
        urlencoding::encode(username),
        season_id
    )
}

/// "Wins: 12 / 340 played" headline under the embed title
pub fn wins_str(wins: u64, matches: u64) -> String {
    format!(
        "Wins: {} / {} played",
        format_number(wins as i64),
        format_number(matches as i64)
    )
}

/// One stats line for a canonical bucket
pub fn stats_line(stats: &CanonicalModeStats) -> String {
    format!(
        "KD: {:.2} • Wins: {} • Win Percentage: {:.1}% • Matches: {}",
        stats.kd,
        format_number(stats.placetop1 as i64),
        stats.winrate,
        format_number(stats.matchesplayed as i64)
    )
}

/// Mode fields in fixed display order, skipping absent buckets
pub fn ordered_mode_lines(
    breakdown: &BTreeMap<Bucket, CanonicalModeStats>,
) -> Vec<(&'static str, String)> {
    Bucket::DISPLAY_ORDER
        .iter()
        .filter_map(|bucket| {
            breakdown
                .get(bucket)
                .map(|stats| (bucket.label(), stats_line(stats)))
        })
        .collect()
}

/// Assemble the stats embed. Rank and stream data are optional; the
/// message renders without them.
pub fn create_stats_message(
    title: &str,
    desc: &str,
    color_metric: f64,
    mode_lines: Vec<(&str, String)>,
    profile_url: Option<String>,
    rank: Option<&PlayerRank>,
    twitch_stream: Option<&str>,
) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .title(title)
        .description(desc)
        .color(skill_color_indicator(color_metric));

    if let Some(url) = profile_url {
        embed = embed.url(url);
    }

    for (name, value) in mode_lines {
        embed = embed.field(format!("[{}]", name), value, false);
    }

    if let Some(rank) = rank {
        embed = embed.field(
            "[Rank]",
            format!("{} - {}%", rank.rank_name, rank.rank_progress),
            false,
        );
        if let Some(path) = rank_icon_path(&rank.rank_name) {
            embed = embed.thumbnail(format!(
                "{}{}{}",
                RANK_ICONS_URL, path, RANK_ICONS_SIZE_PARAM
            ));
        }
    }

    if let Some(stream) = twitch_stream {
        embed = embed.field("[Twitch]", format!("[Streaming here]({})", stream), false);
    }

    embed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_rate_thresholds() {
        assert_eq!(skill_rate_indicator(2.3), "Hackers");
        assert_eq!(skill_rate_indicator(2.1), "Aim Botters");
        assert_eq!(skill_rate_indicator(1.8), "Sweats");
        assert_eq!(skill_rate_indicator(1.6), "High");
        assert_eq!(skill_rate_indicator(1.3), "Medium");
        assert_eq!(skill_rate_indicator(0.9), "Bots");
    }

    #[test]
    fn test_profile_url_encodes_username() {
        assert_eq!(
            account_profile_url("Ligma Balls12", 33),
            "https://fortnitetracker.com/profile/all/Ligma%20Balls12?season=33"
        );
    }

    #[test]
    fn test_mode_lines_follow_display_order() {
        let mut breakdown = BTreeMap::new();
        breakdown.insert(
            Bucket::All,
            CanonicalModeStats {
                placetop1: 5,
                matchesplayed: 50,
                kills: 90,
                winrate: 10.0,
                kd: 2.0,
                score: 0,
            },
        );
        breakdown.insert(
            Bucket::Duo,
            CanonicalModeStats {
                placetop1: 5,
                matchesplayed: 50,
                kills: 90,
                winrate: 10.0,
                kd: 2.0,
                score: 0,
            },
        );

        let lines = ordered_mode_lines(&breakdown);
        assert_eq!(lines[0].0, "Duo");
        assert_eq!(lines[1].0, "Overall");
        assert!(lines[0].1.starts_with("KD: 2.00"));
    }
}
