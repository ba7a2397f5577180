// Stat aggregation: provider submode breakdowns into canonical buckets

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use super::modes::{GameModeFamily, MatchRule};

/// Per-submode stats block as returned by the provider. Playlists the
/// player never touched come back with fields missing, so every field
/// defaults to zero rather than failing the parse.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawModeStats {
    #[serde(default)]
    pub placetop1: u64,
    #[serde(default)]
    pub matchesplayed: u64,
    #[serde(default)]
    pub winrate: f64,
    #[serde(default)]
    pub kills: u64,
    #[serde(default)]
    pub kd: f64,
    #[serde(default)]
    pub score: u64,
}

/// Canonical game mode buckets exposed to users. Ordering doubles as
/// the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Bucket {
    Solo,
    Duo,
    Trio,
    Squad,
    All,
}

impl Bucket {
    pub const DISPLAY_ORDER: [Bucket; 5] = [
        Bucket::Solo,
        Bucket::Duo,
        Bucket::Trio,
        Bucket::Squad,
        Bucket::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Solo => "solo",
            Bucket::Duo => "duo",
            Bucket::Trio => "trio",
            Bucket::Squad => "squad",
            Bucket::All => "all",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Bucket::Solo => "Solo",
            Bucket::Duo => "Duo",
            Bucket::Trio => "Trio",
            Bucket::Squad => "Squad",
            Bucket::All => "Overall",
        }
    }

    /// Classify a provider submode code name. Party-size keywords are
    /// tested in priority order; a name matching none of them belongs
    /// to no per-party bucket (it still counts toward "all").
    fn classify(code_name: &str) -> Option<Bucket> {
        if code_name.contains("duo") {
            Some(Bucket::Duo)
        } else if code_name.contains("trio") {
            Some(Bucket::Trio)
        } else if code_name.contains("squad") {
            Some(Bucket::Squad)
        } else if code_name.contains("solo") {
            Some(Bucket::Solo)
        } else {
            None
        }
    }
}

/// Aggregated stats for one canonical bucket. Win rate is a percentage
/// and kd is recomputed from the accumulated counts, never copied from
/// the provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalModeStats {
    pub placetop1: u64,
    pub matchesplayed: u64,
    pub kills: u64,
    pub winrate: f64,
    pub kd: f64,
    pub score: u64,
}

/// Aggregate a provider submode breakdown into canonical buckets for one
/// game mode family.
///
/// Entries are filtered by the family's match rule, classified into
/// party-size buckets, and accumulated into those buckets plus "all".
/// Buckets that end up with zero matches are omitted entirely. An empty
/// result means the player has no data for the family; that is the
/// caller's message to deliver, not an error here.
pub fn aggregate(
    raw: &HashMap<String, RawModeStats>,
    family: &GameModeFamily,
) -> BTreeMap<Bucket, CanonicalModeStats> {
    let mut buckets: BTreeMap<Bucket, CanonicalModeStats> = BTreeMap::new();

    // Sorted iteration keeps the last-seen score policy deterministic
    // regardless of the input map's ordering.
    let mut code_names: Vec<&String> = raw
        .keys()
        .filter(|code_name| matches_family(code_name, family))
        .collect();
    code_names.sort();

    for code_name in code_names {
        let stats = &raw[code_name.as_str()];

        if let Some(bucket) = Bucket::classify(code_name) {
            accumulate(buckets.entry(bucket).or_default(), stats);
        }
        accumulate(buckets.entry(Bucket::All).or_default(), stats);
    }

    buckets.retain(|_, stats| stats.matchesplayed > 0);

    for stats in buckets.values_mut() {
        stats.winrate = stats.placetop1 as f64 / stats.matchesplayed as f64 * 100.0;
        let eliminations = stats.matchesplayed - stats.placetop1;
        // A player who won every tracked match has no deaths to divide
        // by; report the raw kill count instead.
        stats.kd = if eliminations == 0 {
            stats.kills as f64
        } else {
            stats.kills as f64 / eliminations as f64
        };
    }

    buckets
}

fn matches_family(code_name: &str, family: &GameModeFamily) -> bool {
    match family.match_rule {
        MatchRule::Exact => family
            .stats_code_names
            .iter()
            .any(|name| *name == code_name),
        MatchRule::Contains => family
            .stats_code_names
            .iter()
            .any(|name| code_name.contains(name)),
    }
}

fn accumulate(bucket: &mut CanonicalModeStats, stats: &RawModeStats) {
    bucket.placetop1 += stats.placetop1;
    bucket.matchesplayed += stats.matchesplayed;
    bucket.kills += stats.kills;
    // Last value wins for the provider-only score field; it is not
    // meaningful to sum across submodes.
    bucket.score = stats.score;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::modes;

    fn raw(placetop1: u64, matchesplayed: u64, kills: u64) -> RawModeStats {
        RawModeStats {
            placetop1,
            matchesplayed,
            kills,
            ..Default::default()
        }
    }

    fn ranked_br() -> &'static GameModeFamily {
        modes::family("ranked_br").unwrap()
    }

    fn ranked_reload() -> &'static GameModeFamily {
        modes::family("ranked_reload").unwrap()
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let result = aggregate(&HashMap::new(), ranked_br());
        assert!(result.is_empty());
    }

    #[test]
    fn test_no_family_matches_yields_empty_output() {
        let input = HashMap::from([
            ("solo".to_string(), raw(1, 10, 5)),
            ("duos".to_string(), raw(2, 20, 15)),
        ]);
        // unranked code names never match the ranked BR family
        let result = aggregate(&input, ranked_br());
        assert!(result.is_empty());
    }

    #[test]
    fn test_single_solo_entry_round_trip() {
        let input = HashMap::from([("habanerosolo".to_string(), raw(2, 10, 30))]);
        let result = aggregate(&input, ranked_br());

        let solo = &result[&Bucket::Solo];
        assert_eq!(solo.matchesplayed, 10);
        assert_eq!(solo.placetop1, 2);
        assert_eq!(solo.kills, 30);
        assert_eq!(solo.winrate, 20.0);
        assert_eq!(solo.kd, 3.75);

        assert_eq!(result[&Bucket::All], *solo);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_unranked_family_matches_exact_code_names_only() {
        let input = HashMap::from([
            ("solo".to_string(), raw(2, 10, 30)),
            ("duos".to_string(), raw(1, 5, 10)),
            // Ranked code name contains "solo" but is not an exact match
            ("habanerosolo".to_string(), raw(9, 9, 9)),
        ]);
        let result = aggregate(&input, modes::family("unranked_br").unwrap());

        assert_eq!(result[&Bucket::Solo].matchesplayed, 10);
        assert_eq!(result[&Bucket::Duo].matchesplayed, 5);
        assert_eq!(result[&Bucket::All].matchesplayed, 15);
    }

    #[test]
    fn test_reload_submodes_merge_across_maps_and_tiers() {
        let input = HashMap::from([
            ("habanero_blastberry_duo".to_string(), raw(1, 10, 8)),
            ("habanero_punchberry_duo".to_string(), raw(2, 5, 7)),
            ("habanero_sunflower_squad".to_string(), raw(0, 4, 3)),
            // Outside the reload family, must be ignored
            ("habanerosolo".to_string(), raw(9, 9, 9)),
        ]);
        let result = aggregate(&input, ranked_reload());

        assert_eq!(result[&Bucket::Duo].matchesplayed, 15);
        assert_eq!(result[&Bucket::Duo].placetop1, 3);
        assert_eq!(result[&Bucket::Duo].kills, 15);
        assert_eq!(result[&Bucket::Squad].matchesplayed, 4);
        assert_eq!(result[&Bucket::All].matchesplayed, 19);
        assert!(!result.contains_key(&Bucket::Solo));
    }

    #[test]
    fn test_overall_winrate_is_ratio_of_sums_not_average_of_rates() {
        // 1 win in 10 (10%) and 4 wins in 5 (80%): the naive average of
        // percentages would be 45%, the correct pooled rate is 5/15.
        let input = HashMap::from([
            ("habaneroduo".to_string(), raw(1, 10, 8)),
            ("habanerosquad".to_string(), raw(4, 5, 6)),
        ]);
        let result = aggregate(&input, ranked_br());

        let all = &result[&Bucket::All];
        let expected = 5.0 / 15.0 * 100.0;
        assert!((all.winrate - expected).abs() < 1e-9);
        assert!((all.winrate - 45.0).abs() > 1.0);
    }

    #[test]
    fn test_kd_recomputed_from_accumulated_counts() {
        let input = HashMap::from([
            ("habaneroduo".to_string(), raw(2, 10, 12)),
            ("habanerotrio".to_string(), raw(1, 5, 6)),
        ]);
        let result = aggregate(&input, ranked_br());

        // 18 kills over (15 - 3) losses
        assert_eq!(result[&Bucket::All].kd, 1.5);
        assert_eq!(result[&Bucket::Duo].kd, 1.5);
        assert_eq!(result[&Bucket::Trio].kd, 1.5);
    }

    #[test]
    fn test_all_wins_reports_kill_count_as_kd() {
        let input = HashMap::from([("habanerosolo".to_string(), raw(3, 3, 21))]);
        let result = aggregate(&input, ranked_br());
        assert_eq!(result[&Bucket::Solo].kd, 21.0);
    }

    #[test]
    fn test_zero_match_buckets_are_omitted() {
        let input = HashMap::from([
            ("habaneroduo".to_string(), raw(0, 0, 0)),
            ("habanerosquad".to_string(), raw(1, 2, 3)),
        ]);
        let result = aggregate(&input, ranked_br());
        assert!(!result.contains_key(&Bucket::Duo));
        assert!(result.contains_key(&Bucket::Squad));
    }

    #[test]
    fn test_unclassified_entries_count_toward_all_only() {
        // "solos" is an exact unranked_br code name but carries no
        // party keyword other than solo; craft one without any keyword.
        let input = HashMap::from([
            ("habanero_blastberry".to_string(), raw(1, 6, 4)),
            ("habanero_blastberry_duo".to_string(), raw(0, 2, 1)),
        ]);
        let result = aggregate(&input, ranked_reload());

        assert_eq!(result[&Bucket::All].matchesplayed, 8);
        assert_eq!(result[&Bucket::Duo].matchesplayed, 2);
        assert!(!result.contains_key(&Bucket::Solo));
        assert!(!result.contains_key(&Bucket::Squad));
    }

    #[test]
    fn test_output_is_deterministic_across_insertion_orders() {
        let entries = [
            ("habaneroduo".to_string(), raw(1, 10, 8)),
            ("habanerotrio".to_string(), raw(2, 7, 5)),
            ("habanerosquad".to_string(), raw(0, 3, 2)),
        ];

        let forward: HashMap<_, _> = entries.iter().cloned().collect();
        let reverse: HashMap<_, _> = entries.iter().rev().cloned().collect();

        assert_eq!(
            aggregate(&forward, ranked_br()),
            aggregate(&reverse, ranked_br())
        );
    }

    #[test]
    fn test_missing_fields_deserialize_as_zero() {
        let stats: RawModeStats = serde_json::from_str(r#"{"matchesplayed": 4}"#).unwrap();
        assert_eq!(stats.matchesplayed, 4);
        assert_eq!(stats.placetop1, 0);
        assert_eq!(stats.kills, 0);
        assert_eq!(stats.score, 0);
    }
}
