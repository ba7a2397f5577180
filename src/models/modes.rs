// Game mode families and resolution
//
// The upstream stats and rank APIs are inconsistent about game modes:
// 1. Both APIs use different keys to mean "ranked"
// 2. Reload stats are split by map rather than by overall game mode
// 3. Reload stats are additionally split by ranked vs unranked
// So BR duos comes back as a single grouping while Reload duos comes back
// as one grouping per map per ranked tier, with compound code names.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Game mode selected '{0}' is not supported")]
pub struct InvalidGameMode(pub String);

/// How a family's stat code names are matched against the provider's
/// submode keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Submode key must equal one of the code names (BR families).
    Exact,
    /// A code name may appear anywhere in the submode key (Reload,
    /// where the provider emits per-map compound names).
    Contains,
}

/// A top-level game mode grouping: which raw submodes belong to it and
/// which ranking-type code the rank API uses for it.
#[derive(Debug)]
pub struct GameModeFamily {
    pub name: &'static str,
    pub stats_code_names: &'static [&'static str],
    pub rank_code_name: &'static str,
    pub match_rule: MatchRule,
}

static GAME_MODE_FAMILIES: Lazy<HashMap<&'static str, GameModeFamily>> = Lazy::new(|| {
    HashMap::from([
        (
            "unranked_br",
            GameModeFamily {
                name: "unranked_br",
                stats_code_names: &["solo", "duos", "trios", "squads"],
                rank_code_name: "ranked-br",
                match_rule: MatchRule::Exact,
            },
        ),
        (
            "ranked_br",
            GameModeFamily {
                name: "ranked_br",
                stats_code_names: &[
                    "habanerosolo",
                    "habaneroduo",
                    "habanerotrio",
                    "habanerosquad",
                ],
                rank_code_name: "ranked-br",
                match_rule: MatchRule::Exact,
            },
        ),
        (
            "ranked_reload",
            GameModeFamily {
                name: "ranked_reload",
                stats_code_names: &[
                    "habanero_blastberry",
                    "habanero_punchberry",
                    "habanero_sunflower",
                ],
                rank_code_name: "ranked_blastberry_build",
                match_rule: MatchRule::Contains,
            },
        ),
    ])
});

/// Reload map code fragments, used for hint inference
const RELOAD_FRAGMENTS: [&str; 4] = ["reload", "blastberry", "punchberry", "sunflower"];

/// BR party-size fragments, used for hint inference
const PARTY_FRAGMENTS: [&str; 4] = ["solo", "duo", "trio", "squad"];

/// Lowercase and map spaces to underscores so user input like
/// "Ranked Reload" resolves to the family key.
pub fn normalize(candidate: &str) -> String {
    candidate.to_lowercase().replace(' ', "_")
}

/// Look up a family by its exact key
pub fn family(name: &str) -> Option<&'static GameModeFamily> {
    GAME_MODE_FAMILIES.get(name)
}

/// Validate a user-supplied game mode string and return its family
pub fn validate(candidate: &str) -> Result<&'static GameModeFamily, InvalidGameMode> {
    let normalized = normalize(candidate);
    GAME_MODE_FAMILIES
        .get(normalized.as_str())
        .ok_or(InvalidGameMode(normalized))
}

/// Look up the family for the active mode cell, which only ever holds
/// keys that passed `validate`.
pub fn active_family(name: &str) -> &'static GameModeFamily {
    family(name).unwrap_or_else(|| {
        family("unranked_br").expect("family table always contains unranked_br")
    })
}

/// Readable label for a family key, also stored as the snapshot sub_mode
pub fn readable(name: &str) -> String {
    name.replace('_', " ")
}

/// Best-effort family inference from a replay-derived game mode label.
/// Exact keys win; otherwise rank markers are stripped and the remainder
/// is tested against Reload map fragments and BR party-size fragments.
/// Ambiguous input falls back to the currently active mode without
/// signaling, so a misnamed playlist degrades to the active selection.
pub fn resolve_from_hint(hint: &str, active_mode: &str) -> String {
    let normalized = normalize(hint);
    if GAME_MODE_FAMILIES.contains_key(normalized.as_str()) {
        return normalized;
    }

    let is_ranked = normalized.contains("ranked") || normalized.contains("habanero");
    let stripped = normalized.replace("ranked", "").replace("habanero", "");

    if RELOAD_FRAGMENTS.iter().any(|f| stripped.contains(f)) {
        if is_ranked {
            return "ranked_reload".to_string();
        }
    } else if PARTY_FRAGMENTS.iter().any(|f| stripped.contains(f)) {
        return if is_ranked { "ranked_br" } else { "unranked_br" }.to_string();
    }

    active_mode.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_case_and_space_variants() {
        assert_eq!(validate("Ranked_Reload").unwrap().name, "ranked_reload");
        assert_eq!(validate("ranked reload").unwrap().name, "ranked_reload");
        assert_eq!(validate("ranked_reload").unwrap().name, "ranked_reload");
        assert_eq!(validate("unranked_br").unwrap().name, "unranked_br");
    }

    #[test]
    fn test_validate_rejects_unknown_mode() {
        let err = validate("banana_mode").unwrap_err();
        assert_eq!(err, InvalidGameMode("banana_mode".to_string()));
        assert!(err.to_string().contains("banana_mode"));
    }

    #[test]
    fn test_hint_exact_key_wins() {
        assert_eq!(resolve_from_hint("Ranked BR", "unranked_br"), "ranked_br");
    }

    #[test]
    fn test_hint_reload_map_fragment() {
        assert_eq!(
            resolve_from_hint("habanero_blastberry_nobuild", "unranked_br"),
            "ranked_reload"
        );
        assert_eq!(
            resolve_from_hint("Ranked Reload Sunflower", "unranked_br"),
            "ranked_reload"
        );
    }

    #[test]
    fn test_hint_party_size_fragment() {
        assert_eq!(resolve_from_hint("habaneroduo", "unranked_br"), "ranked_br");
        assert_eq!(resolve_from_hint("trios", "ranked_br"), "unranked_br");
    }

    #[test]
    fn test_hint_ambiguous_falls_back_to_active() {
        assert_eq!(
            resolve_from_hint("creative_island", "ranked_reload"),
            "ranked_reload"
        );
        // Unranked reload has no family of its own
        assert_eq!(resolve_from_hint("blastberry", "ranked_br"), "ranked_br");
    }
}
