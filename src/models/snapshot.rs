// Player snapshot rows and the stats diff breakdown

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::FromRow;

use crate::utils::formatters::{format_diff_float, format_diff_int, format_number};

/// One persisted row of a player's stats for one canonical mode on one
/// play-session date. Rows are append-only; history is reconstructed at
/// query time.
#[derive(Debug, Clone, FromRow)]
pub struct PlayerSnapshot {
    pub username: String,
    pub season: i32,
    pub mode: String,
    pub sub_mode: String,
    pub kd: f64,
    pub games: i64,
    pub wins: i64,
    pub win_rate: f64,
    pub trn: i64,
    pub rank_name: Option<String>,
    pub rank_progress: Option<i32>,
    pub date_added: NaiveDate,
}

/// Row returned by the diff query: a snapshot plus its recency rank
/// within (mode, season). date_rank 1 is the most recent session date,
/// 2 the one before it.
#[derive(Debug, Clone, FromRow)]
pub struct SnapshotDiffRow {
    pub mode: String,
    pub kd: f64,
    pub games: i64,
    pub wins: i64,
    pub win_rate: f64,
    pub trn: i64,
    pub date_rank: i64,
}

/// A current value plus its formatted delta against the previous session
#[derive(Debug, Clone, PartialEq)]
pub struct DiffEntry {
    pub current: f64,
    pub diff: String,
}

/// Per-mode stat diffs between the two most recent session dates
#[derive(Debug, Clone)]
pub struct ModeDiff {
    pub kd: DiffEntry,
    pub wins: DiffEntry,
    pub win_rate: DiffEntry,
    pub matches: DiffEntry,
    pub trn: DiffEntry,
}

impl ModeDiff {
    /// Stats line for the diff embed
    pub fn display_line(&self) -> String {
        format!(
            "KD: {:.2} ({}) • Wins: {} ({}) • Win Percentage: {:.1}% ({}%) • Matches: {} ({}) • TRN: {} ({})",
            self.kd.current,
            self.kd.diff,
            self.wins.current as i64,
            self.wins.diff,
            self.win_rate.current,
            self.win_rate.diff,
            self.matches.current as i64,
            self.matches.diff,
            format_number(self.trn.current as i64),
            self.trn.diff,
        )
    }
}

/// Break diff-query rows into per-mode current values and deltas.
/// A mode with no previous-date row diffs against zero, so a player's
/// first tracked session shows their full totals as the diff.
pub fn breakdown_snapshots(rows: &[SnapshotDiffRow]) -> HashMap<String, ModeDiff> {
    let mut current: HashMap<&str, &SnapshotDiffRow> = HashMap::new();
    let mut previous: HashMap<&str, &SnapshotDiffRow> = HashMap::new();

    for row in rows {
        if row.date_rank == 1 {
            current.insert(row.mode.as_str(), row);
        } else {
            previous.insert(row.mode.as_str(), row);
        }
    }

    let zero = SnapshotDiffRow {
        mode: String::new(),
        kd: 0.0,
        games: 0,
        wins: 0,
        win_rate: 0.0,
        trn: 0,
        date_rank: 2,
    };

    current
        .into_iter()
        .map(|(mode, cur)| {
            let prev = previous.get(mode).copied().unwrap_or(&zero);
            let diff = ModeDiff {
                kd: DiffEntry {
                    current: cur.kd,
                    diff: format_diff_float(cur.kd - prev.kd, 2),
                },
                wins: DiffEntry {
                    current: cur.wins as f64,
                    diff: format_diff_int(cur.wins - prev.wins),
                },
                win_rate: DiffEntry {
                    current: cur.win_rate,
                    diff: format_diff_float(cur.win_rate - prev.win_rate, 1),
                },
                matches: DiffEntry {
                    current: cur.games as f64,
                    diff: format_diff_int(cur.games - prev.games),
                },
                trn: DiffEntry {
                    current: cur.trn as f64,
                    diff: format_diff_int(cur.trn - prev.trn),
                },
            };
            (mode.to_string(), diff)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(mode: &str, kd: f64, games: i64, wins: i64, win_rate: f64, trn: i64, rank: i64) -> SnapshotDiffRow {
        SnapshotDiffRow {
            mode: mode.to_string(),
            kd,
            games,
            wins,
            win_rate,
            trn,
            date_rank: rank,
        }
    }

    #[test]
    fn test_diff_is_current_minus_previous() {
        let rows = vec![
            row("all", 2.5, 120, 12, 10.0, 4100, 1),
            row("all", 2.25, 100, 10, 10.0, 4000, 2),
        ];
        let breakdown = breakdown_snapshots(&rows);
        let all = &breakdown["all"];

        assert_eq!(all.kd.current, 2.5);
        assert_eq!(all.kd.diff, "+0.25");
        assert_eq!(all.matches.diff, "+20");
        assert_eq!(all.wins.diff, "+2");
        assert_eq!(all.win_rate.diff, "+0.0");
        assert_eq!(all.trn.diff, "+100");
    }

    #[test]
    fn test_negative_diff_keeps_sign() {
        let rows = vec![
            row("solo", 1.8, 50, 3, 6.0, 900, 1),
            row("solo", 2.0, 40, 3, 7.5, 950, 2),
        ];
        let breakdown = breakdown_snapshots(&rows);
        assert_eq!(breakdown["solo"].kd.diff, "-0.20");
        assert_eq!(breakdown["solo"].win_rate.diff, "-1.5");
        assert_eq!(breakdown["solo"].trn.diff, "-50");
    }

    #[test]
    fn test_missing_previous_diffs_against_zero() {
        let rows = vec![row("duo", 1.5, 30, 2, 6.7, 800, 1)];
        let breakdown = breakdown_snapshots(&rows);
        assert_eq!(breakdown["duo"].matches.diff, "+30");
        assert_eq!(breakdown["duo"].kd.diff, "+1.50");
    }

    #[test]
    fn test_modes_are_kept_separate() {
        let rows = vec![
            row("all", 2.0, 100, 10, 10.0, 4000, 1),
            row("duo", 1.0, 40, 2, 5.0, 1000, 1),
            row("all", 1.9, 90, 9, 10.0, 3900, 2),
        ];
        let breakdown = breakdown_snapshots(&rows);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown["all"].matches.diff, "+10");
        assert_eq!(breakdown["duo"].matches.diff, "+40");
    }
}
