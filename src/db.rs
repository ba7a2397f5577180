// MySQL persistence for player stat snapshots

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::FromRow;
use tracing::info;

use crate::error::StatsError;
use crate::models::snapshot::{PlayerSnapshot, SnapshotDiffRow};
use crate::utils::config::get_session_date_string;

/// Average opponent stats for one canonical mode on the current
/// session date.
#[derive(Debug, Clone, FromRow)]
pub struct OpponentAverageRow {
    pub mode: String,
    pub kd: f64,
    pub games: f64,
    pub wins: f64,
    pub win_rate: f64,
    pub trn: f64,
}

#[derive(Clone, Debug)]
pub struct Database {
    pool: MySqlPool,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = MySqlPoolOptions::new()
            .max_connections(8)
            .connect(database_url)
            .await?;
        info!("Database connection pool ready");
        Ok(Database { pool })
    }

    /// Insert one snapshot row per canonical bucket. Duplicate natural
    /// keys (same player, mode, season, date) are silently dropped.
    pub async fn insert_snapshots(&self, rows: &[PlayerSnapshot]) -> Result<(), StatsError> {
        for row in rows {
            sqlx::query(
                "INSERT IGNORE INTO players
                    (`username`, `season`, `mode`, `sub_mode`, `kd`, `games`, `wins`,
                     `win_rate`, `trn`, `rank_name`, `rank_progress`, `date_added`)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&row.username)
            .bind(row.season)
            .bind(&row.mode)
            .bind(&row.sub_mode)
            .bind(row.kd)
            .bind(row.games)
            .bind(row.wins)
            .bind(row.win_rate)
            .bind(row.trn)
            .bind(&row.rank_name)
            .bind(row.rank_progress)
            .bind(row.date_added)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    /// Fetch the two most recent snapshot dates per mode for a player,
    /// deduplicated to the highest game count per date. date_rank 1 is
    /// the latest session, 2 the one before.
    pub async fn fetch_stats_diff(
        &self,
        username: &str,
        season: i32,
    ) -> Result<Vec<SnapshotDiffRow>, StatsError> {
        let rows = sqlx::query_as::<_, SnapshotDiffRow>(
            "SELECT mode,
                    kd,
                    CAST(games AS SIGNED) AS games,
                    CAST(wins AS SIGNED) AS wins,
                    win_rate,
                    CAST(trn AS SIGNED) AS trn,
                    CAST(date_rank AS SIGNED) AS date_rank
             FROM (
                 SELECT DISTINCT
                     mode, kd, games, wins, win_rate, trn,
                     DENSE_RANK() OVER (PARTITION BY mode, season ORDER BY date_added DESC) AS date_rank,
                     DENSE_RANK() OVER (PARTITION BY date_added, mode, season ORDER BY games DESC) AS game_rank
                 FROM players
                 WHERE username = ? AND season = ?
             ) AS latest_stats
             WHERE game_rank = 1 AND date_rank IN (1, 2)",
        )
        .bind(username)
        .bind(season)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Average stats of players tracked on the current session date,
    /// excluding the squad itself (opponents only).
    pub async fn fetch_opponent_averages(
        &self,
        squad_players: &[String],
    ) -> Result<Vec<OpponentAverageRow>, StatsError> {
        let exclusion = if squad_players.is_empty() {
            String::new()
        } else {
            format!(
                " AND username NOT IN ({})",
                vec!["?"; squad_players.len()].join(", ")
            )
        };
        let query = format!(
            "SELECT mode,
                    CAST(AVG(kd) AS DOUBLE) AS kd,
                    CAST(AVG(games) AS DOUBLE) AS games,
                    CAST(AVG(wins) AS DOUBLE) AS wins,
                    CAST(AVG(win_rate) AS DOUBLE) AS win_rate,
                    CAST(AVG(trn) AS DOUBLE) AS trn
             FROM players
             WHERE date_added = ?{}
             GROUP BY mode",
            exclusion
        );

        let mut q = sqlx::query_as::<_, OpponentAverageRow>(&query).bind(get_session_date_string());
        for username in squad_players {
            q = q.bind(username);
        }

        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows)
    }
}
