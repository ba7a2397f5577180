// Error taxonomy for the stats lookup pipeline

use thiserror::Error;

/// Failures surfaced by the player stats workflow. Not-found variants are
/// user-visible messages; `Upstream` and `Database` carry the underlying
/// cause for the error log.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Player has no game records for {0}")]
    NoStatsForMode(String),

    #[error("Player rank information not found: {0}")]
    RankNotFound(String),

    #[error("Upstream API error: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Unexpected upstream response: {0}")]
    UnexpectedResponse(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StatsError {
    /// Not-found errors are reported to the user and logged at warning
    /// level; everything else is a system fault.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StatsError::PlayerNotFound(_)
                | StatsError::NoStatsForMode(_)
                | StatsError::RankNotFound(_)
        )
    }
}
