use std::collections::HashMap;

use crate::db::models::{GameRow, PlayerRow, PredictionRow};
use crate::error::Result;
use crate::source::RecordSource;
use crate::types::{GameRecord, PredictionRecord};

const GAMES_SQL: &str = r#"
    SELECT game_id, home_team, away_team, start_time, line,
           home_sp_id, away_sp_id,
           home_1_id, home_2_id, home_3_id, home_4_id, home_5_id,
           home_6_id, home_7_id, home_8_id, home_9_id,
           away_1_id, away_2_id, away_3_id, away_4_id, away_5_id,
           away_6_id, away_7_id, away_8_id, away_9_id
    FROM games
    ORDER BY rowid
"#;

const PREDICTIONS_SQL: &str = r#"
    SELECT id, game_id, model_prediction, confidence, early_label,
           completed, started, actual_total, home_score, away_score, description
    FROM predictions
    ORDER BY id
"#;

const PLAYERS_SQL: &str = "SELECT player_id, player_name FROM players";

/// Read-only view over the ledger database. Cheap to clone; shares the pool.
#[derive(Clone)]
pub struct SqliteSource {
    pool: sqlx::SqlitePool,
}

impl SqliteSource {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

impl RecordSource for SqliteSource {
    async fn fetch_games(&self) -> Result<Vec<GameRecord>> {
        let rows = sqlx::query_as::<_, GameRow>(GAMES_SQL)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(GameRow::into_record).collect())
    }

    async fn fetch_predictions(&self) -> Result<Vec<PredictionRecord>> {
        let rows = sqlx::query_as::<_, PredictionRow>(PREDICTIONS_SQL)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(PredictionRow::into_record).collect())
    }

    async fn fetch_players(&self) -> Result<HashMap<String, String>> {
        let rows = sqlx::query_as::<_, PlayerRow>(PLAYERS_SQL)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|p| (p.player_id, p.player_name)).collect())
    }
}
